pub mod error;
pub mod extract;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod images;
pub mod locate;
pub mod node;
pub mod parse;
pub mod profile;
pub mod result;
pub mod sanitize;
pub mod urls;

pub use error::{PagecutError, Result};
pub use extract::{ExtractConfig, ExtractConfigBuilder, Extractor, TitleMode, extract, extract_with_config};
#[cfg(feature = "fetch")]
pub use extract::{fetch_and_extract, fetch_and_extract_with_config};
#[cfg(feature = "fetch")]
pub use fetch::{FetchConfig, fetch_file, fetch_stdin, fetch_url, validate_source_url};
pub use images::{extract_fragment_images, extract_images};
pub use locate::{ContentLocator, LocatorRule, TitleLocator};
#[doc(hidden)]
pub use node::{ElementNode, Fragment, Node};
pub use parse::{Document, Element};
pub use profile::{ProfileLoader, ProfileLoaderBuilder, ProfileParser, SiteProfile};
pub use result::ScrapeResult;
pub use sanitize::{SanitizeConfig, sanitize_container, sanitize_fragment};
pub use urls::{fix_protocol_relative, normalize_image_url};
