//! Site profiles.
//!
//! A profile is a small `directive: value` text file describing where one
//! site keeps its title and content. Profiles turn the locator heuristics
//! into data: a redesigned blog template needs a new profile, not a new
//! build.
//!
//! ```text
//! # safeguardglobal.com.txt
//! title_tag: h1
//! title_class: text-brand-purple-black
//! body_class_contains: lg:w-2/3
//! body_class_contains: flex
//! body_class_contains: gap-10
//! body_selector: main .post-body
//! fallback_tag: article
//! allowed_domain: safeguardglobal.com
//! ```

pub mod directives;
pub mod loader;
pub mod parser;

pub use directives::{Directive, SiteProfile};
pub use loader::{ProfileLoader, ProfileLoaderBuilder};
pub use parser::ProfileParser;
