//! Main extraction API.
//!
//! [`Extractor`] runs the pipeline over one document:
//!
//! 1. parse the HTML,
//! 2. locate the title on the full document,
//! 3. locate the content container (or fail with
//!    [`PagecutError::ContentNotFound`](crate::PagecutError::ContentNotFound)),
//! 4. sanitize the container,
//! 5. collect image URLs from the sanitized content,
//! 6. assemble a [`ScrapeResult`].
//!
//! Each call builds and drops its own tree; an `Extractor` holds only
//! configuration and can be shared freely between threads.
//!
//! # Example
//!
//! ```rust
//! use pagecut_core::extract;
//!
//! let html = r#"<html><body>
//!     <h1 class="text-brand-purple-black">Real Title</h1>
//!     <div class="lg:w-2/3 flex gap-10"><p>Hi <span>there</span></p></div>
//! </body></html>"#;
//!
//! let result = extract(html).unwrap();
//! assert_eq!(result.title, "Real Title");
//! assert!(result.content_html.contains("<p>Hi there</p>"));
//! ```

use tracing::debug;

use crate::Result;
use crate::images::extract_fragment_images;
use crate::locate::{ContentLocator, LocatorRule, TitleLocator};
use crate::node::{ElementNode, Node};
use crate::parse::Document;
use crate::result::ScrapeResult;
use crate::sanitize::{SanitizeConfig, sanitize_container};

#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, fetch_url};

/// How the title is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleMode {
    /// Title only in the `title` field; `content_html` is the sanitized content alone.
    #[default]
    Separate,
    /// `content_html` becomes `<h1>{title}</h1><article>{content}</article>`.
    Embedded,
}

/// Configuration for the extraction pipeline.
///
/// # Example
///
/// ```rust
/// use pagecut_core::{ExtractConfig, LocatorRule, TitleMode};
///
/// let config = ExtractConfig::builder()
///     .content_rule(LocatorRule::tag("main"))
///     .title_mode(TitleMode::Embedded)
///     .default_alt("Figure")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Rules locating the content container.
    pub content_locator: ContentLocator,

    /// Rule locating the title heading.
    pub title_locator: TitleLocator,

    /// Whether the title is embedded into `content_html` (default: separate).
    pub title_mode: TitleMode,

    /// Sanitizer whitelist and defaults.
    pub sanitize: SanitizeConfig,

    /// Extension of the synthetic image filenames (default: `png`).
    pub image_name_extension: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            content_locator: ContentLocator::default(),
            title_locator: TitleLocator::default(),
            title_mode: TitleMode::Separate,
            sanitize: SanitizeConfig::default(),
            image_name_extension: "png".to_string(),
        }
    }
}

impl ExtractConfig {
    /// Creates a new builder for ExtractConfig.
    pub fn builder() -> ExtractConfigBuilder {
        ExtractConfigBuilder::new()
    }
}

/// Builder for ExtractConfig.
pub struct ExtractConfigBuilder {
    config: ExtractConfig,
    custom_rules: Option<Vec<LocatorRule>>,
}

impl ExtractConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ExtractConfig::default(), custom_rules: None }
    }

    /// Replaces the content locator.
    pub fn content_locator(mut self, locator: ContentLocator) -> Self {
        self.config.content_locator = locator;
        self.custom_rules = None;
        self
    }

    /// Adds a content rule.
    ///
    /// The first call discards the default rules; later calls append.
    pub fn content_rule(mut self, rule: LocatorRule) -> Self {
        self.custom_rules.get_or_insert_with(Vec::new).push(rule);
        self
    }

    /// Sets the title heading tag and class.
    pub fn title(mut self, tag: &str, class: &str) -> Self {
        self.config.title_locator = TitleLocator::new(tag, class);
        self
    }

    /// Sets the title mode.
    pub fn title_mode(mut self, mode: TitleMode) -> Self {
        self.config.title_mode = mode;
        self
    }

    /// Shorthand for [`TitleMode::Embedded`] / [`TitleMode::Separate`].
    pub fn embed_title(self, embed: bool) -> Self {
        self.title_mode(if embed { TitleMode::Embedded } else { TitleMode::Separate })
    }

    /// Replaces the sanitizer configuration.
    pub fn sanitize(mut self, sanitize: SanitizeConfig) -> Self {
        self.config.sanitize = sanitize;
        self
    }

    /// Sets the alt text given to images without one.
    pub fn default_alt(mut self, alt: &str) -> Self {
        self.config.sanitize.default_alt = alt.to_string();
        self
    }

    /// Sets the extension of synthetic image filenames.
    pub fn image_name_extension(mut self, ext: &str) -> Self {
        self.config.image_name_extension = ext.trim_start_matches('.').to_string();
        self
    }

    /// Builds the config.
    pub fn build(mut self) -> ExtractConfig {
        if let Some(rules) = self.custom_rules {
            self.config.content_locator = ContentLocator::new(rules);
        }
        self.config
    }
}

impl Default for ExtractConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main entry point for content extraction.
///
/// # Example
///
/// ```rust
/// use pagecut_core::Extractor;
///
/// let extractor = Extractor::new();
/// let html = "<html><body><article><p>Content <img src='//cdn.a.com/x.png'></p></article></body></html>";
/// let result = extractor.extract(html).unwrap();
/// assert_eq!(result.images, vec!["https://cdn.a.com/x.png"]);
/// assert_eq!(result.image_names, vec!["image1.png"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractConfig,
}

impl Extractor {
    /// Creates an extractor with default settings.
    pub fn new() -> Self {
        Self { config: ExtractConfig::default() }
    }

    /// Creates an extractor with a custom configuration.
    pub fn with_config(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extracts title, sanitized content and images from an HTML string.
    ///
    /// # Errors
    ///
    /// Returns [`PagecutError::ContentNotFound`](crate::PagecutError::ContentNotFound)
    /// when no content rule matches.
    pub fn extract(&self, html: &str) -> Result<ScrapeResult> {
        let doc = Document::parse(html);

        let title = self.config.title_locator.locate(&doc);
        let container = self.config.content_locator.locate(&doc)?.to_node();

        let fragment = sanitize_container(container, &self.config.sanitize);
        let images = extract_fragment_images(&fragment);
        let content = fragment.to_html();

        let content_html = match self.config.title_mode {
            TitleMode::Separate => content,
            TitleMode::Embedded => embed_title(&title, &content),
        };

        debug!(
            title_found = !title.is_empty(),
            content_len = content_html.len(),
            images = images.len(),
            "extraction complete"
        );

        Ok(ScrapeResult::new(title, content_html, images, &self.config.image_name_extension))
    }

    /// Fetches a URL and extracts its content.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_extract(&self, url: &str, fetch_config: &FetchConfig) -> Result<ScrapeResult> {
        let html = fetch_url(url, fetch_config).await?;
        self.extract(&html)
    }
}

fn embed_title(title: &str, content: &str) -> String {
    let heading = ElementNode::new("h1").with_child(Node::Text(title.to_string()));
    format!("{}<article>{}</article>", heading.outer_html(), content)
}

/// Convenience function for one-liner extraction with defaults.
pub fn extract(html: &str) -> Result<ScrapeResult> {
    Extractor::new().extract(html)
}

/// Convenience function for extraction with a custom configuration.
pub fn extract_with_config(html: &str, config: &ExtractConfig) -> Result<ScrapeResult> {
    Extractor::with_config(config.clone()).extract(html)
}

/// Convenience function: fetch and extract with default configurations.
///
/// # Example
///
/// ```no_run
/// use pagecut_core::fetch_and_extract;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let result = fetch_and_extract("https://www.safeguardglobal.com/resources/blog/example").await?;
///     println!("Title: {}", result.title);
///     Ok(())
/// }
/// ```
#[cfg(feature = "fetch")]
pub async fn fetch_and_extract(url: &str) -> Result<ScrapeResult> {
    Extractor::new().fetch_and_extract(url, &FetchConfig::default()).await
}

/// Convenience function: fetch and extract with custom configurations.
#[cfg(feature = "fetch")]
pub async fn fetch_and_extract_with_config(
    url: &str, extract_config: &ExtractConfig, fetch_config: &FetchConfig,
) -> Result<ScrapeResult> {
    Extractor::with_config(extract_config.clone())
        .fetch_and_extract(url, fetch_config)
        .await
}
