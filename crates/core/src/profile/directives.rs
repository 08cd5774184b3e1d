use crate::error::{PagecutError, Result};
use crate::extract::{ExtractConfig, TitleMode};
use crate::locate::{
    ContentLocator, DEFAULT_BODY_MARKERS, DEFAULT_BODY_TAG, DEFAULT_FALLBACK_TAG, DEFAULT_TITLE_CLASS,
    DEFAULT_TITLE_TAG, LocatorRule, TitleLocator,
};

/// Represents a single profile directive
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Title heading
    TitleTag(String),
    TitleClass(String),

    /// Content container
    BodyTag(String),
    BodyClassContains(String),
    BodySelector(String),
    FallbackTag(String),

    /// Output options
    EmbedTitle(bool),
    DefaultAlt(String),

    /// Transport
    AllowedDomain(String),
}

/// Extraction profile for one site
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteProfile {
    pub title_tag: Option<String>,
    pub title_class: Option<String>,

    pub body_tag: Option<String>,
    /// Class substrings the primary container must all contain
    pub body_class_contains: Vec<String>,
    /// CSS selectors tried after the primary rule, in order
    pub body_selectors: Vec<String>,
    pub fallback_tag: Option<String>,

    pub embed_title: Option<bool>,
    pub default_alt: Option<String>,

    pub allowed_domains: Vec<String>,
}

impl SiteProfile {
    /// Create a new empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directive to this profile
    pub fn add_directive(&mut self, directive: Directive) {
        match directive {
            Directive::TitleTag(tag) => self.title_tag = Some(tag),
            Directive::TitleClass(class) => self.title_class = Some(class),
            Directive::BodyTag(tag) => self.body_tag = Some(tag),
            Directive::BodyClassContains(marker) => self.body_class_contains.push(marker),
            Directive::BodySelector(css) => self.body_selectors.push(css),
            Directive::FallbackTag(tag) => self.fallback_tag = Some(tag),
            Directive::EmbedTitle(value) => self.embed_title = Some(value),
            Directive::DefaultAlt(alt) => self.default_alt = Some(alt),
            Directive::AllowedDomain(domain) => self.allowed_domains.push(domain),
        }
    }

    /// Merge another profile into this one.
    ///
    /// Scalar options and a non-empty marker list in `other` override;
    /// selectors and allowed domains accumulate.
    pub fn merge(&mut self, other: &SiteProfile) {
        if other.title_tag.is_some() {
            self.title_tag = other.title_tag.clone();
        }
        if other.title_class.is_some() {
            self.title_class = other.title_class.clone();
        }
        if other.body_tag.is_some() {
            self.body_tag = other.body_tag.clone();
        }
        if !other.body_class_contains.is_empty() {
            self.body_class_contains = other.body_class_contains.clone();
        }
        self.body_selectors.extend(other.body_selectors.iter().cloned());
        if other.fallback_tag.is_some() {
            self.fallback_tag = other.fallback_tag.clone();
        }
        if other.embed_title.is_some() {
            self.embed_title = other.embed_title;
        }
        if other.default_alt.is_some() {
            self.default_alt = other.default_alt.clone();
        }
        for domain in &other.allowed_domains {
            if !self.allowed_domains.contains(domain) {
                self.allowed_domains.push(domain.clone());
            }
        }
    }

    /// Check if this profile sets nothing
    pub fn is_empty(&self) -> bool {
        *self == SiteProfile::default()
    }

    /// Content rules: primary class rule, then selectors, then the fallback tag.
    pub fn content_locator(&self) -> ContentLocator {
        let tag = self.body_tag.as_deref().unwrap_or(DEFAULT_BODY_TAG);
        let primary = if self.body_class_contains.is_empty() {
            LocatorRule::class_contains_all(tag, DEFAULT_BODY_MARKERS.iter().copied())
        } else {
            LocatorRule::class_contains_all(tag, self.body_class_contains.iter().cloned())
        };

        let mut rules = vec![primary];
        rules.extend(self.body_selectors.iter().map(|css| LocatorRule::Selector(css.clone())));
        rules.push(LocatorRule::tag(self.fallback_tag.as_deref().unwrap_or(DEFAULT_FALLBACK_TAG)));

        ContentLocator::new(rules)
    }

    pub fn title_locator(&self) -> TitleLocator {
        TitleLocator::new(
            self.title_tag.as_deref().unwrap_or(DEFAULT_TITLE_TAG),
            self.title_class.as_deref().unwrap_or(DEFAULT_TITLE_CLASS),
        )
    }

    /// Build an extraction config; unset directives keep their defaults.
    pub fn extract_config(&self) -> ExtractConfig {
        let mut config = ExtractConfig {
            content_locator: self.content_locator(),
            title_locator: self.title_locator(),
            ..ExtractConfig::default()
        };

        if let Some(embed) = self.embed_title {
            config.title_mode = if embed { TitleMode::Embedded } else { TitleMode::Separate };
        }
        if let Some(alt) = &self.default_alt {
            config.sanitize.default_alt = alt.clone();
        }

        config
    }
}

/// Parse a directive line
pub fn parse_directive(line: &str) -> Result<Directive> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Err(PagecutError::ProfileError("Empty or comment line".to_string()));
    }

    let Some((key, value)) = line.split_once(':') else {
        return Err(PagecutError::ProfileError(format!("Invalid directive format: {}", line)));
    };

    let key = key.trim();
    let value = value.trim();

    if value.is_empty() {
        return Err(PagecutError::ProfileError(format!("Missing value for directive: {}", key)));
    }

    match key {
        "title_tag" => Ok(Directive::TitleTag(value.to_lowercase())),
        "title_class" => Ok(Directive::TitleClass(value.to_string())),
        "body_tag" => Ok(Directive::BodyTag(value.to_lowercase())),
        "body_class_contains" => Ok(Directive::BodyClassContains(value.to_string())),
        "body_selector" => Ok(Directive::BodySelector(value.to_string())),
        "fallback_tag" => Ok(Directive::FallbackTag(value.to_lowercase())),
        "embed_title" => Ok(Directive::EmbedTitle(parse_boolean(value)?)),
        "default_alt" => Ok(Directive::DefaultAlt(value.to_string())),
        "allowed_domain" => Ok(Directive::AllowedDomain(value.to_lowercase())),
        _ => Err(PagecutError::ProfileError(format!("Unknown directive: {}", key))),
    }
}

/// Parse a boolean directive value
fn parse_boolean(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        _ => Err(PagecutError::ProfileError(format!("Invalid boolean value: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extractor;

    #[test]
    fn test_parse_directive_title() {
        assert_eq!(parse_directive("title_tag: H2").unwrap(), Directive::TitleTag("h2".to_string()));
        assert_eq!(
            parse_directive("title_class: post-title").unwrap(),
            Directive::TitleClass("post-title".to_string())
        );
    }

    #[test]
    fn test_parse_directive_value_with_colon() {
        let directive = parse_directive("body_class_contains: lg:w-2/3").unwrap();
        assert_eq!(directive, Directive::BodyClassContains("lg:w-2/3".to_string()));
    }

    #[test]
    fn test_parse_directive_boolean() {
        assert_eq!(parse_directive("embed_title: yes").unwrap(), Directive::EmbedTitle(true));
        assert_eq!(parse_directive("embed_title: false").unwrap(), Directive::EmbedTitle(false));
        assert!(parse_directive("embed_title: maybe").is_err());
    }

    #[test]
    fn test_parse_directive_invalid() {
        assert!(parse_directive("invalid_directive").is_err());
        assert!(parse_directive("strip: //div").is_err());
        assert!(parse_directive("title_tag:").is_err());
    }

    #[test]
    fn test_empty_profile_matches_defaults() {
        let profile = SiteProfile::new();
        assert!(profile.is_empty());

        let config = profile.extract_config();
        let defaults = ExtractConfig::default();
        assert_eq!(config.title_mode, defaults.title_mode);
        assert_eq!(config.sanitize.default_alt, defaults.sanitize.default_alt);
        assert_eq!(config.content_locator.rules().len(), 2);
    }

    #[test]
    fn test_profile_rule_order() {
        let mut profile = SiteProfile::new();
        profile.add_directive(Directive::BodyClassContains("post".to_string()));
        profile.add_directive(Directive::BodySelector("main .content".to_string()));
        profile.add_directive(Directive::FallbackTag("main".to_string()));

        let rules = profile.content_locator().rules().to_vec();
        assert_eq!(rules.len(), 3);
        assert!(matches!(&rules[0], LocatorRule::ClassContainsAll { tag, markers } if tag == "div" && markers == &["post"]));
        assert!(matches!(&rules[1], LocatorRule::Selector(css) if css == "main .content"));
        assert!(matches!(&rules[2], LocatorRule::Tag(tag) if tag == "main"));
    }

    #[test]
    fn test_profile_drives_extraction() {
        let mut profile = SiteProfile::new();
        profile.add_directive(Directive::TitleTag("h2".to_string()));
        profile.add_directive(Directive::TitleClass("headline".to_string()));
        profile.add_directive(Directive::BodySelector("section.entry".to_string()));
        profile.add_directive(Directive::EmbedTitle(true));
        profile.add_directive(Directive::DefaultAlt("Figure".to_string()));

        let html = r#"<html><body>
            <h2 class="headline">Other Site</h2>
            <section class="entry"><p>Body</p><img src="https://b.com/x.png"></section>
        </body></html>"#;
        let result = Extractor::with_config(profile.extract_config()).extract(html).unwrap();

        assert_eq!(result.title, "Other Site");
        assert_eq!(
            result.content_html,
            r#"<h1>Other Site</h1><article><p>Body</p><img src="https://b.com/x.png" alt="Figure"></article>"#
        );
    }

    #[test]
    fn test_site_profile_merge() {
        let mut base = SiteProfile::new();
        base.add_directive(Directive::TitleTag("h1".to_string()));
        base.add_directive(Directive::BodyClassContains("a".to_string()));
        base.add_directive(Directive::BodySelector("main".to_string()));
        base.add_directive(Directive::EmbedTitle(true));

        let mut over = SiteProfile::new();
        over.add_directive(Directive::BodyClassContains("b".to_string()));
        over.add_directive(Directive::BodySelector("section".to_string()));
        over.add_directive(Directive::EmbedTitle(false));

        base.merge(&over);

        assert_eq!(base.title_tag.as_deref(), Some("h1"));
        assert_eq!(base.body_class_contains, vec!["b"]);
        assert_eq!(base.body_selectors, vec!["main", "section"]);
        assert_eq!(base.embed_title, Some(false));
    }
}
