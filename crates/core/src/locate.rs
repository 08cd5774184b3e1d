//! Content and title location.
//!
//! The content container is found by trying a list of [`LocatorRule`]s in
//! order; the first rule with any match wins and, within a rule, the first
//! matching element in document order is taken. The default rules target
//! one blog template: a `div` whose class list contains the width, flex and
//! gap utility classes, falling back to the first `<article>`.
//!
//! The title is found separately on the full document, since it lives
//! outside the content container.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::parse::{Document, Element};
use crate::{PagecutError, Result};

/// Class substrings identifying the default content container.
pub const DEFAULT_BODY_MARKERS: &[&str] = &["lg:w-2/3", "flex", "gap-10"];

/// Tag name of the default content container.
pub const DEFAULT_BODY_TAG: &str = "div";

/// Tag used when no container matches the primary rule.
pub const DEFAULT_FALLBACK_TAG: &str = "article";

/// Default title heading.
pub const DEFAULT_TITLE_TAG: &str = "h1";

/// Default title class.
pub const DEFAULT_TITLE_CLASS: &str = "text-brand-purple-black";

type ElementPredicate = dyn Fn(&Element<'_>) -> bool + Send + Sync;

/// One way of recognizing an element.
#[derive(Clone)]
pub enum LocatorRule {
    /// Tag matches and the raw `class` value contains every marker as a substring.
    ClassContainsAll { tag: String, markers: Vec<String> },
    /// Tag matches and one class token, or the whole `class` value, equals `class`.
    ClassEquals { tag: String, class: String },
    /// Any element with this tag.
    Tag(String),
    /// First element matching a CSS selector.
    Selector(String),
    /// Arbitrary predicate.
    Custom(Arc<ElementPredicate>),
}

impl LocatorRule {
    /// Builds a [`LocatorRule::ClassContainsAll`] rule.
    pub fn class_contains_all<I, S>(tag: &str, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LocatorRule::ClassContainsAll { tag: tag.to_lowercase(), markers: markers.into_iter().map(Into::into).collect() }
    }

    /// Builds a [`LocatorRule::ClassEquals`] rule.
    pub fn class_equals(tag: &str, class: &str) -> Self {
        LocatorRule::ClassEquals { tag: tag.to_lowercase(), class: class.to_string() }
    }

    /// Builds a [`LocatorRule::Tag`] rule.
    pub fn tag(tag: &str) -> Self {
        LocatorRule::Tag(tag.to_lowercase())
    }

    /// Builds a [`LocatorRule::Custom`] rule from a predicate.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Element<'_>) -> bool + Send + Sync + 'static,
    {
        LocatorRule::Custom(Arc::new(predicate))
    }

    /// Returns the first element in `doc` this rule accepts.
    ///
    /// # Errors
    ///
    /// Returns [`PagecutError::HtmlParseError`] for an invalid CSS selector.
    pub fn find<'a>(&self, doc: &'a Document) -> Result<Option<Element<'a>>> {
        match self {
            LocatorRule::Selector(css) => doc.select_first(css),
            _ => Ok(doc.find_first(|el| self.accepts(el))),
        }
    }

    fn accepts(&self, el: &Element<'_>) -> bool {
        match self {
            LocatorRule::ClassContainsAll { tag, markers } => {
                el.tag_name() == *tag
                    && el
                        .class_attr()
                        .is_some_and(|class| !class.is_empty() && markers.iter().all(|m| class.contains(m.as_str())))
            }
            LocatorRule::ClassEquals { tag, class } => {
                el.tag_name() == *tag && el.class_attr().is_some_and(|value| class_equals(value, class))
            }
            LocatorRule::Tag(tag) => el.tag_name() == *tag,
            LocatorRule::Selector(_) => false,
            LocatorRule::Custom(predicate) => predicate(el),
        }
    }
}

impl fmt::Debug for LocatorRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocatorRule::ClassContainsAll { tag, markers } => {
                f.debug_struct("ClassContainsAll").field("tag", tag).field("markers", markers).finish()
            }
            LocatorRule::ClassEquals { tag, class } => {
                f.debug_struct("ClassEquals").field("tag", tag).field("class", class).finish()
            }
            LocatorRule::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            LocatorRule::Selector(css) => f.debug_tuple("Selector").field(css).finish(),
            LocatorRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn class_equals(value: &str, class: &str) -> bool {
    value == class || value.split_whitespace().any(|token| token == class)
}

/// Finds the element holding the article body.
#[derive(Debug, Clone)]
pub struct ContentLocator {
    rules: Vec<LocatorRule>,
}

impl ContentLocator {
    /// Creates a locator trying `rules` in order.
    pub fn new(rules: Vec<LocatorRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[LocatorRule] {
        &self.rules
    }

    /// Appends a rule tried after the existing ones.
    pub fn push_rule(&mut self, rule: LocatorRule) {
        self.rules.push(rule);
    }

    /// Locates the content container.
    ///
    /// # Errors
    ///
    /// Returns [`PagecutError::ContentNotFound`] when no rule matches and
    /// [`PagecutError::HtmlParseError`] for an invalid selector rule.
    pub fn locate<'a>(&self, doc: &'a Document) -> Result<Element<'a>> {
        for (index, rule) in self.rules.iter().enumerate() {
            if let Some(el) = rule.find(doc)? {
                debug!(rule = ?rule, index, tag = %el.tag_name(), "content container located");
                return Ok(el);
            }
        }

        debug!(rules = self.rules.len(), "no content rule matched");
        Err(PagecutError::ContentNotFound)
    }
}

impl Default for ContentLocator {
    fn default() -> Self {
        Self::new(vec![
            LocatorRule::class_contains_all(DEFAULT_BODY_TAG, DEFAULT_BODY_MARKERS.iter().copied()),
            LocatorRule::tag(DEFAULT_FALLBACK_TAG),
        ])
    }
}

/// Finds the page title heading by exact class match.
#[derive(Debug, Clone)]
pub struct TitleLocator {
    rule: LocatorRule,
}

impl TitleLocator {
    pub fn new(tag: &str, class: &str) -> Self {
        Self { rule: LocatorRule::class_equals(tag, class) }
    }

    /// Trimmed text of the first matching heading, or an empty string.
    pub fn locate(&self, doc: &Document) -> String {
        doc.find_first(|el| self.rule.accepts(el))
            .map(|el| el.text().trim().to_string())
            .unwrap_or_default()
    }
}

impl Default for TitleLocator {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_TAG, DEFAULT_TITLE_CLASS)
    }
}
