//! Image resource extraction.
//!
//! Pages reference images through several unrelated encodings: direct and
//! lazy-load attributes on `<img>`, responsive `srcset` on `<img>` and
//! `<source>`, and `url(...)` literals in inline styles. The extractor walks
//! a subtree, pulls one candidate (or several, for styles) from each element,
//! normalizes it with [`normalize_image_url`] and keeps the first occurrence
//! of every distinct URL.
//!
//! Discovery order is three document-order passes: `img` elements, then
//! `source` elements, then inline styles.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::node::{ElementNode, Fragment};
use crate::urls::normalize_image_url;

/// `<img>` attributes holding a source URL, highest priority first.
pub const IMG_SOURCE_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src", "data-original", "data-background"];

static CSS_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\((.*?)\)").expect("CSS_URL_RE is a valid static regex pattern"));

/// Deduplicating, insertion-ordered set of normalized URLs.
#[derive(Debug, Default, Clone)]
pub struct ImageSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a URL; returns `false` if it was already present.
    pub fn insert(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.ordered.push(url);
        true
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

/// First URL of the first comma-separated `srcset` entry, size descriptor dropped.
///
/// ```rust
/// use pagecut_core::images::first_srcset_candidate;
///
/// assert_eq!(first_srcset_candidate("a.jpg 1x, b.jpg 2x"), Some("a.jpg"));
/// assert_eq!(first_srcset_candidate(" , b.jpg 2x"), None);
/// ```
pub fn first_srcset_candidate(srcset: &str) -> Option<&str> {
    srcset.split(',').next()?.split_whitespace().next()
}

/// Raw source of an `<img>`: the first non-empty priority attribute, else the
/// first `srcset` candidate.
pub fn img_source(el: &ElementNode) -> Option<&str> {
    IMG_SOURCE_ATTRS
        .iter()
        .filter_map(|name| el.attr(name))
        .find(|value| !value.is_empty())
        .or_else(|| el.attr("srcset").and_then(first_srcset_candidate))
}

/// Every `url(...)` argument in a style string, with quotes and whitespace trimmed.
pub fn style_urls(style: &str) -> impl Iterator<Item = &str> {
    CSS_URL_RE.captures_iter(style).filter_map(|cap| cap.get(1)).map(|m| {
        m.as_str()
            .trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace())
    })
}

/// Collects image URLs from an element and all of its descendants.
pub fn extract_images(root: &ElementNode) -> Vec<String> {
    let elements: Vec<&ElementNode> = std::iter::once(root).chain(root.descendants()).collect();
    collect(&elements)
}

/// Collects image URLs from every element of a fragment.
pub fn extract_fragment_images(fragment: &Fragment) -> Vec<String> {
    let elements: Vec<&ElementNode> = fragment.descendants().collect();
    collect(&elements)
}

fn collect(elements: &[&ElementNode]) -> Vec<String> {
    let mut images = ImageSet::new();

    for el in elements.iter().filter(|el| el.tag == "img") {
        if let Some(raw) = img_source(el) {
            push_candidate(&mut images, raw);
        }
    }

    for el in elements.iter().filter(|el| el.tag == "source") {
        if let Some(raw) = el.attr("srcset").and_then(first_srcset_candidate) {
            push_candidate(&mut images, raw);
        }
    }

    for el in elements {
        if let Some(style) = el.attr("style") {
            for raw in style_urls(style) {
                push_candidate(&mut images, raw);
            }
        }
    }

    images.into_vec()
}

fn push_candidate(images: &mut ImageSet, raw: &str) {
    match normalize_image_url(raw) {
        Some(url) => {
            images.insert(url);
        }
        None => trace!(candidate = raw, "skipping unusable image reference"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;
    use rstest::rstest;

    fn container(body: &str) -> ElementNode {
        let html = format!("<html><body><div id=\"root\">{}</div></body></html>", body);
        let doc = Document::parse(&html);
        doc.select_first("#root").unwrap().unwrap().to_node()
    }

    #[rstest]
    #[case(r#"<img src="https://a.com/1.png" data-src="https://a.com/2.png">"#, "https://a.com/1.png")]
    #[case(r#"<img src="" data-src="//a.com/2.png">"#, "https://a.com/2.png")]
    #[case(r#"<img data-lazy-src="https://a.com/3.png">"#, "https://a.com/3.png")]
    #[case(r#"<img data-original="https://a.com/4.png">"#, "https://a.com/4.png")]
    #[case(r#"<img data-background="https://a.com/5.png">"#, "https://a.com/5.png")]
    #[case(r#"<img srcset="//a.com/s.png 480w, //a.com/l.png 1080w">"#, "https://a.com/s.png")]
    fn test_img_attribute_priority(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(extract_images(&container(body)), vec![expected.to_string()]);
    }

    #[test]
    fn test_img_priority_attr_beats_srcset() {
        let root = container(r#"<img data-src="https://a.com/d.png" srcset="https://a.com/s.png 1x">"#);
        assert_eq!(extract_images(&root), vec!["https://a.com/d.png"]);
    }

    #[test]
    fn test_rejected_source_contributes_nothing() {
        let root = container(r#"<img src="/relative.png" data-src="https://a.com/ignored.png">"#);
        assert!(extract_images(&root).is_empty());
    }

    #[test]
    fn test_source_elements_use_srcset_only() {
        let root = container(
            r#"<picture><source src="https://a.com/no.png"><source srcset="//cdn.x.com/p.webp 1x, //cdn.x.com/p2.webp 2x"></picture>"#,
        );
        assert_eq!(extract_images(&root), vec!["https://cdn.x.com/p.webp"]);
    }

    #[test]
    fn test_inline_style_multiple_urls() {
        let root = container(
            r#"<div style="background: url('//a.com/bg.png'), url( &quot;https://a.com/bg2.png&quot; ); mask: url(data:image/png;base64,AA)"></div>"#,
        );
        assert_eq!(extract_images(&root), vec!["https://a.com/bg.png", "https://a.com/bg2.png"]);
    }

    #[test]
    fn test_discovery_order_img_then_source_then_style() {
        let root = container(
            r#"<div style="background:url(https://a.com/style.png)"></div>
               <picture><source srcset="https://a.com/source.png"></picture>
               <img src="https://a.com/img.png">"#,
        );
        assert_eq!(
            extract_images(&root),
            vec!["https://a.com/img.png", "https://a.com/source.png", "https://a.com/style.png"]
        );
    }

    #[test]
    fn test_dedup_across_encodings() {
        let root = container(
            r#"<img data-src="//a.com/same.png">
               <span style="background:url(https://a.com/same.png)"></span>
               <img src="https://a.com/same.png">"#,
        );
        assert_eq!(extract_images(&root), vec!["https://a.com/same.png"]);
    }

    #[test]
    fn test_protocol_relative_on_every_path() {
        let root = container(
            r#"<img src="//cdn.example.com/a.png">
               <img srcset="//cdn.example.com/b.png 2x">
               <source srcset="//cdn.example.com/c.png">
               <i style="background-image:url(//cdn.example.com/d.png)"></i>"#,
        );
        assert_eq!(
            extract_images(&root),
            vec![
                "https://cdn.example.com/a.png",
                "https://cdn.example.com/b.png",
                "https://cdn.example.com/c.png",
                "https://cdn.example.com/d.png",
            ]
        );
    }

    #[test]
    fn test_empty_first_srcset_entry_skipped() {
        let root = container(r#"<img srcset=" , https://a.com/second.png 2x">"#);
        assert!(extract_images(&root).is_empty());
    }

    #[test]
    fn test_root_element_style_included() {
        let root = ElementNode::new("div").with_attr("style", "background:url(https://a.com/root.png)");
        assert_eq!(extract_images(&root), vec!["https://a.com/root.png"]);
    }

    #[test]
    fn test_image_set_keeps_first_position() {
        let mut set = ImageSet::new();
        assert!(set.insert("b".into()));
        assert!(set.insert("a".into()));
        assert!(!set.insert("b".into()));
        assert_eq!(set.len(), 2);
        assert_eq!(set.into_vec(), vec!["b", "a"]);
    }
}
