//! HTML parsing and read-only DOM queries.
//!
//! This module provides the [`Document`] and [`Element`] types. Parsing is
//! delegated to `scraper` (html5ever), which recovers a best-effort tree from
//! malformed markup, so parsing itself never fails.
//!
//! # Example
//!
//! ```rust
//! use pagecut_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1 class="headline">Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let heading = doc.find_first(|el| el.tag_name() == "h1").unwrap();
//! assert_eq!(heading.text(), "Title");
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::node::{ElementNode, Node};
use crate::{PagecutError, Result};

/// Represents a parsed HTML document.
///
/// A Document wraps the parsed page and answers the queries the locators
/// need: first element matching a predicate, or a CSS selector.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pagecut_core::parse::Document;
    ///
    /// let doc = Document::parse("<html><body><h1>Title</h1></body></html>");
    /// assert_eq!(doc.select("h1").unwrap().len(), 1);
    /// ```
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Gets the raw HTML representation.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`PagecutError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Returns the first element matching a CSS selector.
    pub fn select_first(&'_ self, selector: &str) -> Result<Option<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).next().map(|el| Element { element: el }))
    }

    /// Returns the first element, in document order, for which `predicate` holds.
    pub fn find_first<F>(&'_ self, predicate: F) -> Option<Element<'_>>
    where
        F: Fn(&Element<'_>) -> bool,
    {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .map(|el| Element { element: el })
            .find(|el| predicate(el))
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| PagecutError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use pagecut_core::parse::Document;
///
/// let doc = Document::parse(r#"<a href="https://example.com">Link text</a>"#);
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Raw value of the `class` attribute, if any.
    pub fn class_attr(&self) -> Option<&'a str> {
        self.attr("class")
    }

    /// Copies this element and its subtree into an owned [`ElementNode`].
    ///
    /// Comments, doctypes and processing instructions are dropped.
    pub fn to_node(&self) -> ElementNode {
        convert(self.element)
    }
}

/// Walks the subtree with an explicit stack of open elements, each paired
/// with the iterator over its remaining children.
fn convert(element: ElementRef<'_>) -> ElementNode {
    let mut stack = vec![(shallow_copy(element.value()), element.children())];
    let mut converted = None;

    while let Some((node, children)) = stack.last_mut() {
        match children.next() {
            Some(child) => match child.value() {
                scraper::Node::Text(text) => node.children.push(Node::Text(text.to_string())),
                scraper::Node::Element(value) => stack.push((shallow_copy(value), child.children())),
                _ => {}
            },
            None => {
                if let Some((done, _)) = stack.pop() {
                    match stack.last_mut() {
                        Some((parent, _)) => parent.children.push(Node::Element(done)),
                        None => converted = Some(done),
                    }
                }
            }
        }
    }

    converted.unwrap_or_else(|| shallow_copy(element.value()))
}

fn shallow_copy(value: &scraper::node::Element) -> ElementNode {
    let mut node = ElementNode::new(value.name());
    node.attrs = value.attrs().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>Test Page</title>
        </head>
        <body>
            <h1 class="headline">Heading</h1>
            <div class="content"><!-- note --><p>Paragraph <b>1</b></p><img src="a.png"></div>
            <p class="content">Paragraph 2</p>
        </body>
        </html>
    "#;

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].text(), "Paragraph 2");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(PagecutError::HtmlParseError(_))));
    }

    #[test]
    fn test_find_first_document_order() {
        let doc = Document::parse(SAMPLE_HTML);
        let first = doc.find_first(|el| el.class_attr() == Some("content")).unwrap();

        assert_eq!(first.tag_name(), "div");
    }

    #[test]
    fn test_find_first_none() {
        let doc = Document::parse(SAMPLE_HTML);
        assert!(doc.find_first(|el| el.tag_name() == "article").is_none());
    }

    #[test]
    fn test_to_node_drops_comments() {
        let doc = Document::parse(SAMPLE_HTML);
        let div = doc.select_first("div.content").unwrap().unwrap();
        let node = div.to_node();

        assert_eq!(node.tag, "div");
        assert_eq!(node.attr("class"), Some("content"));
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.inner_html(), r#"<p>Paragraph <b>1</b></p><img src="a.png">"#);
    }

    #[test]
    fn test_to_node_keeps_sibling_order_across_levels() {
        let doc = Document::parse(r#"<div id="r">a<p>b<em>c</em>d</p>e<ul><li>f</li></ul></div>"#);
        let node = doc.select_first("#r").unwrap().unwrap().to_node();

        assert_eq!(node.attr("id"), Some("r"));
        assert_eq!(node.inner_html(), "a<p>b<em>c</em>d</p>e<ul><li>f</li></ul>");
    }

    #[test]
    fn test_to_node_deep_nesting() {
        let depth = 100_000;
        let html = format!("<div id=\"r\">{}x{}</div>", "<span>".repeat(depth), "</span>".repeat(depth));
        let doc = Document::parse(&html);
        let node = doc.select_first("#r").unwrap().unwrap().to_node();

        assert_eq!(node.descendants().count(), depth);
        assert_eq!(node.text(), "x");
    }
}
