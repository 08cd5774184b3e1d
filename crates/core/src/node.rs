//! Owned element tree.
//!
//! The parser hands back a borrowed, read-only `scraper` tree. Sanitization
//! needs a tree it can take apart, so the content container is converted into
//! [`ElementNode`]s that the pipeline owns outright and rebuilds in place.

/// Elements serialized without an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are written verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A node in the owned tree: an element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(ElementNode),
    Text(String),
}

impl Node {
    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }
}

/// One HTML element with its attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<(String, String)>,
    /// Children in document order
    pub children: Vec<Node>,
}

impl ElementNode {
    /// Creates an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into().to_lowercase(), attrs: Vec::new(), children: Vec::new() }
    }

    /// Adds an attribute, builder style.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Appends a child, builder style.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Removes every attribute.
    pub fn clear_attrs(&mut self) {
        self.attrs.clear();
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<&Node> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Element(el) => stack.extend(el.children.iter().rev()),
                Node::Text(text) => out.push_str(text),
            }
        }
        out
    }

    /// Element descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::over(&self.children)
    }

    /// Serializes this element including its own tags.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        write_html(vec![Step::Open(self)], &mut out);
        out
    }

    /// Serializes only the children of this element.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        write_html(children_steps(&self.children, is_raw_text(&self.tag)), &mut out);
        out
    }
}

/// Drops the subtree level by level so that very deep trees do not exhaust
/// the stack.
impl Drop for ElementNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Node::Element(mut el) = node {
                pending.append(&mut el.children);
            }
        }
    }
}

/// An ordered run of top-level nodes without a wrapping element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Element nodes of the fragment in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::over(&self.nodes)
    }

    /// Serializes the fragment.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_html(children_steps(&self.nodes, false), &mut out);
        out
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Pre-order iterator over element nodes.
pub struct Descendants<'a> {
    stack: Vec<&'a ElementNode>,
}

impl<'a> Descendants<'a> {
    fn over(nodes: &'a [Node]) -> Self {
        Self { stack: nodes.iter().rev().filter_map(Node::as_element).collect() }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a ElementNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().filter_map(Node::as_element));
        Some(node)
    }
}

/// Pending serializer work, popped from the end.
enum Step<'a> {
    Open(&'a ElementNode),
    Text { text: &'a str, raw: bool },
    Close(&'a str),
}

fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag)
}

fn children_steps(nodes: &[Node], raw: bool) -> Vec<Step<'_>> {
    nodes.iter().rev().map(|node| step_for(node, raw)).collect()
}

fn step_for(node: &Node, raw: bool) -> Step<'_> {
    match node {
        Node::Element(el) => Step::Open(el),
        Node::Text(text) => Step::Text { text: text.as_str(), raw },
    }
}

fn write_html(mut stack: Vec<Step<'_>>, out: &mut String) {
    while let Some(step) = stack.pop() {
        match step {
            Step::Text { text, raw: true } => out.push_str(text),
            Step::Text { text, raw: false } => escape_text(text, out),
            Step::Close(tag) => {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            Step::Open(el) => {
                write_start_tag(el, out);
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    continue;
                }
                stack.push(Step::Close(&el.tag));
                let raw = is_raw_text(&el.tag);
                stack.extend(el.children.iter().rev().map(|child| step_for(child, raw)));
            }
        }
    }
}

fn write_start_tag(el: &ElementNode, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }
    out.push('>');
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    #[test]
    fn test_outer_html_with_attributes() {
        let el = ElementNode::new("a").with_attr("href", "/x?a=1&b=2").with_child(text("go"));
        assert_eq!(el.outer_html(), r#"<a href="/x?a=1&amp;b=2">go</a>"#);
    }

    #[test]
    fn test_void_element_has_no_end_tag() {
        let el = ElementNode::new("img").with_attr("src", "https://a.com/i.jpg").with_attr("alt", "Image");
        assert_eq!(el.outer_html(), r#"<img src="https://a.com/i.jpg" alt="Image">"#);
    }

    #[test]
    fn test_text_is_escaped() {
        let el = ElementNode::new("p").with_child(text("1 < 2 & 3 > 2"));
        assert_eq!(el.outer_html(), "<p>1 &lt; 2 &amp; 3 &gt; 2</p>");
    }

    #[test]
    fn test_raw_text_elements_are_verbatim() {
        let el = ElementNode::new("script").with_child(text("if (a < b) {}"));
        assert_eq!(el.outer_html(), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn test_attribute_quotes_escaped() {
        let el = ElementNode::new("img").with_attr("alt", r#"say "hi""#);
        assert_eq!(el.outer_html(), r#"<img alt="say &quot;hi&quot;">"#);
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let mut el = ElementNode::new("a").with_attr("href", "/one").with_attr("title", "t");
        el.set_attr("href", "/two");
        assert_eq!(el.attrs, vec![("href".into(), "/two".into()), ("title".into(), "t".into())]);
    }

    #[test]
    fn test_descendants_document_order() {
        let tree = ElementNode::new("div")
            .with_child(Node::Element(ElementNode::new("p").with_child(Node::Element(ElementNode::new("b")))))
            .with_child(text("x"))
            .with_child(Node::Element(ElementNode::new("ul")));

        let tags: Vec<&str> = tree.descendants().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["p", "b", "ul"]);
    }

    #[test]
    fn test_text_concatenates_descendants() {
        let tree = ElementNode::new("p")
            .with_child(text("Hi "))
            .with_child(Node::Element(ElementNode::new("em").with_child(text("there"))));
        assert_eq!(tree.text(), "Hi there");
    }

    #[test]
    fn test_fragment_to_html() {
        let frag = Fragment::new(vec![
            Node::Element(ElementNode::new("h2").with_child(text("A"))),
            text(" tail"),
        ]);
        assert_eq!(frag.to_html(), "<h2>A</h2> tail");
        assert!(!frag.is_empty());
    }

    fn nest(depth: usize) -> ElementNode {
        let mut inner = ElementNode::new("span").with_child(text("deep"));
        for _ in 1..depth {
            inner = ElementNode::new("span").with_child(Node::Element(inner));
        }
        inner
    }

    #[test]
    fn test_deep_tree_serializes_and_drops() {
        let depth = 100_000;
        let tree = nest(depth);

        assert_eq!(tree.text(), "deep");
        assert_eq!(tree.descendants().count(), depth - 1);

        let html = tree.outer_html();
        assert!(html.starts_with("<span><span>"));
        assert!(html.contains("deep</span></span>"));
        assert_eq!(html.matches("<span>").count(), depth);
        assert_eq!(tree.inner_html().len(), html.len() - "<span></span>".len());
    }
}
