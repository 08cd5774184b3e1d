//! Whitelist sanitization of the content container.
//!
//! The sanitizer consumes an owned subtree and rebuilds each child list:
//! every child is mapped to zero nodes (removed), its own sanitized children
//! (unwrapped) or one rewritten node (kept), and the results are flattened in
//! order. Unwrapped children go through the same mapping, so nested
//! disallowed tags are flattened all the way down.
//!
//! After sanitization every element is whitelisted, `img` carries exactly
//! `src` and `alt`, `a` carries at most `href`, and every other element has
//! no attributes. Running the sanitizer on its own output changes nothing.

use crate::images::img_source;
use crate::node::{ElementNode, Fragment, Node};
use crate::urls::fix_protocol_relative;

/// Tags allowed to survive sanitization.
pub const ALLOWED_TAGS: &[&str] = &["p", "h1", "h2", "h3", "ul", "ol", "li", "img", "strong", "em", "b", "i", "a"];

/// Tags removed together with everything inside them.
pub const REMOVED_TAGS: &[&str] = &["script", "style", "svg", "noscript"];

/// Configuration for the sanitizer
#[derive(Debug, Clone)]
pub struct SanitizeConfig {
    /// Tags kept (with rewritten attributes)
    pub allowed_tags: Vec<String>,
    /// Tags dropped along with their subtree
    pub removed_tags: Vec<String>,
    /// `alt` text used when an image has none
    pub default_alt: String,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            allowed_tags: ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
            removed_tags: REMOVED_TAGS.iter().map(|t| t.to_string()).collect(),
            default_alt: "Image".to_string(),
        }
    }
}

impl SanitizeConfig {
    fn is_allowed(&self, tag: &str) -> bool {
        self.allowed_tags.iter().any(|t| t == tag)
    }

    fn is_removed(&self, tag: &str) -> bool {
        self.removed_tags.iter().any(|t| t == tag)
    }
}

/// Sanitizes the children of a located container.
///
/// The container element itself is discarded; the returned fragment holds
/// its sanitized content.
pub fn sanitize_container(mut container: ElementNode, config: &SanitizeConfig) -> Fragment {
    Fragment::new(sanitize_nodes(std::mem::take(&mut container.children), config))
}

/// Sanitizes an already extracted fragment.
pub fn sanitize_fragment(fragment: Fragment, config: &SanitizeConfig) -> Fragment {
    Fragment::new(sanitize_nodes(fragment.nodes, config))
}

/// A kept element whose child list is being rebuilt.
struct Frame {
    /// `None` for the top-level list
    element: Option<ElementNode>,
    /// Input nodes still to visit, last one next
    pending: Vec<Node>,
    out: Vec<Node>,
}

impl Frame {
    fn new(element: Option<ElementNode>, mut nodes: Vec<Node>) -> Self {
        nodes.reverse();
        Self { element, out: Vec::with_capacity(nodes.len()), pending: nodes }
    }
}

/// Rebuilds a child list under the whitelist.
///
/// Unwrapped children are pushed back onto the pending list of the frame
/// they were found in, so they land in the same output list in order.
pub fn sanitize_nodes(nodes: Vec<Node>, config: &SanitizeConfig) -> Vec<Node> {
    let mut stack = vec![Frame::new(None, nodes)];

    while let Some(frame) = stack.last_mut() {
        match frame.pending.pop() {
            Some(Node::Text(text)) => frame.out.push(Node::Text(text)),
            Some(Node::Element(mut el)) => {
                if config.is_removed(&el.tag) {
                    continue;
                }
                if !config.is_allowed(&el.tag) {
                    frame.pending.extend(std::mem::take(&mut el.children).into_iter().rev());
                    continue;
                }
                if let Some(mut kept) = rewrite_attrs(el, config) {
                    let children = std::mem::take(&mut kept.children);
                    stack.push(Frame::new(Some(kept), children));
                }
            }
            None => {
                let Some(Frame { element, out, .. }) = stack.pop() else { break };
                match (element, stack.last_mut()) {
                    (Some(mut el), Some(parent)) => {
                        el.children = out;
                        parent.out.push(Node::Element(el));
                    }
                    _ => return out,
                }
            }
        }
    }

    Vec::new()
}

/// Rewrites attributes of a whitelisted element; `None` drops an image
/// without any source.
fn rewrite_attrs(mut el: ElementNode, config: &SanitizeConfig) -> Option<ElementNode> {
    match el.tag.as_str() {
        "img" => {
            let src = fix_protocol_relative(img_source(&el)?);
            let alt = el
                .attr("alt")
                .map(str::trim)
                .filter(|alt| !alt.is_empty())
                .unwrap_or(config.default_alt.as_str())
                .to_string();
            el.attrs = vec![("src".to_string(), src), ("alt".to_string(), alt)];
        }
        "a" => {
            let href = el.attr("href").map(str::trim).unwrap_or_default().to_string();
            el.clear_attrs();
            if !href.is_empty() {
                el.set_attr("href", href);
            }
        }
        _ => el.clear_attrs(),
    }

    Some(el)
}
