//! Owned SVG document tree
//!
//! `roxmltree` gives a read-only view of the renderer output; the rewriter
//! needs to mutate paint attributes in place, so the document is copied into
//! an owned tree here and serialized back after the walk. Text and comment
//! nodes are carried through verbatim so the output keeps the renderer's
//! formatting; namespace declarations visible on the source root are
//! re-emitted on the output root so `xlink:`-prefixed attributes stay valid.

use crate::RecolorError;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A node in the owned tree
#[derive(Debug, Clone, PartialEq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
    Comment(String),
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgElement {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
}

impl SvgElement {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }

    /// Child elements, mutably; text and comment nodes are skipped
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut SvgElement> {
        self.children.iter_mut().filter_map(|node| match node {
            SvgNode::Element(el) => Some(el),
            _ => None,
        })
    }
}

/// Parse raw renderer output into an owned tree rooted at `<svg>`.
///
/// Malformed markup or a non-`svg` root is fatal for the job; there is no
/// partial output.
pub fn parse(raw: &str) -> Result<SvgElement, RecolorError> {
    let doc = roxmltree::Document::parse(raw)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(RecolorError::NotSvg {
            found: root.tag_name().name().to_string(),
        });
    }
    Ok(convert_element(root, true))
}

fn convert_element(node: roxmltree::Node<'_, '_>, is_root: bool) -> SvgElement {
    let mut attrs = Vec::new();

    if is_root {
        for ns in node.namespaces() {
            if ns.uri() == XML_NS {
                continue;
            }
            let name = match ns.name() {
                Some(prefix) => format!("xmlns:{prefix}"),
                None => "xmlns".to_string(),
            };
            attrs.push((name, ns.uri().to_string()));
        }
    }

    for attr in node.attributes() {
        // prefixed attributes (xlink:href) keep their prefix so references
        // survive the round trip
        let name = match attr.namespace().and_then(|uri| node.lookup_prefix(uri)) {
            Some(prefix) => format!("{prefix}:{}", attr.name()),
            None => attr.name().to_string(),
        };
        attrs.push((name, attr.value().to_string()));
    }

    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(SvgNode::Element(convert_element(child, false)));
        } else if child.is_text() {
            children.push(SvgNode::Text(child.text().unwrap_or_default().to_string()));
        } else if child.is_comment() {
            children.push(SvgNode::Comment(
                child.text().unwrap_or_default().to_string(),
            ));
        }
    }

    SvgElement {
        tag: node.tag_name().name().to_string(),
        attrs,
        children,
    }
}

/// Serialize the tree back to markup
pub fn serialize(root: &SvgElement) -> String {
    let mut out = String::new();
    write_element(&mut out, root);
    out
}

fn write_element(out: &mut String, el: &SvgElement) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(out, value, true);
        out.push('"');
    }
    if el.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &el.children {
        match child {
            SvgNode::Element(child) => write_element(out, child),
            SvgNode::Text(text) => escape_into(out, text, false),
            SvgNode::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
        }
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}

fn escape_into(out: &mut String, value: &str, in_attr: bool) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
