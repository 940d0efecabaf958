//! HTML Serialization (innerHTML/outerHTML)
//!
//! Tag names are written exactly as stored, so mixed-case placeholder tags
//! such as `<wcfNode-…>` come out unchanged for the substitution pass.
//! U+00A0 is written as `&nbsp;`, matching what libxml and html5ever emit.

use nodeproc_dom::{DomTree, NodeData, NodeId};

/// HTML serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer;

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr",
    "img", "input", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

fn is_one_of(tag: &str, list: &[&str]) -> bool {
    list.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_children(tree, node_id, &mut output);
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output);
        output
    }

    /// Serialize a node and its descendants
    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => {
                self.serialize_children(tree, node_id, output);
            }
            NodeData::Element(elem) => {
                let tag = tree.resolve(elem.name);

                output.push('<');
                output.push_str(tag);
                for attr in &elem.attrs {
                    output.push(' ');
                    output.push_str(tree.resolve(attr.name));
                    output.push_str("=\"");
                    escape_attribute(&attr.value, output);
                    output.push('"');
                }
                output.push('>');

                if is_one_of(tag, VOID_ELEMENTS) {
                    return;
                }

                if is_one_of(tag, RAW_TEXT_ELEMENTS) {
                    self.serialize_children_raw(tree, node_id, output);
                } else {
                    self.serialize_children(tree, node_id, output);
                }

                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeData::Text(text) => {
                escape_text(text, output);
            }
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype { name, .. } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(name);
                output.push('>');
            }
        }
    }

    fn serialize_children(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (child_id, _) in tree.children(parent_id) {
            self.serialize_node(tree, child_id, output);
        }
    }

    fn serialize_children_raw(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (child_id, child) in tree.children(parent_id) {
            match &child.data {
                NodeData::Text(text) => output.push_str(text),
                _ => self.serialize_node(tree, child_id, output),
            }
        }
    }
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{00A0}' => output.push_str("&nbsp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{00A0}' => output.push_str("&nbsp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Utility: Get innerHTML of an element
pub fn get_inner_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node_id)
}

/// Utility: Get outerHTML of an element
pub fn get_outer_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        let mut output = String::new();
        escape_text("Hello <world> & \"friends\"\u{00A0}", &mut output);
        assert_eq!(output, "Hello &lt;world&gt; &amp; \"friends\"&nbsp;");
    }

    #[test]
    fn test_escape_attribute() {
        let mut output = String::new();
        escape_attribute("Hello <world> & \"friends\"", &mut output);
        assert_eq!(output, "Hello &lt;world&gt; &amp; &quot;friends&quot;");
    }

    #[test]
    fn test_void_elements() {
        assert!(is_one_of("br", VOID_ELEMENTS));
        assert!(is_one_of("IMG", VOID_ELEMENTS));
        assert!(!is_one_of("div", VOID_ELEMENTS));
    }

    #[test]
    fn test_serialize_built_tree() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let text = tree.create_text("a < b");
        let br = tree.create_element("br");
        let placeholder = tree.create_element("wcfNode-abcx1");
        let inner = tree.create_text("kept");
        tree.append_child(tree.root(), p).unwrap();
        tree.append_child(p, text).unwrap();
        tree.append_child(p, br).unwrap();
        tree.append_child(p, placeholder).unwrap();
        tree.append_child(placeholder, inner).unwrap();
        tree.set_attribute(p, "class", "x").unwrap();

        assert_eq!(
            get_outer_html(&tree, p),
            r#"<p class="x">a &lt; b<br><wcfNode-abcx1>kept</wcfNode-abcx1></p>"#
        );
        assert_eq!(
            get_inner_html(&tree, p),
            "a &lt; b<br><wcfNode-abcx1>kept</wcfNode-abcx1>"
        );
    }

    #[test]
    fn test_raw_text_not_escaped() {
        let mut tree = DomTree::new();
        let style = tree.create_element("style");
        let css = tree.create_text("a > b { color: red }");
        tree.append_child(tree.root(), style).unwrap();
        tree.append_child(style, css).unwrap();
        assert_eq!(get_outer_html(&tree, style), "<style>a > b { color: red }</style>");
    }

    #[test]
    fn test_comment_round_trip() {
        let mut tree = DomTree::new();
        let comment = tree.create_comment(" META_CODE_INNER_CONTENT ");
        tree.append_child(tree.root(), comment).unwrap();
        assert_eq!(
            get_inner_html(&tree, tree.root()),
            "<!-- META_CODE_INNER_CONTENT -->"
        );
    }
}
