//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to the arena DOM. Unlike a
//! browser-oriented conversion, every text node is kept, whitespace-only
//! ones included, because the output must serialize back byte for byte.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use nodeproc_dom::{Document, DomTree, NodeId};

/// HTML5 parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete HTML document string.
    ///
    /// Parse errors are swallowed: html5ever always recovers into some
    /// tree, and unknown custom tags are expected in this input.
    pub fn parse(&self, html: &str) -> Document {
        tracing::trace!("Parsing {} bytes of HTML", html.len());

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut tree = DomTree::new();
        let root = tree.root();
        self.convert_children(&dom.document, &mut tree, root);

        tracing::trace!("Parsed {} nodes", tree.len());
        Document::from_tree(tree)
    }

    fn convert_children(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, parent);
        }
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        let id = match &handle.data {
            RcNodeData::Document => {
                self.convert_children(handle, tree, parent);
                return;
            }
            RcNodeData::Doctype {
                name,
                public_id,
                system_id,
            } => tree.create_doctype(name, public_id, system_id),
            RcNodeData::Text { contents } => tree.create_text(&contents.borrow()),
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    // Freshly created element, cannot fail
                    let _ = tree.set_attribute(id, &attr.name.local, &attr.value);
                }

                // <template> keeps its content in a separate fragment
                if let Some(contents) = template_contents.borrow().as_ref() {
                    self.convert_children(contents, tree, id);
                }
                self.convert_children(handle, tree, id);
                id
            }
            // Processing instructions never reach an HTML tree
            RcNodeData::ProcessingInstruction { .. } => return,
        };

        if let Err(err) = tree.append_child(parent, id) {
            tracing::warn!("Dropping node {} during conversion: {}", id, err);
        }
    }
}
