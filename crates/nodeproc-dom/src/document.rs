//! Document - the parsed tree plus its structural landmarks

use crate::{DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty html/head/body shell
    pub fn new() -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes, linking cannot fail
        let _ = tree.append_child(NodeId::ROOT, html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Wrap a parsed tree, locating html/head/body
    pub fn from_tree(tree: DomTree) -> Self {
        let mut document = Self {
            tree,
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        };
        document.finalize();
        document
    }

    /// Re-resolve the cached landmark elements
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        self.html_element = tree
            .children(tree.root())
            .map(|(id, _)| id)
            .find(|&id| tree.is_element_named(id, "html"))
            .unwrap_or(NodeId::NONE);

        let find_in_html = |name: &str| {
            tree.children(self.html_element)
                .map(|(id, _)| id)
                .find(|&id| tree.is_element_named(id, name))
                .unwrap_or(NodeId::NONE)
        };
        self.head_element = find_in_html("head");
        self.body_element = find_in_html("body");
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_shell() {
        let doc = Document::new();
        assert!(doc.body().is_valid());
        assert_eq!(doc.tree().tag_name(doc.head()), Some("head"));
        assert_eq!(doc.tree().parent(doc.body()), Some(doc.document_element()));
    }

    #[test]
    fn test_from_tree_without_body() {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        tree.append_child(tree.root(), html).unwrap();

        let doc = Document::from_tree(tree);
        assert_eq!(doc.document_element(), html);
        assert!(!doc.body().is_valid());
    }
}
