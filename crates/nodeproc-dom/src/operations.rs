//! Structural Node Operations
//!
//! Element rename, replace-with-text and unwrap. These move subtrees but
//! never copy them, so ids held by callers for descendants stay valid.

use crate::{DomTree, NodeId};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0} not found")]
    NotFound(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("node {0} is not a text node")]
    NotText(NodeId),

    #[error("node {0} has no parent")]
    Detached(NodeId),

    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("cannot insert {child} into {parent}: hierarchy request error")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}

impl DomTree {
    fn attached_parent(&self, id: NodeId) -> DomResult<NodeId> {
        self.get(id).ok_or(DomError::NotFound(id))?;
        self.parent(id).ok_or(DomError::Detached(id))
    }

    /// Replace an element with a new element called `tag_name`.
    ///
    /// All children move to the new element. Attributes are copied only
    /// when `preserve_attributes` is set. The old element is detached and
    /// the new element's id is returned.
    pub fn rename_element(
        &mut self,
        element: NodeId,
        tag_name: &str,
        preserve_attributes: bool,
    ) -> DomResult<NodeId> {
        let parent = self.attached_parent(element)?;
        let attrs = self
            .get(element)
            .and_then(|n| n.as_element())
            .ok_or(DomError::NotAnElement(element))?
            .attrs
            .clone();

        let new_element = self.create_element(tag_name);
        if preserve_attributes {
            if let Some(data) = self.get_mut(new_element).and_then(|n| n.as_element_mut()) {
                data.attrs = attrs;
            }
        }

        self.insert_before(parent, new_element, element)?;
        for child in self.child_ids(element) {
            self.append_child(new_element, child)?;
        }
        self.detach(element)?;

        tracing::trace!("Renamed element {} to <{}> as {}", element, tag_name, new_element);
        Ok(new_element)
    }

    /// Replace a node with a text node.
    ///
    /// Block-level elements leave two `<br>` behind the text so the
    /// paragraph break survives. Returns the id of the new text node.
    pub fn replace_with_text(
        &mut self,
        element: NodeId,
        text: &str,
        is_block: bool,
    ) -> DomResult<NodeId> {
        let parent = self.attached_parent(element)?;

        let text_node = self.create_text(text);
        self.insert_before(parent, text_node, element)?;

        if is_block {
            for _ in 0..2 {
                let br = self.create_element("br");
                self.insert_before(parent, br, element)?;
            }
        }

        self.detach(element)?;
        Ok(text_node)
    }

    /// Remove a node but keep its children in its former position
    pub fn unwrap(&mut self, element: NodeId) -> DomResult<()> {
        let parent = self.attached_parent(element)?;
        for child in self.child_ids(element) {
            self.insert_before(parent, child, element)?;
        }
        self.detach(element)
    }

    /// Detach a node from the tree
    pub fn remove(&mut self, node: NodeId) -> DomResult<()> {
        self.attached_parent(node)?;
        self.detach(node)
    }
}
