//! DOM Tree (arena-based allocation)

use crate::node::{ElementData, Node, NodeData};
use crate::{DomError, DomResult, InternedString, NodeId, StringInterner};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Document)],
            interner: StringInterner::new(),
        }
    }

    /// Document root
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    // ------------------------------------------------------------------
    // Node creation
    // ------------------------------------------------------------------

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::new(NodeData::Element(ElementData::new(name))))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Text(text.to_string())))
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(text.to_string())))
    }

    /// Create a detached doctype
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::new(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    // ------------------------------------------------------------------
    // Linking
    // ------------------------------------------------------------------

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_valid() {
            if current == ancestor {
                return true;
            }
            current = match self.get(current) {
                Some(n) => n.parent,
                None => return false,
            };
        }
        false
    }

    /// Unlink a node from its parent and siblings. Its subtree stays intact.
    pub fn detach(&mut self, id: NodeId) -> DomResult<()> {
        let (parent, prev, next) = {
            let node = self.node(id)?;
            (node.parent, node.prev_sibling, node.next_sibling)
        };

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else if parent.is_valid() {
            self.nodes[parent.index()].first_child = next;
        }

        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else if parent.is_valid() {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
        Ok(())
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, NodeId::NONE)
    }

    /// Insert `new_child` before `reference`, or append if `reference` is NONE
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        reference: NodeId,
    ) -> DomResult<()> {
        self.node(parent)?;
        self.node(new_child)?;
        if new_child == NodeId::ROOT || self.is_inclusive_ancestor(new_child, parent) {
            return Err(DomError::HierarchyRequest {
                parent,
                child: new_child,
            });
        }
        if reference.is_valid() {
            if reference == new_child {
                return Ok(());
            }
            if self.node(reference)?.parent != parent {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
        }

        self.detach(new_child)?;

        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };

        {
            let node = &mut self.nodes[new_child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = new_child;
        } else {
            self.nodes[parent.index()].first_child = new_child;
        }

        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = new_child;
        } else {
            self.nodes[parent.index()].last_child = new_child;
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Iterate over the direct children of a node
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(parent).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Snapshot of the child ids, safe to hold across mutations
    pub fn child_ids(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent).map(|(id, _)| id).collect()
    }

    /// Pre-order iteration over every descendant of `root` (excluding it)
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root,
            next: self.get(root).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    // ------------------------------------------------------------------
    // Element and text accessors
    // ------------------------------------------------------------------

    /// Tag name of an element, case preserved
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get(id)
            .and_then(|n| n.as_element())
            .map(|e| self.resolve(e.name))
    }

    /// ASCII case-insensitive tag comparison, as HTML does
    pub fn is_element_named(&self, id: NodeId, name: &str) -> bool {
        self.tag_name(id)
            .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
    }

    fn element(&self, id: NodeId) -> DomResult<&ElementData> {
        self.node(id)?.as_element().ok_or(DomError::NotAnElement(id))
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        self.get_mut(id)
            .ok_or(DomError::NotFound(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let name = self.interner.lookup(name)?;
        self.element(id).ok()?.get_attr(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        // Check before interning so a bad id does not grow the interner
        self.element(id)?;
        let name = self.interner.intern(name);
        self.element_mut(id)?.set_attr(name, value.to_string());
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<Option<String>> {
        let Some(name) = self.interner.lookup(name) else {
            self.element(id)?;
            return Ok(None);
        };
        Ok(self.element_mut(id)?.remove_attr(name))
    }

    /// Attribute name/value pairs in source order
    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        match self.element(id) {
            Ok(elem) => elem
                .attrs
                .iter()
                .map(|a| (self.resolve(a.name), a.value.as_str()))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Data of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| n.as_text())
    }

    /// Replace the data of a text node
    pub fn set_text(&mut self, id: NodeId, text: String) -> DomResult<()> {
        match &mut self.get_mut(id).ok_or(DomError::NotFound(id))?.data {
            NodeData::Text(content) => {
                *content = text;
                Ok(())
            }
            _ => Err(DomError::NotText(id)),
        }
    }

    /// Concatenated text of a node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.text(d))
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Pre-order descendant iterator without an explicit stack
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let current = self.next;
        let node = self.tree.get(current)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            // Climb until a next sibling exists, stopping at the root
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.tree.get(cursor) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if !cursor.is_valid() || cursor == self.root {
                    break NodeId::NONE;
                }
            }
        };

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_text("a");
        let b = tree.create_element("b");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();
        (tree, div, a, b)
    }

    #[test]
    fn test_append_links_siblings() {
        let (tree, div, a, b) = sample();
        assert_eq!(tree.child_ids(div), vec![a, b]);
        assert_eq!(tree.get(a).unwrap().next_sibling, b);
        assert_eq!(tree.get(b).unwrap().prev_sibling, a);
        assert_eq!(tree.get(div).unwrap().last_child, b);
    }

    #[test]
    fn test_insert_before_first() {
        let (mut tree, div, a, b) = sample();
        let c = tree.create_text("c");
        tree.insert_before(div, c, a).unwrap();
        assert_eq!(tree.child_ids(div), vec![c, a, b]);
        assert_eq!(tree.get(div).unwrap().first_child, c);
    }

    #[test]
    fn test_detach_middle() {
        let (mut tree, div, a, b) = sample();
        let c = tree.create_text("c");
        tree.append_child(div, c).unwrap();
        tree.detach(b).unwrap();
        assert_eq!(tree.child_ids(div), vec![a, c]);
        assert_eq!(tree.parent(b), None);
    }

    #[test]
    fn test_moving_node_between_parents() {
        let (mut tree, div, a, b) = sample();
        tree.append_child(b, a).unwrap();
        assert_eq!(tree.child_ids(div), vec![b]);
        assert_eq!(tree.child_ids(b), vec![a]);
    }

    #[test]
    fn test_cycle_rejected() {
        let (mut tree, div, _, b) = sample();
        let err = tree.append_child(b, div).unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequest { .. }));
    }

    #[test]
    fn test_reference_must_be_child() {
        let (mut tree, div, _, _) = sample();
        let stray = tree.create_text("x");
        let other = tree.create_text("y");
        let err = tree.insert_before(div, other, stray).unwrap_err();
        assert!(matches!(err, DomError::NotAChild { .. }));
    }

    #[test]
    fn test_descendants_preorder() {
        let (mut tree, div, a, b) = sample();
        let inner = tree.create_text("inner");
        tree.append_child(b, inner).unwrap();
        let order: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(order, vec![div, a, b, inner]);
    }

    #[test]
    fn test_descendants_stay_inside_root() {
        let (mut tree, _, _, b) = sample();
        let inner = tree.create_text("inner");
        tree.append_child(b, inner).unwrap();
        let order: Vec<_> = tree.descendants(b).collect();
        assert_eq!(order, vec![inner]);
    }

    #[test]
    fn test_text_content() {
        let (mut tree, div, _, b) = sample();
        let inner = tree.create_text("bc");
        tree.append_child(b, inner).unwrap();
        assert_eq!(tree.text_content(div), "abc");
    }

    #[test]
    fn test_attributes() {
        let (mut tree, div, a, _) = sample();
        tree.set_attribute(div, "class", "quote").unwrap();
        assert_eq!(tree.attribute(div, "class"), Some("quote"));
        assert_eq!(tree.attributes(div), vec![("class", "quote")]);
        assert!(matches!(
            tree.set_attribute(a, "class", "x"),
            Err(DomError::NotAnElement(_))
        ));
        assert_eq!(tree.remove_attribute(div, "class").unwrap(), Some("quote".into()));
        assert_eq!(tree.remove_attribute(div, "never-seen").unwrap(), None);
    }
}
