//! Path queries
//!
//! A tiny XPath subset covering what node handlers actually ask for:
//! `//tag`, `//*`, `./tag`, `./*`, `./text()` and `.//text()`.
//! Tag matching is ASCII case-insensitive.

use std::str::FromStr;

use crate::{DomTree, NodeId};

/// Parsed path query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// `//tag` or `//*` (None matches any element)
    Descendants(Option<String>),
    /// `./tag` or `./*`
    Children(Option<String>),
    /// `./text()`
    ChildText,
    /// `.//text()`
    DescendantText,
}

/// Query parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("empty query")]
    Empty,

    #[error("unsupported query expression: {0}")]
    Unsupported(String),
}

fn name_test(s: &str, expr: &str) -> Result<Option<String>, QueryError> {
    if s == "*" {
        return Ok(None);
    }
    let valid = !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'));
    if valid {
        Ok(Some(s.to_string()))
    } else {
        Err(QueryError::Unsupported(expr.to_string()))
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let s = expr.trim();
        if s.is_empty() {
            return Err(QueryError::Empty);
        }

        match s {
            "./text()" | "text()" => return Ok(Self::ChildText),
            ".//text()" | "//text()" => return Ok(Self::DescendantText),
            _ => {}
        }

        if let Some(rest) = s.strip_prefix(".//").or_else(|| s.strip_prefix("//")) {
            name_test(rest, expr).map(Self::Descendants)
        } else if let Some(rest) = s.strip_prefix("./") {
            name_test(rest, expr).map(Self::Children)
        } else {
            Err(QueryError::Unsupported(expr.to_string()))
        }
    }
}

fn matches_name(tree: &DomTree, id: NodeId, name: &Option<String>) -> bool {
    match name {
        None => tree.get(id).is_some_and(|n| n.is_element()),
        Some(name) => tree.is_element_named(id, name),
    }
}

impl DomTree {
    /// Evaluate a query relative to `context`, in document order
    pub fn query(&self, context: NodeId, query: &Query) -> Vec<NodeId> {
        match query {
            Query::Descendants(name) => self
                .descendants(context)
                .filter(|&id| matches_name(self, id, name))
                .collect(),
            Query::Children(name) => self
                .children(context)
                .map(|(id, _)| id)
                .filter(|&id| matches_name(self, id, name))
                .collect(),
            Query::ChildText => self.text_children(context),
            Query::DescendantText => self
                .descendants(context)
                .filter(|&id| self.get(id).is_some_and(|n| n.is_text()))
                .collect(),
        }
    }

    /// All elements below `root` with the given tag name (`//tag`)
    pub fn elements_by_tag_name(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&id| self.is_element_named(id, tag))
            .collect()
    }

    /// Direct text children of a node (`./text()`)
    pub fn text_children(&self, parent: NodeId) -> Vec<NodeId> {
        self.children(parent)
            .filter(|(_, node)| node.is_text())
            .map(|(id, _)| id)
            .collect()
    }

    /// Distinct tag names below `root`, in order of first appearance
    pub fn distinct_tag_names(&self, root: NodeId) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut names = Vec::new();
        for id in self.descendants(root) {
            let Some(elem) = self.get(id).and_then(|n| n.as_element()) else {
                continue;
            };
            if seen.insert(elem.name) {
                names.push(self.resolve(elem.name).to_string());
            }
        }
        names
    }
}
