//! Edge case tests for nodeproc-dom
//!
//! Tree surgery on detached, nested and degenerate nodes.

use nodeproc_dom::{Document, DomError, DomTree, Query};

// ============================================================================
// RENAME
// ============================================================================

#[test]
fn test_rename_keeps_position_and_children() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let before = tree.create_text("before");
    let div = tree.create_element("div");
    let after = tree.create_text("after");
    let inner = tree.create_text("inner");
    tree.append_child(body, before).unwrap();
    tree.append_child(body, div).unwrap();
    tree.append_child(body, after).unwrap();
    tree.append_child(div, inner).unwrap();

    let section = tree.rename_element(div, "section", false).unwrap();

    assert_eq!(tree.child_ids(body), vec![before, section, after]);
    assert_eq!(tree.child_ids(section), vec![inner]);
    assert_eq!(tree.parent(div), None);
    assert_eq!(tree.tag_name(section), Some("section"));
}

#[test]
fn test_rename_attributes() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let div = tree.create_element("div");
    tree.append_child(body, div).unwrap();
    tree.set_attribute(div, "class", "a").unwrap();

    let kept = tree.rename_element(div, "p", true).unwrap();
    assert_eq!(tree.attribute(kept, "class"), Some("a"));

    let dropped = tree.rename_element(kept, "span", false).unwrap();
    assert!(!tree.has_attribute(dropped, "class"));
}

#[test]
fn test_rename_preserves_case() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let div = tree.create_element("div");
    tree.append_child(body, div).unwrap();

    let renamed = tree.rename_element(div, "wcfNode-abcx0", false).unwrap();
    assert_eq!(tree.tag_name(renamed), Some("wcfNode-abcx0"));
    assert!(tree.is_element_named(renamed, "wcfnode-abcx0"));
}

#[test]
fn test_rename_detached_fails() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    assert_eq!(tree.rename_element(div, "p", false), Err(DomError::Detached(div)));
}

#[test]
fn test_rename_text_fails() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let text = tree.create_text("x");
    tree.append_child(body, text).unwrap();
    assert_eq!(
        tree.rename_element(text, "p", false),
        Err(DomError::NotAnElement(text))
    );
}

// ============================================================================
// REPLACE WITH TEXT
// ============================================================================

#[test]
fn test_replace_inline() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let img = tree.create_element("img");
    tree.append_child(body, img).unwrap();

    let text = tree.replace_with_text(img, ":)", false).unwrap();
    assert_eq!(tree.child_ids(body), vec![text]);
    assert_eq!(tree.text(text), Some(":)"));
}

#[test]
fn test_replace_block_adds_two_breaks() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let div = tree.create_element("div");
    let tail = tree.create_text("tail");
    tree.append_child(body, div).unwrap();
    tree.append_child(body, tail).unwrap();

    let text = tree.replace_with_text(div, "x", true).unwrap();
    let children = tree.child_ids(body);
    assert_eq!(children.len(), 4);
    assert_eq!(children[0], text);
    assert!(tree.is_element_named(children[1], "br"));
    assert!(tree.is_element_named(children[2], "br"));
    assert_eq!(children[3], tail);
}

// ============================================================================
// UNWRAP
// ============================================================================

#[test]
fn test_unwrap_moves_children_in_order() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let span = tree.create_element("span");
    let a = tree.create_text("a");
    let b = tree.create_element("b");
    let c = tree.create_text("c");
    tree.append_child(body, span).unwrap();
    for child in [a, b, c] {
        tree.append_child(span, child).unwrap();
    }

    tree.unwrap(span).unwrap();
    assert_eq!(tree.child_ids(body), vec![a, b, c]);
    assert_eq!(tree.parent(span), None);
}

#[test]
fn test_unwrap_empty_element() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let span = tree.create_element("span");
    tree.append_child(body, span).unwrap();

    tree.unwrap(span).unwrap();
    assert!(tree.child_ids(body).is_empty());
}

#[test]
fn test_unwrap_twice_fails() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let span = tree.create_element("span");
    tree.append_child(body, span).unwrap();

    tree.unwrap(span).unwrap();
    assert_eq!(tree.unwrap(span), Err(DomError::Detached(span)));
}

// ============================================================================
// QUERIES
// ============================================================================

#[test]
fn test_query_after_surgery() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let outer = tree.create_element("div");
    let inner = tree.create_element("div");
    tree.append_child(body, outer).unwrap();
    tree.append_child(outer, inner).unwrap();

    let all_divs = "//div".parse::<Query>().unwrap();
    assert_eq!(tree.query(tree.root(), &all_divs), vec![outer, inner]);

    tree.unwrap(outer).unwrap();
    assert_eq!(tree.query(tree.root(), &all_divs), vec![inner]);
}

#[test]
fn test_distinct_tags_after_rename() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let a = tree.create_element("woltlab-quote");
    let b = tree.create_element("woltlab-quote");
    tree.append_child(body, a).unwrap();
    tree.append_child(body, b).unwrap();

    tree.rename_element(a, "blockquote", false).unwrap();
    assert_eq!(
        tree.distinct_tag_names(tree.root()),
        vec!["html", "head", "body", "blockquote", "woltlab-quote"]
    );
}

#[test]
fn test_cycle_rejected() {
    let mut document = Document::new();
    let body = document.body();
    let tree = document.tree_mut();
    let div = tree.create_element("div");
    tree.append_child(body, div).unwrap();
    assert!(matches!(
        tree.append_child(div, body),
        Err(DomError::HierarchyRequest { .. })
    ));
}
