//! Inline spacing protection
//!
//! A lone space between two tags is whitespace-only text, which the
//! document model is free to drop. Encoding it as `&nbsp;` keeps it in the
//! tree; the serializer side turns it back into a space.
//!
//! Gaps next to table structure are left alone. html5ever keeps
//! whitespace there already, and a non-breaking space would be
//! foster-parented in front of the table.

use std::borrow::Cow;

const INLINE_GAP: &str = "> <";
const PROTECTED_GAP: &str = ">&nbsp;<";

/// Tags whose neighbouring gaps are never encoded
const TABLE_STRUCTURE_TAGS: &[&str] = &[
    "table", "caption", "colgroup", "col", "thead", "tbody", "tfoot", "tr", "td", "th",
];

/// Replace `> <` with `>&nbsp;<` unless either adjacent tag is table structure
pub fn protect_inline_spacing(html: &str) -> Cow<'_, str> {
    if !html.contains(INLINE_GAP) {
        return Cow::Borrowed(html);
    }

    let mut output = String::with_capacity(html.len() + 16);
    let mut last = 0;
    for (at, _) in html.match_indices(INLINE_GAP) {
        let next_tag = at + INLINE_GAP.len() - 1;
        if is_table_structure(tag_ending_at(html, at))
            || is_table_structure(tag_starting_at(html, next_tag))
        {
            continue;
        }
        output.push_str(&html[last..at]);
        output.push_str(PROTECTED_GAP);
        last = at + INLINE_GAP.len();
    }
    output.push_str(&html[last..]);

    Cow::Owned(output)
}

/// Name of the tag whose `>` sits at `gt`, if that `>` closes a tag
fn tag_ending_at(html: &str, gt: usize) -> Option<&str> {
    let open = html[..gt].rfind('<')?;
    let inner = &html[open + 1..gt];
    if inner.contains('>') {
        return None;
    }
    tag_name(inner)
}

/// Name of the tag whose `<` sits at `lt`
fn tag_starting_at(html: &str, lt: usize) -> Option<&str> {
    tag_name(&html[lt + 1..])
}

fn tag_name(tag: &str) -> Option<&str> {
    let tag = tag.strip_prefix('/').unwrap_or(tag);
    let end = tag
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(tag.len());
    (end > 0).then(|| &tag[..end])
}

fn is_table_structure(tag: Option<&str>) -> bool {
    tag.is_some_and(|tag| {
        TABLE_STRUCTURE_TAGS
            .iter()
            .any(|name| name.eq_ignore_ascii_case(tag))
    })
}
