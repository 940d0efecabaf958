//! `<pre>` line-break masking
//!
//! html5ever drops the newline that directly follows `<pre>` and normalizes
//! CR/LF, which corrupts code blocks. Before parsing, line breaks inside
//! `<pre>` bodies are swapped for [`PRE_LINEBREAK_TOKEN`]. After parsing,
//! the token is turned back into `\n` in the text nodes under each `<pre>`.
//!
//! The input is split on `</pre>` first so each segment holds at most one
//! open block, which keeps the opening-tag regex anchored to a single span.
//! Tag matching ignores ASCII case, like the parser does.

use std::borrow::Cow;
use std::sync::LazyLock;

use nodeproc_dom::{DomTree, Query};
use regex::{NoExpand, Regex};

/// Sentinel that stands in for a line break inside `<pre>` during parsing
pub const PRE_LINEBREAK_TOKEN: &str = "@@@WCF_PRE_LINEBREAK@@@";

const PRE_CLOSE: &str = "</pre>";

static PRE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<pre").expect("PRE_START regex is valid"));

static PRE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</pre>").expect("PRE_END regex is valid"));

/// Opening `<pre …>` tag through to the end of the segment
static PRE_OPENING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(?P<opening_tag><pre[^>]*>)(?P<content>.*)$")
        .expect("PRE_OPENING regex is valid")
});

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("LINE_BREAK regex is valid"));

/// Replace line breaks inside `<pre>` bodies with [`PRE_LINEBREAK_TOKEN`].
///
/// A segment that opens a block but never closes it gets a synthetic
/// `</pre>`. Input without `<pre` is returned untouched.
pub fn mask_pre_line_breaks(html: &str) -> Cow<'_, str> {
    if !PRE_START.is_match(html) {
        return Cow::Borrowed(html);
    }

    let mut output = String::with_capacity(html.len() + 64);
    for segment in PRE_END.split(html).filter(|s| !s.is_empty()) {
        match PRE_OPENING.captures(segment) {
            Some(caps) => {
                let (Some(whole), Some(opening_tag), Some(content)) =
                    (caps.get(0), caps.name("opening_tag"), caps.name("content"))
                else {
                    output.push_str(segment);
                    continue;
                };
                output.push_str(&segment[..whole.start()]);
                output.push_str(opening_tag.as_str());
                output.push_str(&LINE_BREAK.replace_all(
                    content.as_str(),
                    NoExpand(PRE_LINEBREAK_TOKEN),
                ));
                output.push_str(PRE_CLOSE);
            }
            None => {
                output.push_str(segment);
                if PRE_START.is_match(segment) {
                    output.push_str(PRE_CLOSE);
                }
            }
        }
    }

    Cow::Owned(output)
}

/// Restore masked line breaks in every text node below a `<pre>`.
///
/// Only text nodes are rewritten; attribute values are left alone.
/// Returns the number of text nodes changed.
pub fn unmask_pre_line_breaks(tree: &mut DomTree) -> usize {
    let pres = tree.elements_by_tag_name(tree.root(), "pre");
    let mut restored = 0;

    for pre in pres {
        for text_id in tree.query(pre, &Query::DescendantText) {
            let Some(text) = tree.text(text_id) else {
                continue;
            };
            if !text.contains(PRE_LINEBREAK_TOKEN) {
                continue;
            }
            let value = text.replace(PRE_LINEBREAK_TOKEN, "\n");
            if tree.set_text(text_id, value).is_ok() {
                restored += 1;
            }
        }
    }

    restored
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: &str = PRE_LINEBREAK_TOKEN;

    #[test]
    fn test_no_pre_is_noop() {
        let html = "<p>a\nb</p></pre>";
        assert!(matches!(mask_pre_line_breaks(html), Cow::Borrowed(_)));
    }

    #[test]
    fn test_single_block() {
        let masked = mask_pre_line_breaks("<pre>line1\nline2</pre>");
        assert_eq!(masked, format!("<pre>line1{T}line2</pre>"));
    }

    #[test]
    fn test_crlf_and_attributes() {
        let masked = mask_pre_line_breaks("<p>x\n</p><pre class=\"php\">a\r\nb\n</pre>\n<p>y</p>");
        assert_eq!(
            masked,
            format!("<p>x\n</p><pre class=\"php\">a{T}b{T}</pre>\n<p>y</p>")
        );
    }

    #[test]
    fn test_multiple_blocks() {
        let masked = mask_pre_line_breaks("<pre>a\nb</pre>\n<pre>c\nd</pre>");
        assert_eq!(masked, format!("<pre>a{T}b</pre>\n<pre>c{T}d</pre>"));
    }

    #[test]
    fn test_unclosed_block_gets_closed() {
        let masked = mask_pre_line_breaks("<p>x</p><pre>a\nb");
        assert_eq!(masked, format!("<p>x</p><pre>a{T}b</pre>"));
    }

    #[test]
    fn test_uppercase_tags() {
        let masked = mask_pre_line_breaks("<PRE>\nx</PRE><p>a\nb</p><Pre class=\"c\">y\nz</pRe>");
        assert_eq!(
            masked,
            format!("<PRE>{T}x</pre><p>a\nb</p><Pre class=\"c\">y{T}z</pre>")
        );
    }

    #[test]
    fn test_truncated_opening_tag_gets_closed() {
        let masked = mask_pre_line_breaks("<pre>a</pre>b<pre");
        assert_eq!(masked, "<pre>a</pre>b<pre</pre>");
    }

    #[test]
    fn test_unmask_restores_nested_text() {
        let mut tree = DomTree::new();
        let pre = tree.create_element("pre");
        let text = tree.create_text(&format!("a{T}b"));
        let code = tree.create_element("code");
        let nested = tree.create_text(&format!("c{T}d"));
        tree.append_child(tree.root(), pre).unwrap();
        tree.append_child(pre, text).unwrap();
        tree.append_child(pre, code).unwrap();
        tree.append_child(code, nested).unwrap();
        tree.set_attribute(pre, "title", T).unwrap();

        assert_eq!(unmask_pre_line_breaks(&mut tree), 2);
        assert_eq!(tree.text(text), Some("a\nb"));
        assert_eq!(tree.text(nested), Some("c\nd"));
        assert_eq!(tree.attribute(pre, "title"), Some(T));
    }

    #[test]
    fn test_unmask_ignores_text_outside_pre() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let text = tree.create_text(T);
        tree.append_child(tree.root(), p).unwrap();
        tree.append_child(p, text).unwrap();

        assert_eq!(unmask_pre_line_breaks(&mut tree), 0);
        assert_eq!(tree.text(text), Some(T));
    }
}
