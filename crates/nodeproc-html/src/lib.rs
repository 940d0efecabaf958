//! nodeproc HTML
//!
//! html5ever-backed parsing into the arena DOM, HTML serialization, and the
//! pre-parse text passes: `<pre>` line-break masking that keeps code blocks
//! intact, and inline spacing protection.

pub mod masking;
mod parser;
mod serializer;
mod spacing;

pub use masking::{mask_pre_line_breaks, unmask_pre_line_breaks, PRE_LINEBREAK_TOKEN};
pub use nodeproc_dom::{Document, DomTree, Node, NodeId};
pub use parser::HtmlParser;
pub use serializer::{get_inner_html, get_outer_html, HtmlSerializer};
pub use spacing::protect_inline_spacing;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}
