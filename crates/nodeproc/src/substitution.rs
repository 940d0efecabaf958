//! Node data and placeholder substitution
//!
//! Placeholders reach the serialized output as `<wcfNode-ID>…</wcfNode-ID>`.
//! Each registered entry swaps its placeholder for the markup its handler
//! returns, splicing the placeholder's inner HTML into that markup at the
//! inner-content sentinel.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::{AttributeMap, NodeHandler, NodeIdentifier};

/// Marks where a replacement takes the placeholder's inner content
pub const INNER_CONTENT_SENTINEL: &str = "<!-- META_CODE_INNER_CONTENT -->";

/// The sentinel after a pass through an HTML text escaper
pub const ENCODED_INNER_CONTENT_SENTINEL: &str = "&lt;!-- META_CODE_INNER_CONTENT --&gt;";

/// Payload key that discards the placeholder's inner content
pub const SKIP_INNER_CONTENT: &str = "skipInnerContent";

/// Placeholder registered by a handler
pub struct NodeDataEntry {
    identifier: NodeIdentifier,
    handler: Rc<dyn NodeHandler>,
    payload: AttributeMap,
}

impl NodeDataEntry {
    pub fn new(identifier: NodeIdentifier, handler: Rc<dyn NodeHandler>, payload: AttributeMap) -> Self {
        Self {
            identifier,
            handler,
            payload,
        }
    }

    pub fn identifier(&self) -> &NodeIdentifier {
        &self.identifier
    }

    pub fn handler(&self) -> &Rc<dyn NodeHandler> {
        &self.handler
    }

    pub fn payload(&self) -> &AttributeMap {
        &self.payload
    }

    /// Only a JSON `true` counts
    pub fn skips_inner_content(&self) -> bool {
        matches!(self.payload.get(SKIP_INNER_CONTENT), Some(Value::Bool(true)))
    }

    /// Final markup for this placeholder given its serialized inner HTML
    fn render(&self, inner_content: &str) -> String {
        let markup = self.handler.replace_tag(&self.payload).into_markup();
        let content = if self.skips_inner_content() { "" } else { inner_content };

        if markup.contains(INNER_CONTENT_SENTINEL) {
            markup.replace(INNER_CONTENT_SENTINEL, content)
        } else if markup.contains(ENCODED_INNER_CONTENT_SENTINEL) {
            markup.replace(ENCODED_INNER_CONTENT_SENTINEL, content)
        } else {
            markup
        }
    }

    /// Opening tag (attributes allowed), greedy content, closing tag
    fn pattern(&self) -> Result<Regex, regex::Error> {
        let tag = regex::escape(&self.identifier.tag_name());
        Regex::new(&format!(r"<{tag}(?:\s[^>]*)?>(?s:(?P<content>.*))</{tag}>"))
    }
}

impl fmt::Debug for NodeDataEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDataEntry")
            .field("identifier", &self.identifier)
            .field("handler", &self.handler.tag_name())
            .field("payload", &self.payload)
            .finish()
    }
}

/// Substitute every entry's placeholder in registration order
pub(crate) fn apply_node_data(mut html: String, entries: &[NodeDataEntry]) -> String {
    for entry in entries {
        let pattern = match entry.pattern() {
            Ok(pattern) => pattern,
            Err(err) => {
                tracing::warn!("Skipping placeholder {}: {}", entry.identifier, err);
                continue;
            }
        };

        let replaced = pattern.replace_all(&html, |caps: &Captures<'_>| {
            entry.render(caps.name("content").map_or("", |m| m.as_str()))
        });
        if let Cow::Borrowed(_) = replaced {
            tracing::warn!(
                "Placeholder {} for <{}> missing from output",
                entry.identifier.tag_name(),
                entry.handler.tag_name()
            );
            continue;
        }

        html = replaced.into_owned();
    }
    html
}
