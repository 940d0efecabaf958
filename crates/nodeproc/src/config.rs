//! Processor Configuration

use serde::{Deserialize, Serialize};

/// Node processor configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Tags never offered to handler dispatch, on top of the built-in
    /// document-shell tags
    pub skip_tags: Vec<String>,

    /// Strip U+200B before parsing
    pub strip_zero_width: bool,

    /// Protect a single space between two tags from being dropped by
    /// encoding it as `&nbsp;` for the parse and restoring it afterwards
    pub preserve_inline_spacing: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            skip_tags: Vec::new(),
            strip_zero_width: true,
            preserve_inline_spacing: true,
        }
    }
}

impl ProcessorConfig {
    /// Add a tag to the skip list
    pub fn skip_tag(mut self, tag: impl Into<String>) -> Self {
        self.skip_tags.push(tag.into());
        self
    }
}
