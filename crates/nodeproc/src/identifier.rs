//! Placeholder identifiers
//!
//! Identifiers look like `<32 hex chars>x<counter>`. The random prefix is
//! drawn once per generator and the counter only ever increases, so ids
//! never repeat across loads, processors or threads sharing a generator.
//! The `x` keeps the prefix visually apart from the counter.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use rand::RngCore;

/// Tag-name prefix of every placeholder element
pub const PLACEHOLDER_PREFIX: &str = "wcfNode-";

/// Process-wide generator used by processors that are not given their own
static SHARED: LazyLock<Arc<IdentifierGenerator>> =
    LazyLock::new(|| Arc::new(IdentifierGenerator::new()));

/// Whether a tag name is a placeholder tag (ASCII case-insensitive, since
/// the parser lowercases tag names it reads back in)
pub fn is_placeholder_tag(tag_name: &str) -> bool {
    tag_name
        .get(..PLACEHOLDER_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(PLACEHOLDER_PREFIX))
}

/// Unique placeholder identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeIdentifier(String);

impl NodeIdentifier {
    /// The bare identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placeholder tag name, `wcfNode-<identifier>`
    pub fn tag_name(&self) -> String {
        format!("{PLACEHOLDER_PREFIX}{}", self.0)
    }
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of placeholder identifiers
#[derive(Debug)]
pub struct IdentifierGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl IdentifierGenerator {
    /// Generator with a fresh random 16-byte prefix
    pub fn new() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self::with_prefix(hex::encode(bytes))
    }

    /// Generator with a fixed prefix; ids come out as `<prefix>x0`, `<prefix>x1`, ...
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        prefix.push('x');
        Self {
            prefix,
            counter: AtomicU64::new(0),
        }
    }

    /// The process-wide generator
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    /// Prefix including the trailing `x`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Mint the next identifier
    pub fn next_identifier(&self) -> NodeIdentifier {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        NodeIdentifier(format!("{}{}", self.prefix, n))
    }
}

impl Default for IdentifierGenerator {
    fn default() -> Self {
        Self::new()
    }
}
