//! nodeproc
//!
//! HTML node transformation engine. A fragment is loaded into a DOM,
//! custom tags are dispatched to registered handlers, and the result is
//! serialized with handler placeholders substituted.
//!
//! ```rust,ignore
//! let mut registry = HandlerRegistry::new("Output");
//! registry.register_default::<QuoteHandler>("woltlab-quote")?;
//!
//! let mut processor = NodeProcessor::default();
//! processor.load(html);
//! processor.invoke_node_handlers(&registry, &[])?;
//! let output = processor.get_html();
//! ```

pub mod attributes;
mod config;
mod error;
mod handler;
mod identifier;
mod processor;
mod registry;
mod substitution;

pub use attributes::{encode_attributes, parse_attributes, AttributeMap};
pub use config::ProcessorConfig;
pub use error::NodeError;
pub use handler::{NodeHandler, Replacement};
pub use identifier::{is_placeholder_tag, IdentifierGenerator, NodeIdentifier, PLACEHOLDER_PREFIX};
pub use processor::{NodeProcessor, DEFAULT_SKIP_TAGS};
pub use registry::{handler_class_name, HandlerFactory, HandlerRegistry, RegistryError};
pub use substitution::{
    NodeDataEntry, ENCODED_INNER_CONTENT_SENTINEL, INNER_CONTENT_SENTINEL, SKIP_INNER_CONTENT,
};

pub use nodeproc_dom::{Document, DomError, DomTree, NodeId, Query, QueryError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
