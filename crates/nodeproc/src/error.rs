//! Processor errors
//!
//! Bad data never produces an error here: malformed markup is repaired by
//! the parser and broken attribute payloads decode to an empty map. What
//! remains are handler bugs and misuse of the tree API.

use nodeproc_dom::{DomError, QueryError};

/// Node processor error
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("node handler declared an empty tag name")]
    MissingTagName,

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("handler for <{tag}> failed: {message}")]
    Handler { tag: String, message: String },
}

impl NodeError {
    /// Error raised from inside a handler's `process`
    pub fn handler(tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            tag: tag.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeproc_dom::NodeId;

    fn fails_with_dom() -> Result<(), NodeError> {
        Err::<(), _>(DomError::NotAnElement(NodeId::ROOT))?;
        Ok(())
    }

    fn fails_with_query() -> Result<(), NodeError> {
        Err::<(), _>(QueryError::Empty)?;
        Ok(())
    }

    #[test]
    fn test_dom_error_converts() {
        let err = fails_with_dom().unwrap_err();
        assert!(matches!(err, NodeError::Dom(DomError::NotAnElement(_))));
        assert_eq!(err.to_string(), "DOM error: node #0 is not an element");
    }

    #[test]
    fn test_query_error_converts() {
        let err = fails_with_query().unwrap_err();
        assert!(matches!(err, NodeError::Query(QueryError::Empty)));
        assert_eq!(err.to_string(), "Query error: empty query");
    }

    #[test]
    fn test_handler_error() {
        let err = NodeError::handler("woltlab-quote", "missing author");
        assert_eq!(
            err.to_string(),
            "handler for <woltlab-quote> failed: missing author"
        );
    }
}
