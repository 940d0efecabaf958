//! Node handler contract
//!
//! A handler owns one tag name. During dispatch it receives every element
//! with that name and may restructure the tree. When it needs output the
//! tree cannot represent, it renames the element to a placeholder tag and
//! registers node data. At serialization its [`NodeHandler::replace_tag`]
//! supplies the final markup for that placeholder.
//!
//! ```rust,ignore
//! struct CodeHandler;
//!
//! impl NodeHandler for CodeHandler {
//!     fn tag_name(&self) -> &str {
//!         "woltlab-code"
//!     }
//!
//!     fn process(self: Rc<Self>, elements: &[NodeId], processor: &mut NodeProcessor) -> Result<(), NodeError> {
//!         for &element in elements {
//!             let identifier = processor.next_identifier();
//!             processor.add_node_data(self.clone(), identifier.clone(), AttributeMap::new());
//!             processor.rename_tag(element, &identifier.tag_name(), false)?;
//!         }
//!         Ok(())
//!     }
//!
//!     fn replace_tag(&self, _payload: &AttributeMap) -> Replacement {
//!         "<pre class=\"code\"><!-- META_CODE_INNER_CONTENT --></pre>".into()
//!     }
//! }
//! ```

use std::fmt;
use std::rc::Rc;

use nodeproc_dom::NodeId;

use crate::{AttributeMap, NodeError, NodeProcessor};

/// Handler for one custom tag
pub trait NodeHandler {
    /// Tag this handler processes; must not be empty
    fn tag_name(&self) -> &str;

    /// Transform the matched elements, in document order
    fn process(
        self: Rc<Self>,
        elements: &[NodeId],
        processor: &mut NodeProcessor,
    ) -> Result<(), NodeError>;

    /// Markup for a placeholder registered by this handler
    fn replace_tag(&self, payload: &AttributeMap) -> Replacement;
}

/// Value a handler substitutes for its placeholder: markup or a number
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    Markup(String),
    Integer(i64),
    Float(f64),
}

impl Replacement {
    /// Render as the string spliced into the output
    pub fn into_markup(self) -> String {
        match self {
            Self::Markup(markup) => markup,
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
        }
    }
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markup(markup) => f.write_str(markup),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<String> for Replacement {
    fn from(markup: String) -> Self {
        Self::Markup(markup)
    }
}

impl From<&str> for Replacement {
    fn from(markup: &str) -> Self {
        Self::Markup(markup.to_string())
    }
}

impl From<i64> for Replacement {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<u32> for Replacement {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for Replacement {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_markup() {
        assert_eq!(Replacement::from("<b>x</b>").into_markup(), "<b>x</b>");
        assert_eq!(Replacement::from(42i64).into_markup(), "42");
        assert_eq!(Replacement::from(7u32).into_markup(), "7");
        assert_eq!(Replacement::from(2.5).into_markup(), "2.5");
        assert_eq!(Replacement::from(3.0).into_markup(), "3");
    }

    #[test]
    fn test_display_matches_markup() {
        let replacement = Replacement::from(String::from("<hr>"));
        assert_eq!(replacement.to_string(), replacement.clone().into_markup());
    }
}
