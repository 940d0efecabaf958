//! Node processor
//!
//! Owns the document for one load/transform/serialize cycle and the node
//! data handlers register along the way.

use std::rc::Rc;
use std::sync::Arc;

use nodeproc_dom::{Document, DomTree, NodeId, Query};
use nodeproc_html::{
    get_inner_html, mask_pre_line_breaks, protect_inline_spacing, unmask_pre_line_breaks,
    HtmlParser,
};

use crate::identifier::is_placeholder_tag;
use crate::substitution::{apply_node_data, NodeDataEntry};
use crate::{
    attributes, AttributeMap, HandlerRegistry, IdentifierGenerator, NodeError, NodeHandler,
    NodeIdentifier, ProcessorConfig,
};

/// Tags that belong to the document shell and never reach a handler
pub const DEFAULT_SKIP_TAGS: &[&str] = &["html", "head", "title", "meta", "body", "link"];

/// Prepended to every fragment. There is no closing counterpart: the end of
/// input closes body and html, and a tag left open by the fragment cannot
/// swallow wrapper markup.
const DOCUMENT_SHELL_START: &str = r#"<html><head><meta http-equiv="Content-Type" content="text/html; charset=utf-8" /></head><body>"#;

/// Load, transform and serialize an HTML fragment
#[derive(Debug)]
pub struct NodeProcessor {
    config: ProcessorConfig,
    document: Document,
    node_data: Vec<NodeDataEntry>,
    identifiers: Arc<IdentifierGenerator>,
}

impl NodeProcessor {
    /// Processor drawing identifiers from the process-wide generator
    pub fn new(config: ProcessorConfig) -> Self {
        Self::with_generator(config, IdentifierGenerator::shared())
    }

    pub fn with_generator(config: ProcessorConfig, identifiers: Arc<IdentifierGenerator>) -> Self {
        Self {
            config,
            document: Document::new(),
            node_data: Vec::new(),
            identifiers,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    // ---- loading and serialization ----

    /// Parse a fragment into a fresh document.
    ///
    /// Replaces the current document and discards all node data.
    pub fn load(&mut self, html: &str) {
        let mut html = mask_pre_line_breaks(html).into_owned();

        if self.config.strip_zero_width {
            html = html.replace('\u{200B}', "");
        }
        html = html.replace("&nbsp;", " ");
        if self.config.preserve_inline_spacing {
            html = protect_inline_spacing(&html).into_owned();
        }

        let wrapped = format!("{DOCUMENT_SHELL_START}{html}");
        let mut document = HtmlParser::new().parse(&wrapped);
        let restored = unmask_pre_line_breaks(document.tree_mut());

        tracing::debug!(
            "Loaded {} bytes into {} nodes ({} pre text nodes restored)",
            wrapped.len(),
            document.tree().len(),
            restored
        );

        self.document = document;
        self.node_data.clear();
    }

    /// Serialize the body's content with every placeholder substituted
    pub fn get_html(&self) -> String {
        let body = self.document.body();
        if !body.is_valid() {
            return String::new();
        }

        let html = get_inner_html(self.document.tree(), body);
        tracing::debug!(
            "Serializing {} bytes with {} node data entries",
            html.len(),
            self.node_data.len()
        );
        let html = apply_node_data(html, &self.node_data);
        let html = html.replace("&nbsp;", " ");

        if self.config.preserve_inline_spacing {
            html.replace(">\u{A0}<", "> <")
        } else {
            html
        }
    }

    // ---- tree access ----

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn tree(&self) -> &DomTree {
        self.document.tree()
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        self.document.tree_mut()
    }

    /// Evaluate a path expression against the whole document
    pub fn query(&self, path: &str) -> Result<Vec<NodeId>, NodeError> {
        self.query_from(self.tree().root(), path)
    }

    /// Evaluate a path expression relative to a context node
    pub fn query_from(&self, context: NodeId, path: &str) -> Result<Vec<NodeId>, NodeError> {
        let query: Query = path.parse()?;
        Ok(self.tree().query(context, &query))
    }

    /// Replace an element with a new one named `tag_name`, moving its children
    pub fn rename_tag(
        &mut self,
        element: NodeId,
        tag_name: &str,
        preserve_attributes: bool,
    ) -> Result<NodeId, NodeError> {
        Ok(self
            .tree_mut()
            .rename_element(element, tag_name, preserve_attributes)?)
    }

    /// Replace an element with text, plus two `<br>` when it was a block
    pub fn replace_element_with_text(
        &mut self,
        element: NodeId,
        text: &str,
        is_block: bool,
    ) -> Result<NodeId, NodeError> {
        Ok(self.tree_mut().replace_with_text(element, text, is_block)?)
    }

    /// Remove an element, keeping its children in place
    pub fn unwrap_content(&mut self, element: NodeId) -> Result<(), NodeError> {
        Ok(self.tree_mut().unwrap(element)?)
    }

    // ---- node data ----

    /// Mint a placeholder identifier
    pub fn next_identifier(&self) -> NodeIdentifier {
        self.identifiers.next_identifier()
    }

    /// Register a placeholder to be substituted by `handler` at serialization
    pub fn add_node_data(
        &mut self,
        handler: Rc<dyn NodeHandler>,
        identifier: NodeIdentifier,
        payload: AttributeMap,
    ) {
        tracing::trace!(
            "Registered placeholder {} for <{}>",
            identifier,
            handler.tag_name()
        );
        self.node_data.push(NodeDataEntry::new(identifier, handler, payload));
    }

    /// Node data registered since the last load, in registration order
    pub fn node_data(&self) -> &[NodeDataEntry] {
        &self.node_data
    }

    /// Decode a base64(JSON) attribute payload; never fails
    pub fn parse_attributes(&self, encoded: &str) -> AttributeMap {
        attributes::parse_attributes(encoded)
    }

    // ---- dispatch ----

    /// Run a handler over every element carrying its tag name
    pub fn invoke_handler(&mut self, handler: Rc<dyn NodeHandler>) -> Result<(), NodeError> {
        let tag_name = handler.tag_name().trim().to_string();
        if tag_name.is_empty() {
            return Err(NodeError::MissingTagName);
        }

        let tree = self.tree();
        let elements = tree.elements_by_tag_name(tree.root(), &tag_name);
        if elements.is_empty() {
            return Ok(());
        }

        tracing::trace!("Invoking handler for {} <{}> elements", elements.len(), tag_name);
        handler.process(&elements, self)
    }

    /// Distinct tag names in document order, minus shell, configured,
    /// caller-supplied and placeholder tags
    pub fn dispatchable_tags(&self, skip_tags: &[&str]) -> Vec<String> {
        let tree = self.tree();
        tree.distinct_tag_names(tree.root())
            .into_iter()
            .filter(|tag| !self.is_skipped(tag, skip_tags))
            .collect()
    }

    /// Dispatch each present tag to its registered handler
    pub fn invoke_node_handlers(
        &mut self,
        registry: &HandlerRegistry,
        skip_tags: &[&str],
    ) -> Result<(), NodeError> {
        self.invoke_node_handlers_with(registry, skip_tags, |processor, handler| {
            processor.invoke_handler(handler)
        })
    }

    /// Dispatch each present tag to `callback` together with its handler
    pub fn invoke_node_handlers_with<F>(
        &mut self,
        registry: &HandlerRegistry,
        skip_tags: &[&str],
        mut callback: F,
    ) -> Result<(), NodeError>
    where
        F: FnMut(&mut Self, Rc<dyn NodeHandler>) -> Result<(), NodeError>,
    {
        for tag in self.dispatchable_tags(skip_tags) {
            let Some(handler) = registry.resolve(&tag) else {
                continue;
            };
            tracing::trace!("Dispatching <{}> to {}", tag, registry.handler_name(&tag));
            callback(self, handler)?;
        }
        Ok(())
    }

    fn is_skipped(&self, tag: &str, skip_tags: &[&str]) -> bool {
        is_placeholder_tag(tag)
            || DEFAULT_SKIP_TAGS
                .iter()
                .chain(skip_tags)
                .any(|skip| skip.eq_ignore_ascii_case(tag))
            || self
                .config
                .skip_tags
                .iter()
                .any(|skip| skip.eq_ignore_ascii_case(tag))
    }
}

impl Default for NodeProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> NodeProcessor {
        NodeProcessor::with_generator(
            ProcessorConfig::default(),
            Arc::new(IdentifierGenerator::with_prefix("abc")),
        )
    }

    #[test]
    fn test_empty_processor_serializes_empty() {
        assert_eq!(processor().get_html(), "");
    }

    #[test]
    fn test_round_trip() {
        let mut processor = processor();
        processor.load("<p>Hello <b>world</b></p>");
        assert_eq!(processor.get_html(), "<p>Hello <b>world</b></p>");
    }

    #[test]
    fn test_query() {
        let mut processor = processor();
        processor.load("<p>a</p><div><p>b</p></div>");
        assert_eq!(processor.query("//p").unwrap().len(), 2);
        assert!(matches!(processor.query(""), Err(NodeError::Query(_))));
    }

    #[test]
    fn test_default_skip_tags() {
        let mut processor = processor();
        processor.load("<p>x</p>");
        assert_eq!(processor.dispatchable_tags(&[]), vec!["p".to_string()]);
        assert!(processor.dispatchable_tags(&["P"]).is_empty());
    }

    #[test]
    fn test_configured_skip_tags() {
        let mut processor = NodeProcessor::with_generator(
            ProcessorConfig::default().skip_tag("b"),
            Arc::new(IdentifierGenerator::with_prefix("abc")),
        );
        processor.load("<p><b>x</b><i>y</i></p>");
        assert_eq!(processor.dispatchable_tags(&[]), vec!["p", "i"]);
    }

    #[test]
    fn test_load_clears_node_data() {
        struct Stub;
        impl NodeHandler for Stub {
            fn tag_name(&self) -> &str {
                "stub"
            }
            fn process(
                self: Rc<Self>,
                _elements: &[NodeId],
                _processor: &mut NodeProcessor,
            ) -> Result<(), NodeError> {
                Ok(())
            }
            fn replace_tag(&self, _payload: &AttributeMap) -> crate::Replacement {
                "".into()
            }
        }

        let mut processor = processor();
        processor.load("<p>x</p>");
        let identifier = processor.next_identifier();
        processor.add_node_data(Rc::new(Stub), identifier, AttributeMap::new());
        assert_eq!(processor.node_data().len(), 1);

        processor.load("<p>y</p>");
        assert!(processor.node_data().is_empty());
    }
}
