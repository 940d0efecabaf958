//! Handler registry
//!
//! Maps tag names to handler factories. Keys follow the handler naming
//! convention: the registry namespace followed by the tag name in
//! upper camel case, so `woltlab-quote` in namespace `Output` is
//! `OutputWoltlabQuote`. Registries are built once at composition time.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::identifier::is_placeholder_tag;
use crate::NodeHandler;

/// Constructs a fresh handler per dispatch
pub type HandlerFactory = Box<dyn Fn() -> Rc<dyn NodeHandler> + Send + Sync>;

/// Registry error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid handler tag name: {0:?}")]
    InvalidTagName(String),

    #[error("handler already registered: {0}")]
    AlreadyRegistered(String),
}

/// Convert a hyphenated tag name to the handler naming convention.
///
/// `-x` becomes `X` for lowercase ASCII `x`, and the first character is
/// uppercased: `woltlab-quote` becomes `WoltlabQuote`.
pub fn handler_class_name(tag_name: &str) -> String {
    let mut name = String::with_capacity(tag_name.len());
    let mut chars = tag_name.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '-' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    name.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        name.push(c);
    }

    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

/// Explicit tag name → handler factory registry
pub struct HandlerRegistry {
    namespace: String,
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            factories: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Convention name a tag resolves to in this registry
    pub fn handler_name(&self, tag_name: &str) -> String {
        format!("{}{}", self.namespace, handler_class_name(tag_name))
    }

    /// Register a factory for a tag
    pub fn register<F>(&mut self, tag_name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Rc<dyn NodeHandler> + Send + Sync + 'static,
    {
        let tag_name = tag_name.trim();
        if tag_name.is_empty() || is_placeholder_tag(tag_name) {
            return Err(RegistryError::InvalidTagName(tag_name.to_string()));
        }

        let key = self.handler_name(tag_name);
        if self.factories.contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered(key));
        }

        tracing::trace!("Registered handler {} for <{}>", key, tag_name);
        self.factories.insert(key, Box::new(factory));
        Ok(())
    }

    /// Register a handler type built with `Default`
    pub fn register_default<H>(&mut self, tag_name: &str) -> Result<(), RegistryError>
    where
        H: NodeHandler + Default + 'static,
    {
        self.register(tag_name, || Rc::new(H::default()) as Rc<dyn NodeHandler>)
    }

    /// Builder form of [`HandlerRegistry::register`]
    pub fn with<F>(mut self, tag_name: &str, factory: F) -> Result<Self, RegistryError>
    where
        F: Fn() -> Rc<dyn NodeHandler> + Send + Sync + 'static,
    {
        self.register(tag_name, factory)?;
        Ok(self)
    }

    pub fn contains(&self, tag_name: &str) -> bool {
        self.factories.contains_key(&self.handler_name(tag_name))
    }

    /// Construct the handler for a tag, if one is registered
    pub fn resolve(&self, tag_name: &str) -> Option<Rc<dyn NodeHandler>> {
        self.factories
            .get(&self.handler_name(tag_name))
            .map(|factory| factory())
    }

    /// Registered convention names, sorted
    pub fn handler_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("namespace", &self.namespace)
            .field("handlers", &self.handler_names())
            .finish()
    }
}
