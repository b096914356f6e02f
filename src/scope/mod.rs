//! The scope chain: nested translation contexts, each holding key values,
//! signature templates, URL abbreviations and catalog listeners. Reads fall
//! through to the parent; writes are always local.

mod defaults;

use std::collections::HashMap;
use std::fmt;

use crate::signatures::Template;

// Re-export all public symbols
pub use defaults::*;

/// Index of a frame within its Scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug, Clone)]
pub struct Frame {
    parent: Option<ScopeId>,
    pub label: String,
    keys: HashMap<String, String>,
    signatures: HashMap<String, Template>,
    abbreviations: HashMap<String, String>,
    listeners: Vec<usize>,
    counter: usize,
}

impl Frame {
    fn new(parent: Option<ScopeId>, label: &str) -> Frame {
        Frame {
            parent,
            label: label.to_string(),
            keys: HashMap::new(),
            signatures: HashMap::new(),
            abbreviations: HashMap::new(),
            listeners: Vec::new(),
            counter: 0,
        }
    }
}

/// Registering a signature under a name some scope already knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    Native(String),
    Custom(String, String),
}

impl fmt::Display for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Override::Native(name) => {
                write!(f, "signature override: {} is also native signature", name)
            }
            Override::Custom(name, path) => {
                write!(f, "signature override: {} is also defined in {}", name, path)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeError(pub String);

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ScopeError {}

/// Arena of scope frames.
#[derive(Debug, Clone, Default)]
pub struct Scopes {
    frames: Vec<Frame>,
}

impl Scopes {
    pub fn new() -> Scopes {
        Scopes::default()
    }

    /// A scope with no parent.
    pub fn root(&mut self, label: &str) -> ScopeId {
        self.frames
            .push(Frame::new(None, label));
        ScopeId(
            self.frames
                .len()
                - 1,
        )
    }

    pub fn child(&mut self, parent: ScopeId, label: &str) -> ScopeId {
        self.frames
            .push(Frame::new(Some(parent), label));
        ScopeId(
            self.frames
                .len()
                - 1,
        )
    }

    pub fn frame(&self, id: ScopeId) -> &Frame {
        &self.frames[id.0]
    }

    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.frames[id.0].parent
    }

    /// The scope and its ancestors, innermost first.
    pub fn chain(&self, id: ScopeId) -> Vec<ScopeId> {
        let mut result = Vec::new();
        let mut current = Some(id);
        while let Some(scope) = current {
            result.push(scope);
            current = self.frames[scope.0].parent;
        }
        result
    }

    /// Find the nearest value for a key, including a local empty string
    /// which marks it undefined.
    pub fn lookup(&self, id: ScopeId, key: &str) -> Option<&str> {
        self.chain(id)
            .into_iter()
            .find_map(|scope| {
                self.frames[scope.0]
                    .keys
                    .get(key)
            })
            .map(String::as_str)
    }

    /// The value of a key, or empty if it is not defined.
    pub fn value(&self, id: ScopeId, key: &str) -> String {
        self.lookup(id, key)
            .unwrap_or("")
            .to_string()
    }

    pub fn is_defined(&self, id: ScopeId, key: &str) -> bool {
        matches!(self.lookup(id, key), Some(value) if !value.is_empty())
    }

    /// Whether the key is set to `true`, `yes`, `1` or `on`, ignoring case.
    pub fn is_true(&self, id: ScopeId, key: &str) -> bool {
        is_truthy(&self.value(id, key))
    }

    pub fn define(&mut self, id: ScopeId, key: &str, value: &str) {
        self.frames[id.0]
            .keys
            .insert(key.to_string(), value.to_string());
    }

    /// Define the key only if it has no visible value already.
    pub fn define_default(&mut self, id: ScopeId, key: &str, value: &str) {
        if !self.is_defined(id, key) {
            self.define(id, key, value);
        }
    }

    /// Shadow a visible value with an empty one. Does nothing when the key
    /// is not defined.
    pub fn undefine(&mut self, id: ScopeId, key: &str) {
        if self.is_defined(id, key) {
            self.define(id, key, "");
        }
    }

    /// Keys visible from a scope, nearest definition winning, sorted.
    pub fn keys(&self, id: ScopeId) -> Vec<(String, String)> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for scope in self.chain(id) {
            for (key, value) in &self.frames[scope.0].keys {
                seen.entry(key.as_str())
                    .or_insert(value.as_str());
            }
        }
        let mut result: Vec<(String, String)> = seen
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        result.sort();
        result
    }

    pub fn signature(&self, id: ScopeId, name: &str) -> Option<&Template> {
        self.chain(id)
            .into_iter()
            .find_map(|scope| {
                self.frames[scope.0]
                    .signatures
                    .get(name)
            })
    }

    /// Register a signature template in the given scope. Overriding a
    /// visible name is reported back for custom signatures and refused for
    /// native ones.
    pub fn register(&mut self, id: ScopeId, template: Template) -> Result<Option<Override>, ScopeError> {
        let previous = self
            .signature(id, &template.name)
            .map(|t| t.origin());

        let result = match previous {
            None => None,
            Some(_) if !template.is_custom() => {
                return Err(ScopeError(format!(
                    "attempt to override signature {}",
                    template.name
                )))
            }
            Some(None) => Some(Override::Native(
                template
                    .name
                    .clone(),
            )),
            Some(Some(path)) => Some(Override::Custom(
                template
                    .name
                    .clone(),
                path,
            )),
        };

        self.insert(id, template);
        Ok(result)
    }

    /// Register without any override checks, for seeding a root scope.
    pub(crate) fn insert(&mut self, id: ScopeId, template: Template) {
        self.frames[id.0]
            .signatures
            .insert(
                template
                    .name
                    .clone(),
                template,
            );
    }

    /// Names of all signatures visible from a scope, sorted.
    pub fn signature_names(&self, id: ScopeId) -> Vec<String> {
        let mut names: Vec<String> = self
            .chain(id)
            .into_iter()
            .flat_map(|scope| {
                self.frames[scope.0]
                    .signatures
                    .keys()
                    .cloned()
            })
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn abbreviation(&self, id: ScopeId, name: &str) -> Option<&str> {
        self.chain(id)
            .into_iter()
            .find_map(|scope| {
                self.frames[scope.0]
                    .abbreviations
                    .get(name)
            })
            .map(String::as_str)
    }

    pub fn abbreviate(&mut self, id: ScopeId, name: &str, url: &str) {
        self.frames[id.0]
            .abbreviations
            .insert(name.to_string(), url.to_string());
    }

    /// Attach a catalog listener to a scope.
    pub fn listen(&mut self, id: ScopeId, listener: usize) {
        self.frames[id.0]
            .listeners
            .push(listener);
    }

    /// Listeners of a scope and its ancestors, innermost first.
    pub fn listeners(&self, id: ScopeId) -> Vec<usize> {
        self.chain(id)
            .into_iter()
            .flat_map(|scope| {
                self.frames[scope.0]
                    .listeners
                    .iter()
                    .copied()
            })
            .collect()
    }

    /// A fresh id for a generated element, unique within the scope.
    pub fn unique_id(&mut self, id: ScopeId) -> String {
        let prefix = self.value(id, "_IdPrefix_");
        let frame = &mut self.frames[id.0];
        frame.counter += 1;
        format!("{}{}", prefix, frame.counter)
    }
}

pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    ["true", "yes", "1", "on"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}
