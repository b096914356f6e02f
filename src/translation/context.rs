//! Everything a translation unit carries through the pipeline phases.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::inline;
use crate::problem::{Diagnostic, Problems, Severity};
use crate::scope::{ScopeId, Scopes};
use crate::script::{Evaluator, Keys, ScriptError};
use crate::signatures::{self, Kind, Template};

pub struct Context {
    pub scopes: Scopes,
    pub scope: ScopeId,
    pub catalog: Catalog,
    pub problems: Problems,
    pub evaluator: Box<dyn Evaluator>,
    pub path: PathBuf,
    /// Nesting of include directives currently being read.
    pub depth: usize,
}

/// The keys visible from one scope, as seen by evaluated code.
struct ScopeKeys<'a> {
    scopes: &'a Scopes,
    scope: ScopeId,
}

impl Keys for ScopeKeys<'_> {
    fn value(&self, key: &str) -> Option<String> {
        if self
            .scopes
            .is_defined(self.scope, key)
        {
            Some(
                self.scopes
                    .value(self.scope, key),
            )
        } else {
            None
        }
    }
}

impl Context {
    pub fn new(scopes: Scopes, scope: ScopeId, path: &Path, evaluator: Box<dyn Evaluator>) -> Context {
        Context {
            scopes,
            scope,
            catalog: Catalog::new(),
            problems: Problems::new(),
            evaluator,
            path: path.to_path_buf(),
            depth: 0,
        }
    }

    pub fn value(&self, key: &str) -> String {
        self.scopes
            .value(self.scope, key)
    }

    pub fn is_defined(&self, key: &str) -> bool {
        self.scopes
            .is_defined(self.scope, key)
    }

    pub fn is_true(&self, key: &str) -> bool {
        self.scopes
            .is_true(self.scope, key)
    }

    /// A key's value as a number, falling back when missing or malformed.
    pub fn number(&self, key: &str, fallback: usize) -> usize {
        self.value(key)
            .trim()
            .parse()
            .unwrap_or(fallback)
    }

    /// Define a key in the current scope. A value wrapped as
    /// `&{literal:...}` is stored as is; anything else has keys and macros
    /// substituted first.
    pub fn define(&mut self, line: usize, key: &str, value: &str) {
        let value = match regex!(r"(?s)^\s*&\{literal:(.*)\}\s*$").captures(value) {
            Some(captures) => captures[1].to_string(),
            None => inline::keys_and_macros(self, line, value),
        };
        debug!("define {} = {:?}", key, value);
        self.scopes
            .define(self.scope, key, &value);
    }

    pub fn define_default(&mut self, key: &str, value: &str) {
        self.scopes
            .define_default(self.scope, key, value);
    }

    pub fn undefine(&mut self, key: &str) {
        self.scopes
            .undefine(self.scope, key);
    }

    pub fn signature(&self, name: &str) -> Option<Template> {
        self.scopes
            .signature(self.scope, name)
            .cloned()
    }

    pub fn abbreviation(&self, name: &str) -> Option<String> {
        self.scopes
            .abbreviation(self.scope, name)
            .map(str::to_string)
    }

    pub fn location(&self, line: usize) -> String {
        format!(
            "{}:{}",
            self.path
                .display(),
            line
        )
    }

    fn raise(&mut self, severity: Severity, line: usize, message: String) {
        self.problems
            .push(Diagnostic {
                severity,
                path: self
                    .path
                    .clone(),
                line,
                message,
            });
    }

    pub fn warning(&mut self, line: usize, message: impl Into<String>) {
        if self.is_true("_Silent_") || self.is_true("_NoWarn_") {
            return;
        }
        self.raise(Severity::Warning, line, message.into());
    }

    pub fn error(&mut self, line: usize, message: impl Into<String>) {
        self.raise(Severity::Error, line, message.into());
    }

    pub fn report(&mut self, line: usize, message: impl Into<String>) {
        if self.is_true("_Silent_") {
            return;
        }
        let message = message.into();
        info!("{}", message);
        self.raise(Severity::Report, line, message);
    }

    pub fn debug(&mut self, line: usize, message: impl Into<String>) {
        if !self.is_true("_Debug_") {
            return;
        }
        self.raise(Severity::Debug, line, message.into());
    }

    pub fn bind(&mut self, name: &str, value: &str) {
        self.evaluator
            .bind(name, value);
    }

    /// Hand code to the evaluator, with the keys of the current scope
    /// visible to it.
    pub fn evaluate(&mut self, line: usize, code: &str) -> Result<String, ScriptError> {
        let location = self.location(line);
        let keys = ScopeKeys {
            scopes: &self.scopes,
            scope: self.scope,
        };
        self.evaluator
            .evaluate(&location, code, &keys)
    }

    /// Evaluate a macro. A named macro runs the custom signature of that
    /// name if one is visible, otherwise the function of that name with
    /// the text as its argument.
    pub fn run_macro(&mut self, line: usize, name: Option<&str>, text: &str) -> Result<String, ScriptError> {
        let Some(name) = name else {
            return self.evaluate(line, text);
        };

        if let Some(Template {
            kind: Kind::Custom(custom),
            ..
        }) = self.signature(name)
        {
            let html = inline::markup(self, line, text);
            return signatures::run_custom(self, &custom, line, text, &html);
        }

        self.bind("text", text);
        self.evaluate(line, &format!("{}(text)", name))
    }

    /// Run a closure with the path of diagnostics temporarily changed.
    pub fn within<T>(&mut self, path: Option<&Path>, f: impl FnOnce(&mut Context) -> T) -> T {
        match path {
            Some(path) if path != self.path => {
                let saved = std::mem::replace(&mut self.path, path.to_path_buf());
                let result = f(self);
                self.path = saved;
                result
            }
            _ => f(self),
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("path", &self.path)
            .field("scope", &self.scope)
            .field("depth", &self.depth)
            .finish()
    }
}
