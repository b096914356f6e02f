//! Evaluation of the code in macros, conditionals and custom signatures.
//!
//! The translator only needs to hand code to something and get a string
//! back, so the evaluator sits behind a trait. The crate ships a small
//! expression language implementing it.

mod expressions;
mod lexer;
mod parser;
mod value;

use std::fmt;

// Re-export all public symbols
pub use expressions::*;
pub use value::*;

/// Read access to the key values visible where code is evaluated.
pub trait Keys {
    fn value(&self, key: &str) -> Option<String>;
}

impl Keys for std::collections::HashMap<String, String> {
    fn value(&self, key: &str) -> Option<String> {
        self.get(key)
            .cloned()
    }
}

/// A failure evaluating code. The line is 1-based within the code handed to
/// the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub message: String,
    pub line: usize,
}

impl ScriptError {
    pub fn new(line: usize, message: impl Into<String>) -> ScriptError {
        ScriptError {
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ScriptError {}

pub trait Evaluator {
    /// Make a named value visible to subsequently evaluated code.
    fn bind(&mut self, name: &str, value: &str);

    /// Evaluate code, returning its result as a string. The location is a
    /// hint naming where the code came from.
    fn evaluate(&mut self, location: &str, code: &str, keys: &dyn Keys) -> Result<String, ScriptError>;
}
