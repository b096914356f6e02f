use std::{fmt, path::PathBuf};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Report,
    Warning,
    Error,
}

/// A message tied to a line of a source file. Line zero means the file as a
/// whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub path: PathBuf,
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Warning => write!(
                f,
                "{}:{}:warning: {}",
                self.path
                    .display(),
                self.line,
                self.message
            ),
            _ => write!(
                f,
                "{}:{}: {}",
                self.path
                    .display(),
                self.line,
                self.message
            ),
        }
    }
}

/// The diagnostics collected over one translation unit.
#[derive(Debug, Clone, Default)]
pub struct Problems {
    diagnostics: Vec<Diagnostic>,
}

impl Problems {
    pub fn new() -> Problems {
        Problems::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        debug!("{}", diagnostic);
        self.diagnostics
            .push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn errors(&self) -> usize {
        self.count(Severity::Error)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Messages of the given severity, for assertions and summaries.
    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message.as_str())
            .collect()
    }

    pub fn extend(&mut self, other: Problems) {
        self.diagnostics
            .extend(other.diagnostics);
    }
}

#[cfg(test)]
mod check {
    use super::*;

    fn diagnostic(severity: Severity, message: &str) -> Diagnostic {
        Diagnostic {
            severity,
            path: PathBuf::from("page.xil"),
            line: 3,
            message: message.to_string(),
        }
    }

    #[test]
    fn counting() {
        let mut problems = Problems::new();
        problems.push(diagnostic(Severity::Warning, "w"));
        problems.push(diagnostic(Severity::Error, "e1"));
        problems.push(diagnostic(Severity::Error, "e2"));
        assert_eq!(problems.warnings(), 1);
        assert_eq!(problems.errors(), 2);
        assert_eq!(problems.messages(Severity::Error), vec!["e1", "e2"]);
    }

    #[test]
    fn display() {
        let w = diagnostic(Severity::Warning, "TOC is empty");
        assert_eq!(w.to_string(), "page.xil:3:warning: TOC is empty");
        let e = diagnostic(Severity::Error, "bad row");
        assert_eq!(e.to_string(), "page.xil:3: bad row");
    }
}
