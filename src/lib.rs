//! Translate Xilize markup into XHTML.
//!
//! Source text is read into raw blocks, each carrying a signature resolved
//! through the scope chain. The blocks are assembled into a tree, then taken
//! through the exec, translate, translateLast and write phases.

#[macro_use]
pub mod regex;

pub mod catalog;
pub mod config;
pub mod inline;
pub mod language;
pub mod parsing;
pub mod problem;
pub mod scope;
pub mod script;
pub mod signatures;
pub mod templating;
pub mod translation;
