//! Taking a source file through reading, assembly and the pipeline phases

mod context;
mod engine;
mod pipeline;

#[cfg(test)]
pub(crate) mod check;

// Re-export all public symbols
pub use context::*;
pub use engine::*;
pub use pipeline::*;
