// Diagnostics raised while translating, and their presentation

mod format;
mod messages;

// Re-export all public symbols
pub use format::*;
pub use messages::*;
