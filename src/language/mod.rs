// Types representing blocks of Xilize markup and the tree they assemble into

mod error;
mod modifiers;
mod types;

// Re-export all public symbols
pub use error::*;
pub use modifiers::*;
pub use types::*;
