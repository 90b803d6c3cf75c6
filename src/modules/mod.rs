//! Execution modules for package management tasks

pub mod core;
pub mod error;
pub mod interface;
pub mod system;

// Re-export commonly used types
pub use error::*;
pub use interface::*;
