//! General-purpose utility modules.

pub mod error;
pub mod humanize;
pub mod log;

// Re-export commonly used items
pub use error::{DebugError, Result};
pub use humanize::humanize_ms;
