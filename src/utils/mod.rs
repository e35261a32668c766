//! Utility modules and helper functions

pub mod file_utils;
pub mod logging;

// Re-export commonly used utilities
pub use file_utils::*;
pub use logging::*;
