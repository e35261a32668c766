//! Playlist parsing modules
//!
//! Contains the line-oriented HLS playlist parser used by the relay core.

pub mod playlist;

// Re-export commonly used parser types
pub use playlist::*;
