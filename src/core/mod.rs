//! Core relay logic
//!
//! Configuration, the fetch seam, playlist transformation, and the two
//! operating modes (relay and discovery).

pub mod config;
pub mod discovery;
pub mod error;
pub mod fetcher;
pub mod live_window;
pub mod pipeline;


// Re-export commonly used types
pub use config::RelayConfig;
pub use error::RelayError;
