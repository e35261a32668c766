//! Relay error types
//!
//! Typed errors for the fatal conditions of the relay pipeline. Header
//! parsing is deliberately not represented here: malformed rolling metadata
//! falls back to defaults instead of failing (see `parsers::playlist`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors surfaced by the relay core.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum RelayError {
    /// The media playlist contained zero extractable segments. No output
    /// file is written when this occurs.
    #[error("No segments found in playlist")]
    NoSegmentsFound,

    #[error("Failed to fetch {url}: {message}")]
    FetchFailed { url: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl RelayError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration { .. } => 2,
            Self::FetchFailed { .. } => 2,
            Self::InvalidUrl { .. } => 2,
            Self::NoSegmentsFound => 4,
            Self::WriteFailed { .. } => 5,
        }
    }
}
