//! HLS Relay - Core Library
//!
//! Fetches an HLS playlist and republishes it as local files: master
//! playlists are copied verbatim, media/DVR playlists are turned into a
//! bounded sliding-window live playlist. A discovery mode scrapes a target
//! page for candidate playlist URLs and captures the first master it finds.

pub mod core;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{
    config::RelayConfig,
    discovery::{run_discovery, DiscoveredMaster, DiscoveryRules},
    error::RelayError,
    fetcher::{Fetcher, HttpFetcher},
    live_window::build_live,
    pipeline::{run_relay, RelayOutcome},
};
pub use crate::parsers::playlist::{classify, PlaylistKind};
