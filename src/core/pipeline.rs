//! Relay pipeline
//!
//! Fetches the configured playlist, classifies it, and republishes it under
//! the output directory: a master playlist is copied verbatim to
//! `<stream_name>.m3u`, a media playlist becomes a sliding-window live
//! playlist at `<stream_name>_live.m3u`. All writes go through an atomic
//! rename; on any error nothing is written.

use std::path::PathBuf;
use url::Url;

use super::config::RelayConfig;
use super::error::RelayError;
use super::fetcher::Fetcher;
use super::live_window::build_live;
use crate::parsers::playlist::{classify, PlaylistKind};
use crate::utils::file_utils::{atomic_write, ensure_dir_exists};

/// What a relay run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    pub kind: PlaylistKind,
    pub path: PathBuf,
}

/// Run one fetch-classify-republish cycle.
pub async fn run_relay(
    config: &RelayConfig,
    fetcher: &dyn Fetcher,
) -> Result<RelayOutcome, RelayError> {
    let playlist_url = config.resolve_playlist_url()?;

    tracing::debug!("Fetching playlist: {}", playlist_url);
    let text = fetcher
        .fetch_text(&playlist_url)
        .await
        .map_err(|e| RelayError::FetchFailed {
            url: playlist_url.clone(),
            message: format!("{:#}", e),
        })?;

    ensure_dir_exists(&config.out_dir).map_err(|e| RelayError::WriteFailed {
        path: config.out_dir.display().to_string(),
        message: e.to_string(),
    })?;

    match classify(&text) {
        PlaylistKind::Master => {
            let path = config.out_dir.join(format!("{}.m3u", config.stream_name));
            write_playlist(&path, &text)?;
            tracing::info!("Wrote master playlist to {}", path.display());
            Ok(RelayOutcome {
                kind: PlaylistKind::Master,
                path,
            })
        }
        PlaylistKind::Media => {
            let base = directory_base(&playlist_url)?;
            let live = build_live(&text, &base, config.window_size)?;

            let path = config
                .out_dir
                .join(format!("{}_live.m3u", config.stream_name));
            write_playlist(&path, &live)?;
            tracing::info!(
                "Wrote live playlist ({} segment window) to {}",
                config.window_size,
                path.display()
            );
            Ok(RelayOutcome {
                kind: PlaylistKind::Media,
                path,
            })
        }
    }
}

/// Directory portion of the source URL: everything after the final `/`
/// stripped, then `/` appended. Segment URIs resolve against this.
fn directory_base(playlist_url: &str) -> Result<Url, RelayError> {
    let base = match playlist_url.rsplit_once('/') {
        Some((head, _)) => format!("{}/", head),
        None => playlist_url.to_string(),
    };

    Url::parse(&base).map_err(|e| RelayError::InvalidUrl {
        url: base.clone(),
        message: e.to_string(),
    })
}

fn write_playlist(path: &PathBuf, text: &str) -> Result<(), RelayError> {
    atomic_write(path, text).map_err(|e| RelayError::WriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
