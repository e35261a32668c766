//! Candidate playlist discovery
//!
//! Scrapes the target page for `.m3u8` URLs, augments the matches with
//! heuristic names under the known CDN base, then probes each candidate
//! until one classifies as a master playlist. The winning body is written to
//! `<stream_name>.m3u8` and the winning URL is recorded for later relay
//! runs.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::PathBuf;
use url::Url;

use super::config::RelayConfig;
use super::error::RelayError;
use super::fetcher::Fetcher;
use crate::parsers::playlist::{classify, PlaylistKind};
use crate::utils::file_utils::{atomic_write, ensure_dir_exists};

/// Well-known playlist names probed under the CDN base even when the page
/// scrape finds nothing.
const HEURISTIC_TAILS: [&str; 5] = [
    "playlist.m3u8",
    "index.m3u8",
    "master.m3u8",
    "chunks_dvr.m3u8",
    "playlist_dvr.m3u8",
];

/// Immutable discovery inputs, derived from configuration once per run.
#[derive(Debug, Clone)]
pub struct DiscoveryRules {
    /// Pattern matching candidate playlist URLs in page HTML.
    pub pattern: Regex,
    /// Origin used to absolutize root-relative matches.
    pub cdn_origin: String,
}

impl DiscoveryRules {
    /// Build the rules for a stream: absolute `.m3u8` URLs anywhere, plus
    /// stream-scoped root-relative paths (with or without an `.sdp`
    /// component).
    pub fn for_stream(config: &RelayConfig) -> Result<Self> {
        let name = regex::escape(&config.stream_name);
        let pattern = Regex::new(&format!(
            r#"(?i)https?://[^"]+\.m3u8|/{name}/[^\s'"<>]+\.sdp/[^\s'"<>]+\.m3u8|/{name}/[^\s'"<>]+\.m3u8"#,
        ))
        .context("Failed to compile candidate pattern")?;

        let cdn_url = Url::parse(&config.cdn_base)
            .with_context(|| format!("Invalid CDN base: {}", config.cdn_base))?;
        let cdn_origin = cdn_url.origin().ascii_serialization();

        Ok(Self {
            pattern,
            cdn_origin,
        })
    }
}

/// What a discovery run found, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredMaster {
    pub url: String,
    pub path: PathBuf,
}

/// Collect candidate playlist URLs from page HTML plus the static
/// heuristics. Root-relative matches are absolutized against the CDN
/// origin; the result is deduplicated and sorted for deterministic probing.
pub fn collect_candidates(html: &str, rules: &DiscoveryRules, cdn_base: &str) -> Vec<String> {
    let mut found: BTreeSet<String> = rules
        .pattern
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect();

    for tail in HEURISTIC_TAILS {
        found.insert(format!("{}{}", cdn_base, tail));
    }

    found
        .into_iter()
        .map(|candidate| {
            if candidate.starts_with('/') {
                format!("{}{}", rules.cdn_origin, candidate)
            } else {
                candidate
            }
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Probe candidates until one classifies as a master playlist.
///
/// Returns `Ok(None)` when no candidate yields a master; that is a reported
/// condition, not an error. Probe failures on individual candidates are
/// logged and skipped.
pub async fn run_discovery(
    config: &RelayConfig,
    fetcher: &dyn Fetcher,
) -> Result<Option<DiscoveredMaster>, RelayError> {
    let rules = DiscoveryRules::for_stream(config).map_err(|e| RelayError::Configuration {
        message: format!("{:#}", e),
    })?;

    // A failed page fetch only costs the scraped candidates; the heuristic
    // URLs are still probed.
    let html = match fetcher.fetch_text(&config.target_page).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {:#}", config.target_page, e);
            String::new()
        }
    };

    let candidates = collect_candidates(&html, &rules, &config.cdn_base);
    tracing::info!("Probing {} candidate playlist URLs", candidates.len());

    for candidate in candidates {
        tracing::debug!("Probing {}", candidate);
        let body = match fetcher.fetch_text(&candidate).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Probe failed for {}: {:#}", candidate, e);
                continue;
            }
        };

        if classify(&body) != PlaylistKind::Master {
            continue;
        }

        tracing::info!("Found master playlist at {}", candidate);

        ensure_dir_exists(&config.out_dir).map_err(|e| RelayError::WriteFailed {
            path: config.out_dir.display().to_string(),
            message: e.to_string(),
        })?;

        let path = config.out_dir.join(format!("{}.m3u8", config.stream_name));
        atomic_write(&path, &body).map_err(|e| RelayError::WriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        // Recording the URL is best effort; the captured playlist stands on
        // its own.
        if let Err(e) = std::fs::write(&config.last_url_path, format!("{}\n", candidate)) {
            tracing::warn!(
                "Failed to record {}: {}",
                config.last_url_path.display(),
                e
            );
        }

        return Ok(Some(DiscoveredMaster {
            url: candidate,
            path,
        }));
    }

    tracing::warn!("No master playlist found among candidates");
    Ok(None)
}
