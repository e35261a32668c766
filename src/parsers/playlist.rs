//! M3U8 playlist parsing utilities
//!
//! Line-oriented parsing of HLS playlists: master/media classification,
//! EXTINF segment pairing, rolling header extraction, and segment URI
//! resolution against a base URL.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Directive that marks a variant stream declaration in a master playlist.
pub const STREAM_INF_DIRECTIVE: &str = "#EXT-X-STREAM-INF";

/// Directive preceding every media segment URI.
pub const EXTINF_DIRECTIVE: &str = "#EXTINF";

const TARGET_DURATION_DIRECTIVE: &str = "#EXT-X-TARGETDURATION";
const MEDIA_SEQUENCE_DIRECTIVE: &str = "#EXT-X-MEDIA-SEQUENCE";

/// Fallback target duration (seconds) when the directive is missing or
/// unparseable.
pub const DEFAULT_TARGET_DURATION: u64 = 6;

/// Kind of playlist returned by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaylistKind {
    /// Lists variant streams pointing at media playlists.
    Master,
    /// Lists timed segments (media/DVR playlist).
    Media,
}

/// A single media segment: the EXTINF directive line and the URI line that
/// follows it, both kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub extinf: String,
    pub uri: String,
}

/// Rolling metadata extracted from a media playlist header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaHeader {
    /// Target duration in whole seconds.
    pub target_duration: u64,
    /// Sequence number of the first segment in the full segment list.
    pub media_sequence: u64,
}

impl Default for MediaHeader {
    fn default() -> Self {
        Self {
            target_duration: DEFAULT_TARGET_DURATION,
            media_sequence: 0,
        }
    }
}

impl MediaHeader {
    /// Extract the header from a trimmed line sequence. Each directive scan
    /// stops at its first match; missing or malformed values fall back to
    /// the documented defaults and never fail.
    pub fn from_lines(lines: &[&str]) -> Self {
        Self {
            target_duration: directive_value(lines, TARGET_DURATION_DIRECTIVE)
                .unwrap_or(DEFAULT_TARGET_DURATION),
            media_sequence: directive_value(lines, MEDIA_SEQUENCE_DIRECTIVE).unwrap_or(0),
        }
    }
}

/// Classify playlist text as master or media.
///
/// A playlist is master if it contains the variant stream directive anywhere
/// in its text. No other heuristics are applied.
pub fn classify(content: &str) -> PlaylistKind {
    if content.contains(STREAM_INF_DIRECTIVE) {
        PlaylistKind::Master
    } else {
        PlaylistKind::Media
    }
}

/// Split playlist text into trimmed, non-blank lines.
pub fn playlist_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Collect (EXTINF, URI) pairs from a trimmed line sequence, in order.
///
/// A segment is an EXTINF line immediately followed by another line, taken
/// verbatim. Lines not matched this way are skipped. A trailing EXTINF with
/// no following line is dropped.
pub fn extract_segments(lines: &[&str]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with(EXTINF_DIRECTIVE) && i + 1 < lines.len() {
            segments.push(Segment {
                extinf: lines[i].to_string(),
                uri: lines[i + 1].to_string(),
            });
            i += 2;
        } else {
            i += 1;
        }
    }

    segments
}

/// Resolve a segment URI to absolute form.
///
/// URIs that already carry a scheme are returned unchanged; everything else
/// is resolved against `base` with RFC 3986 reference resolution, which
/// covers `../`, absolute-path, and bare relative forms.
pub fn resolve_uri(base: &Url, uri: &str) -> Result<String> {
    if Url::parse(uri).is_ok() {
        return Ok(uri.to_string());
    }

    let resolved = base
        .join(uri)
        .map_err(|e| anyhow!("Failed to resolve {} against {}: {}", uri, base, e))?;

    Ok(resolved.to_string())
}

fn directive_value(lines: &[&str], directive: &str) -> Option<u64> {
    let line = lines.iter().find(|line| line.starts_with(directive))?;
    let value = line.split_once(':')?.1.trim();

    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::debug!("Unparseable {} value: {}", directive, value);
            None
        }
    }
}
