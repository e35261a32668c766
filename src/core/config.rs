//! Relay configuration management
//!
//! All process-wide settings live in an explicit [`RelayConfig`] constructed
//! once at startup. Environment variables override the defaults through
//! [`RelayConfig::from_env`]; nothing reads the environment after that.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::RelayError;

const DEFAULT_TARGET_PAGE: &str = "https://rdxgoa.com/";
const DEFAULT_CDN_BASE: &str = "https://g5nl6xoalpq6-hls-live.5centscdn.com/rdxgoa/";
const DEFAULT_STREAM_NAME: &str = "rdxgoa";
const DEFAULT_OUT_DIR: &str = "streams";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Gecko/20100101 Firefox/114.0";
const DEFAULT_REFERER: &str = "https://rdxgoa.com/";
const DEFAULT_ORIGIN: &str = "https://rdxgoa.com";
const DEFAULT_LAST_URL_FILE: &str = "last_url.txt";

/// Number of segments kept in the sliding live window by default.
pub const DEFAULT_WINDOW_SIZE: usize = 4;

/// HTTP timeout applied to every fetch, in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 8;

/// Main relay configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Playlist to relay. When unset, the URL recorded by a previous
    /// discovery run (`last_url_path`) is used instead.
    pub playlist_url: Option<String>,
    /// Page scraped for candidate playlist URLs in discovery mode.
    pub target_page: String,
    /// CDN directory heuristic candidates are appended to.
    pub cdn_base: String,
    /// Base name for output files.
    pub stream_name: String,
    /// Directory output playlists are written into.
    pub out_dir: PathBuf,
    /// Segments kept in the live window.
    pub window_size: usize,
    pub user_agent: String,
    pub referer: String,
    pub origin: String,
    pub timeout_seconds: u64,
    /// File recording the most recently discovered playlist URL.
    pub last_url_path: PathBuf,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            playlist_url: None,
            target_page: DEFAULT_TARGET_PAGE.to_string(),
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            stream_name: DEFAULT_STREAM_NAME.to_string(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            window_size: DEFAULT_WINDOW_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            last_url_path: PathBuf::from(DEFAULT_LAST_URL_FILE),
        }
    }
}

impl RelayConfig {
    /// Build a configuration from defaults with environment overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PLAYLIST_URL") {
            if !url.trim().is_empty() {
                config.playlist_url = Some(url.trim().to_string());
            }
        }
        if let Ok(page) = std::env::var("TARGET_PAGE") {
            config.target_page = page;
        }
        if let Ok(base) = std::env::var("KNOWN_CDN_BASE") {
            config.cdn_base = base;
        }
        if let Ok(name) = std::env::var("STREAM_NAME") {
            config.stream_name = name;
        }
        if let Ok(dir) = std::env::var("OUT_DIR") {
            config.out_dir = PathBuf::from(dir);
        }
        if let Ok(agent) = std::env::var("USER_AGENT") {
            config.user_agent = agent;
        }
        if let Ok(referer) = std::env::var("REFERER") {
            config.referer = referer;
        }
        if let Ok(origin) = std::env::var("ORIGIN") {
            config.origin = origin;
        }
        if let Ok(value) = std::env::var("N_SEGMENTS") {
            match value.parse() {
                Ok(n) => config.window_size = n,
                Err(_) => tracing::warn!("Ignoring unparseable N_SEGMENTS: {}", value),
            }
        }
        if let Ok(value) = std::env::var("HTTP_TIMEOUT") {
            match value.parse() {
                Ok(secs) => config.timeout_seconds = secs,
                Err(_) => tracing::warn!("Ignoring unparseable HTTP_TIMEOUT: {}", value),
            }
        }

        config
    }

    /// Resolve the playlist URL to relay: the configured URL, or the one
    /// recorded by a previous discovery run.
    pub fn resolve_playlist_url(&self) -> Result<String, RelayError> {
        if let Some(ref url) = self.playlist_url {
            return Ok(url.clone());
        }

        match std::fs::read_to_string(&self.last_url_path) {
            Ok(recorded) if !recorded.trim().is_empty() => Ok(recorded.trim().to_string()),
            _ => Err(RelayError::Configuration {
                message: format!(
                    "PLAYLIST_URL not set and {} not found",
                    self.last_url_path.display()
                ),
            }),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            anyhow::bail!("Window size must be greater than 0");
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            anyhow::bail!("Timeout should be between 1 and 300 seconds");
        }

        if self.stream_name.is_empty() {
            anyhow::bail!("Stream name must not be empty");
        }

        if !self.cdn_base.ends_with('/') {
            anyhow::bail!("CDN base must end with a trailing slash");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = RelayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size, DEFAULT_WINDOW_SIZE);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(config.playlist_url.is_none());
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = RelayConfig::default();
        config.window_size = 0;
        assert!(config.validate().is_err());

        config = RelayConfig::default();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());

        config = RelayConfig::default();
        config.timeout_seconds = 600;
        assert!(config.validate().is_err());

        config = RelayConfig::default();
        config.stream_name = String::new();
        assert!(config.validate().is_err());

        config = RelayConfig::default();
        config.cdn_base = "https://cdn.example.com/live".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = RelayConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RelayConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.stream_name, config.stream_name);
        assert_eq!(parsed.window_size, config.window_size);
    }

    // Environment access is process global, so all env interactions live in
    // this single test.
    #[test]
    fn test_env_overrides() {
        std::env::set_var("PLAYLIST_URL", "https://cdn.example.com/live/dvr.m3u8");
        std::env::set_var("STREAM_NAME", "other");
        std::env::set_var("OUT_DIR", "relayed");
        std::env::set_var("N_SEGMENTS", "6");
        std::env::set_var("HTTP_TIMEOUT", "nope");

        let config = RelayConfig::from_env();

        assert_eq!(
            config.playlist_url.as_deref(),
            Some("https://cdn.example.com/live/dvr.m3u8")
        );
        assert_eq!(config.stream_name, "other");
        assert_eq!(config.out_dir, PathBuf::from("relayed"));
        assert_eq!(config.window_size, 6);
        // Unparseable override keeps the default.
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);

        std::env::remove_var("PLAYLIST_URL");
        std::env::remove_var("STREAM_NAME");
        std::env::remove_var("OUT_DIR");
        std::env::remove_var("N_SEGMENTS");
        std::env::remove_var("HTTP_TIMEOUT");
    }

    #[test]
    fn test_resolve_playlist_url_from_recorded_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let recorded = temp_dir.path().join("last_url.txt");
        std::fs::write(&recorded, "https://cdn.example.com/live/dvr.m3u8\n").unwrap();

        let mut config = RelayConfig::default();
        config.last_url_path = recorded;

        assert_eq!(
            config.resolve_playlist_url().unwrap(),
            "https://cdn.example.com/live/dvr.m3u8"
        );
    }

    #[test]
    fn test_resolve_playlist_url_missing_everywhere() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = RelayConfig::default();
        config.last_url_path = temp_dir.path().join("absent.txt");

        assert!(matches!(
            config.resolve_playlist_url(),
            Err(RelayError::Configuration { .. })
        ));
    }
}
