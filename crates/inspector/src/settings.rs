//! Viewer settings
//!
//! Loaded in the following order of priority:
//! 1. `SIFT_SERVER_URL` environment variable (server URL only)
//! 2. JSON file (`sift.json` in the config directory, see the `config` crate)
//! 3. Built-in defaults

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config filename in the Sift config directory
const CONFIG_FILE: &str = "sift.json";

/// Environment variable overriding the server URL
pub const SERVER_URL_ENV: &str = "SIFT_SERVER_URL";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Base URL of the capture server's web interface
    pub server_url: String,
    pub request_timeout_secs: u64,
    /// Delay between the search box losing focus and its suggestion clearing
    pub suggestion_blur_grace_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: 10,
            suggestion_blur_grace_ms: 200,
        }
    }
}

impl ViewerConfig {
    /// Load config from the environment, the config file and defaults
    pub fn load() -> Result<Self> {
        let file = config::load_optional(CONFIG_FILE)?;
        Self::from_sources(file, std::env::var(SERVER_URL_ENV).ok())
    }

    /// Load config from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = config::load_json_file(path)?;
        config.validated()
    }

    /// Merge an optional file config with an optional server URL override
    pub fn from_sources(file: Option<Self>, server_url: Option<String>) -> Result<Self> {
        let mut config = file.unwrap_or_default();
        if let Some(url) = server_url.filter(|u| !u.trim().is_empty()) {
            config.server_url = url.trim().to_string();
        }
        config.validated()
    }

    /// Leave an editable file with the built-in defaults on first start.
    ///
    /// Environment overrides are never written. Returns the path of a newly created file.
    pub fn write_default_if_missing() -> Result<Option<PathBuf>> {
        let dir = config::ConfigDir::resolve().context("Could not determine config directory")?;
        Self::write_default_in(&dir)
    }

    pub fn write_default_in(dir: &config::ConfigDir) -> Result<Option<PathBuf>> {
        if dir.exists(CONFIG_FILE) {
            return Ok(None);
        }
        dir.save(CONFIG_FILE, &Self::default()).map(Some)
    }

    pub fn default_config_path() -> Option<PathBuf> {
        config::config_path(CONFIG_FILE)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.suggestion_blur_grace_ms)
    }

    fn validated(mut self) -> Result<Self> {
        let parsed = url::Url::parse(&self.server_url)
            .with_context(|| format!("Invalid server URL: {}", self.server_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "Server URL must use http or https, got {}",
                parsed.scheme()
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        self.server_url = self.server_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::from_sources(None, None).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.blur_grace(), Duration::from_millis(200));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ViewerConfig {
            server_url: "http://capture.internal:8080".to_string(),
            ..ViewerConfig::default()
        };
        let config =
            ViewerConfig::from_sources(Some(file), Some("https://mail.test/".to_string()))
                .unwrap();
        assert_eq!(config.server_url, "https://mail.test");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let config = ViewerConfig::from_sources(None, Some("  ".to_string())).unwrap();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(ViewerConfig::from_sources(None, Some("not a url".to_string())).is_err());
        assert!(ViewerConfig::from_sources(None, Some("ftp://x.test".to_string())).is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sift.json");
        std::fs::write(&path, r#"{ "suggestion_blur_grace_ms": 350 }"#).unwrap();

        let config = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(config.suggestion_blur_grace_ms, 350);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_default_file_ignores_env_override() {
        let dir = TempDir::new().unwrap();
        let config_dir = config::ConfigDir::at(dir.path());

        let running = ViewerConfig::from_sources(None, Some("https://once.test".to_string()))
            .unwrap();
        assert_eq!(running.server_url, "https://once.test");

        let path = ViewerConfig::write_default_in(&config_dir).unwrap().unwrap();
        let written = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(written, ViewerConfig::default());
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let config_dir = config::ConfigDir::at(dir.path());
        std::fs::write(
            config_dir.path("sift.json"),
            r#"{ "server_url": "http://capture.internal:8080" }"#,
        )
        .unwrap();

        assert!(ViewerConfig::write_default_in(&config_dir).unwrap().is_none());
        let config = ViewerConfig::from_file(&config_dir.path("sift.json")).unwrap();
        assert_eq!(config.server_url, "http://capture.internal:8080");
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let file = ViewerConfig {
            request_timeout_secs: 0,
            ..ViewerConfig::default()
        };
        assert!(ViewerConfig::from_sources(Some(file), None).is_err());
    }
}
