//! Configuration storage for Sift
//!
//! Config files are JSON documents kept in one directory, by default
//! `~/.config/sift/`. Setting `SIFT_CONFIG_DIR` moves that directory,
//! which is how tests and portable installs keep their settings apart.
//!
//! Call [`init`] at application startup to bootstrap the config directory.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "SIFT_CONFIG_DIR";

/// Name of the config directory under the platform config root
const APP_DIR: &str = "sift";

/// A directory holding JSON config files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDir {
    root: PathBuf,
}

impl ConfigDir {
    /// Use an explicit directory
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `SIFT_CONFIG_DIR` if set, otherwise the platform config root
    pub fn resolve() -> Option<Self> {
        match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Some(Self::at(dir)),
            _ => dirs::config_dir().map(|p| Self::at(p.join(APP_DIR))),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.path(filename).exists()
    }

    /// Create the directory if missing
    pub fn ensure(&self) -> Result<&Path> {
        std::fs::create_dir_all(&self.root).with_context(|| {
            format!("Failed to create config directory: {}", self.root.display())
        })?;
        Ok(&self.root)
    }

    pub fn load<T: DeserializeOwned>(&self, filename: &str) -> Result<T> {
        load_json_file(&self.path(filename))
    }

    /// Like [`ConfigDir::load`], but a missing file is `Ok(None)`
    pub fn load_optional<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>> {
        if self.exists(filename) {
            self.load(filename).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn save<T: Serialize>(&self, filename: &str, value: &T) -> Result<PathBuf> {
        self.ensure()?;
        let path = self.path(filename);
        save_json_file(&path, value)?;
        Ok(path)
    }
}

fn resolve() -> Result<ConfigDir> {
    ConfigDir::resolve().context("Could not determine config directory")
}

/// Initialize the Sift config directory.
///
/// Call this once at application startup.
pub fn init() -> Result<PathBuf> {
    let dir = resolve()?;
    dir.ensure()?;
    Ok(dir.root)
}

/// Get the Sift config directory
pub fn config_dir() -> Option<PathBuf> {
    ConfigDir::resolve().map(|dir| dir.root)
}

/// Get the path to a config file within the Sift config directory
pub fn config_path(filename: &str) -> Option<PathBuf> {
    ConfigDir::resolve().map(|dir| dir.path(filename))
}

/// Load a config file from the Sift config directory; `None` when it does not exist
pub fn load_optional<T: DeserializeOwned>(filename: &str) -> Result<Option<T>> {
    resolve()?.load_optional(filename)
}

/// Load and parse a JSON file from an arbitrary path
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Write pretty-printed JSON, replacing the file only once the new content is on disk
pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    let staging = path.with_extension("json.tmp");
    std::fs::write(&staging, content)
        .with_context(|| format!("Failed to write config file: {}", staging.display()))?;
    std::fs::rename(&staging, path)
        .with_context(|| format!("Failed to replace config file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        server_url: String,
    }

    fn sample() -> Sample {
        Sample {
            server_url: "http://localhost:8080".to_string(),
        }
    }

    #[test]
    fn test_path_joins_root() {
        let dir = ConfigDir::at("/tmp/sift-test");
        assert_eq!(dir.path("sift.json"), PathBuf::from("/tmp/sift-test/sift.json"));
    }

    #[test]
    fn test_save_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ConfigDir::at(tmp.path().join("nested"));

        let path = dir.save("sample.json", &sample()).unwrap();
        assert!(path.exists());
        assert!(!dir.path("sample.json.tmp").exists());
        assert_eq!(dir.load::<Sample>("sample.json").unwrap(), sample());
    }

    #[test]
    fn test_load_optional_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ConfigDir::at(tmp.path());
        assert!(dir.load_optional::<Sample>("absent.json").unwrap().is_none());
    }

    #[test]
    fn test_load_optional_reports_bad_json() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ConfigDir::at(tmp.path());
        std::fs::write(dir.path("broken.json"), "{ not json").unwrap();

        let err = dir.load_optional::<Sample>("broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing.json");
        let err = load_json_file::<Sample>(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }
}
