//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, request timeout, media upload settings
//! and the last email used to log in.
//!
//! Configuration is stored at `~/.config/budgetbaba/config.json`. Environment
//! variables override file values (see `Config::apply_env`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Application name used for config/data directory paths
const APP_NAME: &str = "budgetbaba";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Media host account that stores profile photos and icons
const DEFAULT_CLOUD_NAME: &str = "dcadhcqkx";

const DEFAULT_UPLOAD_PRESET: &str = "budgetbaba";

pub const ENV_API_URL: &str = "BUDGETBABA_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "BUDGETBABA_TIMEOUT_SECS";
pub const ENV_CLOUD_NAME: &str = "BUDGETBABA_CLOUD_NAME";
pub const ENV_UPLOAD_PRESET: &str = "BUDGETBABA_UPLOAD_PRESET";
pub const ENV_DATA_DIR: &str = "BUDGETBABA_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub media_cloud_name: String,
    pub media_upload_preset: String,
    pub last_email: Option<String>,
    /// Where the session is persisted. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            media_cloud_name: DEFAULT_CLOUD_NAME.to_string(),
            media_upload_preset: DEFAULT_UPLOAD_PRESET.to_string(),
            last_email: None,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Record the last login email in the config file.
    ///
    /// Only `last_email` changes on disk. Environment overrides applied to
    /// the running config are never written back.
    pub fn remember_last_email(email: &str) -> Result<()> {
        Self::remember_last_email_at(&Self::config_path()?, email)
    }

    pub fn remember_last_email_at(path: &Path, email: &str) -> Result<()> {
        let mut on_disk = Self::load_from(path)?;
        on_disk.last_email = Some(email.to_string());
        on_disk.save_to(path)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Override fields from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override fields from any key lookup. Unparseable values are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout_secs = secs,
                _ => warn!(value = %raw, "Ignoring invalid {}", ENV_TIMEOUT_SECS),
            }
        }
        if let Some(name) = lookup(ENV_CLOUD_NAME).filter(|v| !v.is_empty()) {
            self.media_cloud_name = name;
        }
        if let Some(preset) = lookup(ENV_UPLOAD_PRESET).filter(|v| !v.is_empty()) {
            self.media_upload_preset = preset;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.last_email.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"last_email":"a@b.com"}"#).unwrap();
        assert_eq!(config.last_email.as_deref(), Some("a@b.com"));
        assert_eq!(config.media_cloud_name, DEFAULT_CLOUD_NAME);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "http://localhost:8080/api/v1.0"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_DATA_DIR, "/tmp/bb"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "http://localhost:8080/api/v1.0");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/bb"));
        assert_eq!(config.media_upload_preset, DEFAULT_UPLOAD_PRESET);
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()));
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_remembering_email_keeps_env_overrides_off_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let saved = Config {
            media_cloud_name: "mine".to_string(),
            ..Config::default()
        };
        saved.save_to(&path).unwrap();

        let mut running = Config::load_from(&path).unwrap();
        running.apply_overrides(|key| match key {
            ENV_API_URL => Some("http://localhost:9/api".to_string()),
            ENV_DATA_DIR => Some("/tmp/throwaway".to_string()),
            _ => None,
        });
        Config::remember_last_email_at(&path, "a@b.com").unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.last_email.as_deref(), Some("a@b.com"));
        assert_eq!(reloaded.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(reloaded.data_dir, None);
        assert_eq!(reloaded.media_cloud_name, "mine");
        assert_eq!(running.api_base_url, "http://localhost:9/api");
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }
}
