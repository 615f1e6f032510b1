//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL, the host used for mode detection, an optional pinned
//! mode, timeouts, the data directory and the last used login.
//!
//! Configuration is stored at `~/.config/pledgedesk/config.json`. Environment
//! variables override the file; see [`Config::apply_env`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::REQUEST_TIMEOUT_SECS;
use crate::auth::backend::SIMULATED_DELAY_MS;
use crate::mode::{HostSignals, Mode};

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "pledgedesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// API base URL used when nothing is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api";

pub const ENV_API_URL: &str = "PLEDGEDESK_API_URL";
pub const ENV_HOST: &str = "PLEDGEDESK_HOST";
pub const ENV_MODE: &str = "PLEDGEDESK_MODE";
pub const ENV_ENVIRONMENT: &str = "PLEDGEDESK_ENV";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    /// Hostname the dashboard is served from, for mode detection
    pub host: Option<String>,
    /// Pin the backend mode instead of detecting it
    pub mode: Option<Mode>,
    pub request_timeout_secs: u64,
    pub simulated_delay_ms: u64,
    pub data_dir: Option<PathBuf>,
    pub log_to_file: bool,
    pub last_login: Option<String>,
    /// Development build flag, from the environment only
    #[serde(skip)]
    pub development: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            host: None,
            mode: None,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            simulated_delay_ms: SIMULATED_DELAY_MS,
            data_dir: None,
            log_to_file: false,
            last_login: None,
            development: false,
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
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the session file and logs
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Apply `PLEDGEDESK_*` overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; empty values are ignored
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.host = Some(host);
        }
        if let Some(mode) = lookup(ENV_MODE) {
            match mode.parse() {
                Ok(mode) => self.mode = Some(mode),
                Err(e) => warn!(error = %e, "Ignoring {}", ENV_MODE),
            }
        }
        if let Some(env) = lookup(ENV_ENVIRONMENT) {
            self.development = env.trim().eq_ignore_ascii_case("development");
        }
    }

    pub fn host_signals(&self) -> HostSignals {
        HostSignals {
            hostname: self.host.clone(),
            development: self.development,
        }
    }

    /// The pinned mode, or the one detected from host signals
    pub fn decide_mode(&self) -> Mode {
        self.mode.unwrap_or_else(|| Mode::detect(&self.host_signals()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.simulated_delay_ms, 800);
        assert!(config.mode.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            api_base_url: "https://api.pledgedesk.io/api".to_string(),
            mode: Some(Mode::Networked),
            last_login: Some("ops".to_string()),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_base_url, "https://api.pledgedesk.io/api");
        assert_eq!(loaded.mode, Some(Mode::Networked));
        assert_eq!(loaded.last_login.as_deref(), Some("ops"));
    }

    #[test]
    fn test_save_reports_unusable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("pledgedesk");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = Config::default()
            .save_to(&blocker.join("config.json"))
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to create config directory"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"host": "admin.pledgedesk.io"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.host.as_deref(), Some("admin.pledgedesk.io"));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env_with(env(&[
            (ENV_API_URL, "https://api.example.org"),
            (ENV_HOST, "admin.example.org"),
            (ENV_MODE, "simulated"),
            (ENV_ENVIRONMENT, "development"),
        ]));

        assert_eq!(config.api_base_url, "https://api.example.org");
        assert_eq!(config.host.as_deref(), Some("admin.example.org"));
        assert_eq!(config.mode, Some(Mode::Simulated));
        assert!(config.development);
    }

    #[test]
    fn test_env_ignores_empty_and_invalid() {
        let mut config = Config::default();
        config.apply_env_with(env(&[(ENV_API_URL, ""), (ENV_MODE, "sometimes")]));

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.mode.is_none());
    }

    #[test]
    fn test_decide_mode() {
        let mut config = Config {
            host: Some("admin.pledgedesk.io".to_string()),
            ..Default::default()
        };
        assert_eq!(config.decide_mode(), Mode::Networked);

        config.host = Some("preview-42.vercel.app".to_string());
        assert_eq!(config.decide_mode(), Mode::Simulated);

        config.mode = Some(Mode::Networked);
        assert_eq!(config.decide_mode(), Mode::Networked);
    }

    #[test]
    fn test_data_dir_override() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/pledgedesk-test")),
            ..Default::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/pledgedesk-test"));
    }
}
