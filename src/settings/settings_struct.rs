use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Tunables consumed by the generators, the fetcher and the binary.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Probe URL of the generated `url-test` / `urltest` groups.
    pub test_url: String,
    /// Probe interval in seconds.
    pub test_interval: u32,
    /// Latency tolerance in milliseconds.
    pub test_tolerance: u32,
    pub fetch_timeout_secs: u64,
    pub log_level: String,
    pub clash_mixed_port: u16,
    pub singbox_mixed_port: u16,
}

pub fn default_test_url() -> String {
    "http://www.gstatic.com/generate_204".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            test_url: default_test_url(),
            test_interval: 300,
            test_tolerance: 50,
            fetch_timeout_secs: 15,
            log_level: default_log_level(),
            clash_mixed_port: 7890,
            singbox_mixed_port: 2080,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from TOML or YAML text
    ///
    /// TOML is tried first; anything that is not valid TOML is read as YAML.
    pub fn from_content(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }

        if toml::from_str::<toml::Value>(content).is_ok() {
            debug!("Reading settings as TOML");
            return toml::from_str(content)
                .map_err(|e| ConvertError::Settings(format!("invalid TOML settings: {}", e)));
        }

        debug!("Reading settings as YAML");
        serde_yaml::from_str::<Option<Settings>>(content)
            .map(Option::unwrap_or_default)
            .map_err(|e| ConvertError::Settings(format!("invalid YAML settings: {}", e)))
    }

    /// Load settings from a file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConvertError::Settings(format!("failed to read {}: {}", path.display(), e))
        })?;
        Settings::from_content(&content)
    }
}
