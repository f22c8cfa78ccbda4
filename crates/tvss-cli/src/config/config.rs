//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Station settings.
    #[serde(default)]
    pub station: StationConfig,
    /// API connection settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Station configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StationConfig {
    /// Station call sign (e.g. `KCTSDT`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_sign: Option<String>,
}

/// API connection configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL override (default: the production service).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Total request timeout in seconds. `0` disables the timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Returns the call sign to use: the CLI override if given, else the config value.
    #[must_use]
    pub fn resolve_call_sign<'a>(&'a self, cli: Option<&'a str>) -> Option<&'a str> {
        cli.or(self.station.call_sign.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Parses the configured base URL, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if `api.base_url` is set but is not a valid URL.
    pub fn base_url(&self) -> Result<Option<Url>> {
        self.api
            .base_url
            .as_deref()
            .map(|raw| Url::parse(raw).with_context(|| format!("invalid api.base_url: {raw}")))
            .transpose()
    }

    /// Returns the configured request timeout; `0` means no timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.api
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
