//! Application configuration module.
//!
//! Manages the TOML config file holding the station call sign and
//! API connection settings. The API key is read from the environment only.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::resolve_config_path;
