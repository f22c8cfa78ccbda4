//! Config file location.
//!
//! Lookup order: `--dir`, then `TVSS_CONFIG_DIR`, then
//! `$XDG_CONFIG_HOME/tvss`, then `$HOME/.config/tvss`. Empty variables count
//! as unset, and a relative `XDG_CONFIG_HOME` is ignored.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable naming the config directory.
pub const CONFIG_DIR_ENV: &str = "TVSS_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "tvss";

/// Resolves the config file path from `--dir` and the process environment.
///
/// # Errors
///
/// Returns an error if no directory is given and none of `TVSS_CONFIG_DIR`,
/// `XDG_CONFIG_HOME` or `HOME` is usable.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_with(dir.map(PathBuf::as_path), |key| std::env::var_os(key))
}

/// Resolves the config file path with `lookup` standing in for the environment.
fn resolve_with(dir: Option<&Path>, lookup: impl Fn(&str) -> Option<OsString>) -> Result<PathBuf> {
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(d) = var(CONFIG_DIR_ENV) {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(xdg) = var("XDG_CONFIG_HOME").filter(|p| p.is_absolute()) {
        return Ok(xdg.join(APP_DIR).join(CONFIG_FILE));
    }

    let home = var("HOME")
        .with_context(|| format!("cannot locate config: set {CONFIG_DIR_ENV} or HOME"))?;
    Ok(home.join(".config").join(APP_DIR).join(CONFIG_FILE))
}
