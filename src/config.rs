//! Configuration loading
//!
//! Reads `config.toml` from the platform config directory (or an explicit
//! path) and falls back to defaults for anything missing.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ScribeError;

pub mod types;

pub use types::{Config, ServiceConfig, SuggestionsConfig};

/// Location of the default config file: `<config_dir>/scribe/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("scribe").join("config.toml"))
}

/// Load configuration
///
/// An explicit `path` must exist. Without one, the default location is tried
/// and a missing file yields `Config::default()`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ScribeError> {
    match path {
        Some(path) => load_from_path(path),
        None => match default_config_path() {
            Some(path) if path.exists() => load_from_path(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Config::default())
            }
        },
    }
}

fn load_from_path(path: &Path) -> Result<Config, ScribeError> {
    let contents = fs::read_to_string(path).map_err(|e| ScribeError::ConfigRead {
        path: path.to_path_buf(),
        message: match e.kind() {
            ErrorKind::NotFound => "file not found".to_string(),
            _ => e.to_string(),
        },
    })?;

    parse_config(&contents, path)
}

/// Parse config text, attributing errors to `path`
pub fn parse_config(contents: &str, path: &Path) -> Result<Config, ScribeError> {
    toml::from_str(contents).map_err(|e| ScribeError::ConfigParse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
