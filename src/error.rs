use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Custom error types for scribe
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Failed to read config {path}: {message}")]
    ConfigRead { path: PathBuf, message: String },

    #[error("Invalid config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Suggestion store rejected update: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
