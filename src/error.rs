//! Error types for the inventory run

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Everything that can stop a lookup or the whole run.
///
/// Only [`InventoryError::Manifest`] for the project's own `package.json`
/// ends a run; the others are logged per dependency and blank its fields.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// A `package.json` that is missing, unreadable or not valid JSON
    #[error("Cannot read manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    /// A normalized link that did not yield both an owner and a repository
    #[error("Not a GitHub repository: '{0}' (expected owner/repo)")]
    InvalidRepository(String),

    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("GitHub rate limit exceeded (resets in {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Not found on GitHub: {0}")]
    NotFound(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("No answer from the operator: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InventoryError {
    /// A manifest at `path` could not be used
    pub fn manifest(path: &Path, reason: impl ToString) -> Self {
        Self::Manifest {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    /// Whether GitHub simply has nothing at the requested location
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
