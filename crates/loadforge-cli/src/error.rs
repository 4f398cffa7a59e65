//! Errors surfaced by the command line front-end.

use std::path::PathBuf;

use thiserror::Error;

use loadforge::{ConfigError, ExtractError, SolveStatus, ValidationError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported file format: {} (expected .json, .yaml, .yml, .toml, or .csv for items)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no loading plan (status {status}){}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unsolved {
        status: SolveStatus,
        message: Option<String>,
    },

    #[error("inconsistent solution: {0}")]
    Extract(#[from] ExtractError),

    #[error("cannot render JSON: {0}")]
    Json(#[from] serde_json::Error),
}
