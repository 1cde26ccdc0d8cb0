//! Error type shared by the demo subcommand and the CLI runner.
//!
//! The banner path never produces one of these: it always ends in the
//! restricted exit code no matter what happens to stdout.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GhostError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, GhostError>;
