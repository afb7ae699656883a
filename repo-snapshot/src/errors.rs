use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Failure of a repository extraction. Always fatal for the request: no
/// partial commit list is ever returned alongside it.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {command}` failed ({status}): {stderr}")]
    Git {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("`git {operation}` timed out after {timeout:?}")]
    Timeout {
        operation: String,
        timeout: Duration,
    },

    #[error("malformed git output: {0}")]
    MalformedLog(String),

    #[error("failed to walk working tree: {0}")]
    Walk(#[from] walkdir::Error),
}
