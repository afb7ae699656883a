use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jury_review::{PreconditionError, ReviewError};
use repo_snapshot::ExtractionError;
use thiserror::Error;

use crate::core::{app_state::ConfigError, http::response_envelope::ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("{0}")]
    BadRequest(String),

    #[error("Failed to analyze repository: {0}")]
    Analysis(#[from] ExtractionError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) | AppError::Bind { .. } | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind { .. } => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Analysis(ExtractionError::Timeout { .. }) => "GIT_TIMEOUT",
            AppError::Analysis(_) => "ANALYSIS_FAILED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::<()>::error(self.error_code(), self.to_string(), Vec::new())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Empty input to per-commit review is a caller mistake, not a server fault.
impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Precondition(PreconditionError::EmptyAggregate) => AppError::BadRequest(
                "commitHistory must contain at least one commit in per-commit review mode".into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn extraction_failure_keeps_original_message_prefix() {
        let err: AppError = ExtractionError::Git {
            command: "clone".into(),
            status: "exit status: 128".into(),
            stderr: "repository not found".into(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            err.to_string()
                .starts_with("Failed to analyze repository: `git clone` failed")
        );
    }

    #[test]
    fn timeouts_get_their_own_code() {
        let err: AppError = ExtractionError::Timeout {
            operation: "clone".into(),
            timeout: Duration::from_secs(300),
        }
        .into();
        assert_eq!(err.error_code(), "GIT_TIMEOUT");
    }

    #[test]
    fn empty_aggregate_is_bad_request() {
        let err: AppError = ReviewError::from(PreconditionError::EmptyAggregate).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
