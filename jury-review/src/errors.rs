//! Error types of the review pipeline.
//!
//! Model and parse failures never escape this crate: they are turned into
//! the synthetic default review. What does escape is a caller bug
//! ([`PreconditionError`]).

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type ReviewResultOf<T> = Result<T, ReviewError>;

/// Root error type for the jury-review crate.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

/// The caller asked for something that cannot be computed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreconditionError {
    /// Averaging over zero reviews.
    #[error("cannot aggregate an empty list of reviews")]
    EmptyAggregate,
}

/// Invalid review settings in the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReviewConfigError {
    #[error("[Jury Review] invalid REVIEW_MODE `{0}` (expected `batch` or `per_commit`)")]
    InvalidMode(String),

    #[error("[Jury Review] invalid REVIEW_CONCURRENCY `{0}` (expected integer >= 1)")]
    InvalidConcurrency(String),
}

/// Why a model reply could not be turned into a review.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON object with `scores` and `explanations` found in reply")]
    NoCandidate,

    #[error("invalid review JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
