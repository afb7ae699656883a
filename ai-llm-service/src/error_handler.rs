//! Unified error handling for `ai-llm-service`.
//!
//! [`AiLlmError`] is the single top-level error. Startup problems live in
//! [`ConfigError`]; everything that can go wrong while talking to the model
//! endpoint lives in [`ModelUnavailableError`]. Callers that must never fail
//! outward (the review pipeline) match on the latter and substitute a
//! default review.
//!
//! All messages include the prefix `[AI LLM Service]` to simplify attribution in logs.

use std::{str::FromStr, time::Duration};

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The model endpoint could not produce a reply.
    #[error(transparent)]
    Unavailable(#[from] ModelUnavailableError),
}

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `LLM_TIMEOUT_SECS`, `OLLAMA_PORT`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_KIND`.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `OLLAMA_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// A numeric field was outside of the allowed range.
    #[error("[AI LLM Service] {field} is out of range: {detail}")]
    OutOfRange {
        /// Field name (e.g., `temperature`).
        field: &'static str,
        /// Description of the expected range.
        detail: &'static str,
    },

    /// Model name was empty.
    #[error("[AI LLM Service] model name must not be empty")]
    EmptyModel,

    /// The HTTP client could not be built from the config.
    #[error("[AI LLM Service] failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Everything that prevents a reply from being read off the chat endpoint.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ModelUnavailableError {
    /// Connection refused, DNS failure, reset, etc.
    #[error("[AI LLM Service] transport error calling {url}: {source}")]
    Transport {
        /// Request URL.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The request did not finish within the configured timeout.
    #[error("[AI LLM Service] request to {url} timed out after {timeout:?}")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured client timeout.
        timeout: Duration,
    },

    /// Upstream returned a non-successful HTTP status.
    #[error("[AI LLM Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload did not have the `{ message: { content } }` shape.
    #[error("[AI LLM Service] failed to decode chat response: {0}")]
    Decode(String),
}

/// Reads a non-empty value through `lookup`.
pub(crate) fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

/// Parses an optional number (`Ok(None)` if unset/empty).
///
/// # Errors
/// [`ConfigError::InvalidNumber`] with `expected` as the reason if the
/// variable is set but does not parse as `T`.
pub(crate) fn opt_number<T, F>(lookup: &F, name: &'static str, expected: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, name)
        .map(|v| v.trim().parse::<T>())
        .transpose()
        .map_err(|_| {
            ConfigError::InvalidNumber {
                var: name,
                reason: expected,
            }
            .into()
        })
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start
/// with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/// Validates that a floating-point value lies within an inclusive range.
///
/// # Errors
/// Returns [`ConfigError::OutOfRange`] if `value` is outside `[min, max]`
/// or not finite.
pub fn validate_range_f32(field: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            detail: "expected value in inclusive range",
        }
        .into())
    }
}
