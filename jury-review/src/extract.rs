//! Pulls the review JSON out of a free-form model reply.
//!
//! Candidate strategies run in order; the first candidate that decodes
//! wins:
//! 1. a fenced code block tagged `json`
//! 2. the span from the first `{` to the last `}`, if it mentions both
//!    `"scores"` and `"explanations"`
//!
//! When nothing decodes, the synthetic default review is returned. This
//! module never fails outward.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::errors::ParseError;
use crate::model::{FallbackReason, ReviewOutcome, ReviewResult};

lazy_static! {
    static ref FENCED_JSON: Regex =
        Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("valid fenced-json regex");
    static ref BARE_OBJECT: Regex =
        Regex::new(r"(?s)\{.*\}").expect("valid bare-object regex");
}

/// A way of locating a JSON candidate inside a reply.
pub type Strategy = fn(&str) -> Option<&str>;

/// Strategies in the order they are tried.
pub const STRATEGIES: [(&str, Strategy); 2] = [("fenced", fenced_json), ("bare_object", bare_object)];

/// Body of the first ```` ```json ```` fenced block.
pub fn fenced_json(raw: &str) -> Option<&str> {
    FENCED_JSON
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Greedy span from the first `{` to the last `}`, kept only if it
/// mentions both `"scores"` and `"explanations"` (in any order).
pub fn bare_object(raw: &str) -> Option<&str> {
    BARE_OBJECT
        .find(raw)
        .map(|m| m.as_str())
        .filter(|span| span.contains(r#""scores""#) && span.contains(r#""explanations""#))
}

/// Strictly decodes one candidate and normalizes its ranges.
pub fn decode_candidate(candidate: &str) -> Result<ReviewResult, ParseError> {
    let mut review: ReviewResult = serde_json::from_str(candidate)?;
    review.scores.clamp_to_range();
    Ok(review)
}

/// Tries every strategy; reports the last decode error if all fail.
pub fn try_parse(raw: &str) -> Result<ReviewResult, ParseError> {
    let mut last_err = ParseError::NoCandidate;
    for (name, strategy) in STRATEGIES {
        let Some(candidate) = strategy(raw) else {
            continue;
        };
        match decode_candidate(candidate) {
            Ok(review) => {
                debug!(strategy = name, "review JSON extracted");
                return Ok(review);
            }
            Err(e) => {
                debug!(strategy = name, error = %e, "candidate rejected");
                last_err = e;
            }
        }
    }
    Err(last_err)
}

/// Total parse: a genuine review, or the tagged default.
pub fn parse_reply(raw: &str) -> ReviewOutcome {
    match try_parse(raw) {
        Ok(review) => ReviewOutcome::model(review),
        Err(e) => {
            warn!(synthetic = true, error = %e, "unparsable model reply; using default review");
            ReviewOutcome::fallback(FallbackReason::Unparsable(e.to_string()))
        }
    }
}
