//! Jury review pipeline.
//!
//! Turns a team's commit history and a problem statement into a six-category
//! score with explanations:
//!
//! 1) **Prompt**: history rendered as text, with the fixed response schema
//! 2) **Model call**: one chat request (batch) or one per commit
//! 3) **Extraction**: ordered candidate strategies, synthetic default as the
//!    last resort
//! 4) **Aggregation** (per-commit mode): category means, deduplicated
//!    explanations, recomputed total

pub mod aggregate;
pub mod errors;
pub mod extract;
pub mod model;
pub mod prompt;
pub mod review;

pub use aggregate::{AggregatedReview, aggregate};
pub use errors::{ParseError, PreconditionError, ReviewConfigError, ReviewError, ReviewResultOf};
pub use extract::parse_reply;
pub use model::{
    FallbackReason, ReviewCategory, ReviewExplanationSet, ReviewOrigin, ReviewOutcome,
    ReviewResult, ReviewScoreSet,
};
pub use prompt::summarize_team;
pub use review::{ReviewConfig, ReviewMode, Reviewer};
