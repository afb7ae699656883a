//! Review orchestrator: prompt, model call, extraction, aggregation.
//!
//! Two modes:
//! - **batch**: the whole history goes into one prompt, one model call
//! - **per_commit**: one prompt per commit, calls run with bounded
//!   concurrency, results are averaged in commit order
//!
//! Model and parse failures degrade to the synthetic default review and are
//! logged with `synthetic = true`; they never fail the request.

use std::{str::FromStr, sync::Arc, time::Instant};

use ai_llm_service::OllamaService;
use futures::{StreamExt, stream};
use repo_snapshot::CommitRecord;
use tracing::{debug, info, instrument, warn};

use crate::{
    aggregate::AggregatedReview,
    errors::{PreconditionError, ReviewConfigError, ReviewResultOf},
    extract::parse_reply,
    model::{FallbackReason, ReviewOrigin, ReviewOutcome},
    prompt::{build_batch_prompt, build_commit_prompt},
};

/// Default number of in-flight model calls in per-commit mode.
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewMode {
    #[default]
    Batch,
    PerCommit,
}

impl FromStr for ReviewMode {
    type Err = ReviewConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "batch" => Ok(ReviewMode::Batch),
            "per_commit" | "per-commit" | "percommit" => Ok(ReviewMode::PerCommit),
            other => Err(ReviewConfigError::InvalidMode(other.to_string())),
        }
    }
}

/// Review settings.
///
/// - `REVIEW_MODE`        = `batch` (default) or `per_commit`
/// - `REVIEW_CONCURRENCY` = in-flight calls in per-commit mode (default 4)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewConfig {
    pub mode: ReviewMode,
    pub concurrency: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            mode: ReviewMode::Batch,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl ReviewConfig {
    /// Reads `REVIEW_MODE` and `REVIEW_CONCURRENCY` through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReviewConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("REVIEW_MODE") {
            Some(v) => v.parse()?,
            None => ReviewMode::default(),
        };
        let concurrency = match lookup("REVIEW_CONCURRENCY").filter(|v| !v.trim().is_empty()) {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or(ReviewConfigError::InvalidConcurrency(v))?,
            None => DEFAULT_CONCURRENCY,
        };
        Ok(Self { mode, concurrency })
    }
}

/// Produces a review for a team's commit history.
#[derive(Debug, Clone)]
pub struct Reviewer {
    llm: Arc<OllamaService>,
    cfg: ReviewConfig,
}

impl Reviewer {
    pub fn new(llm: Arc<OllamaService>, cfg: ReviewConfig) -> Self {
        Self { llm, cfg }
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.cfg
    }

    /// Reviews `commits` against `problem_statement` in the configured mode.
    ///
    /// # Errors
    /// [`PreconditionError::EmptyAggregate`] in per-commit mode when
    /// `commits` is empty. Batch mode accepts an empty history and lets the
    /// model judge it.
    #[instrument(skip_all, fields(mode = ?self.cfg.mode, commits = commits.len()))]
    pub async fn review(
        &self,
        problem_statement: &str,
        team_summary: &str,
        commits: &[CommitRecord],
    ) -> ReviewResultOf<ReviewOutcome> {
        let started = Instant::now();
        let outcome = match self.cfg.mode {
            ReviewMode::Batch => self.review_batch(problem_statement, team_summary, commits).await,
            ReviewMode::PerCommit => {
                self.review_per_commit(problem_statement, team_summary, commits)
                    .await?
            }
        };
        info!(
            total = outcome.result.scores.total,
            synthetic = outcome.is_synthetic(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "review finished"
        );
        Ok(outcome)
    }

    async fn review_batch(
        &self,
        problem_statement: &str,
        team_summary: &str,
        commits: &[CommitRecord],
    ) -> ReviewOutcome {
        let prompt = build_batch_prompt(problem_statement, team_summary, commits);
        self.ask(&prompt).await
    }

    async fn review_per_commit(
        &self,
        problem_statement: &str,
        team_summary: &str,
        commits: &[CommitRecord],
    ) -> Result<ReviewOutcome, PreconditionError> {
        if commits.is_empty() {
            return Err(PreconditionError::EmptyAggregate);
        }
        let total = commits.len();

        let prompts: Vec<(usize, String, String)> = commits
            .iter()
            .enumerate()
            .map(|(i, commit)| {
                let position = i + 1;
                let prompt =
                    build_commit_prompt(problem_statement, team_summary, commit, position, total);
                (position, commit.hash.clone(), prompt)
            })
            .collect();

        let outcomes: Vec<ReviewOutcome> = stream::iter(prompts)
            .map(|(position, hash, prompt)| async move {
                debug!(commit = %hash, position, "reviewing commit");
                self.ask(&prompt).await
            })
            .buffered(self.cfg.concurrency.max(1))
            .collect()
            .await;

        let mut agg = AggregatedReview::new();
        let mut fallbacks = 0;
        for o in &outcomes {
            if o.is_synthetic() {
                fallbacks += 1;
            }
            agg.push(&o.result);
        }
        let result = agg.finish()?;

        Ok(ReviewOutcome {
            result,
            origin: ReviewOrigin::Aggregated {
                reviewed: total,
                fallbacks,
            },
        })
    }

    /// One model call; never fails.
    async fn ask(&self, prompt: &str) -> ReviewOutcome {
        match self.llm.chat(prompt).await {
            Ok(reply) => parse_reply(&reply),
            Err(e) => {
                warn!(synthetic = true, model = self.llm.model(), error = %e, "model unavailable; using default review");
                ReviewOutcome::fallback(FallbackReason::ModelUnavailable(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_to_batch() {
        let cfg = ReviewConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, ReviewConfig::default());
    }

    #[test]
    fn parses_per_commit_and_concurrency() {
        let cfg = ReviewConfig::from_lookup(lookup(&[
            ("REVIEW_MODE", "PER_COMMIT"),
            ("REVIEW_CONCURRENCY", "2"),
        ]))
        .unwrap();
        assert_eq!(cfg.mode, ReviewMode::PerCommit);
        assert_eq!(cfg.concurrency, 2);
    }

    #[test]
    fn rejects_unknown_mode_and_zero_concurrency() {
        assert_eq!(
            ReviewConfig::from_lookup(lookup(&[("REVIEW_MODE", "weekly")])),
            Err(ReviewConfigError::InvalidMode("weekly".into()))
        );
        assert_eq!(
            ReviewConfig::from_lookup(lookup(&[("REVIEW_CONCURRENCY", "0")])),
            Err(ReviewConfigError::InvalidConcurrency("0".into()))
        );
    }
}
