//! Combines per-commit reviews into one team review.
//!
//! - score per category = arithmetic mean over all inputs (unweighted)
//! - explanations per category: input order, exact duplicates dropped
//!   (first occurrence kept), joined by a single space
//! - total = projection of the averaged categories, never an average of
//!   the per-commit totals

use std::collections::HashSet;

use crate::errors::PreconditionError;
use crate::model::{ReviewCategory, ReviewExplanationSet, ReviewResult, ReviewScoreSet};

/// Running sums and collected explanations for one team review.
#[derive(Debug, Default)]
pub struct AggregatedReview {
    sums: [f64; 6],
    explanations: [Vec<String>; 6],
    count: usize,
}

impl AggregatedReview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reviews folded in so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn push(&mut self, review: &ReviewResult) {
        for c in ReviewCategory::ALL {
            let i = c.index();
            self.sums[i] += review.scores.get(c);
            self.explanations[i].push(review.explanations.get(c).to_string());
        }
        self.count += 1;
    }

    /// Produces the averaged review.
    ///
    /// # Errors
    /// [`PreconditionError::EmptyAggregate`] if nothing was pushed.
    pub fn finish(self) -> Result<ReviewResult, PreconditionError> {
        if self.count == 0 {
            return Err(PreconditionError::EmptyAggregate);
        }
        let n = self.count as f64;
        let scores = ReviewScoreSet::from_categories(self.sums.map(|sum| sum / n));
        let explanations = ReviewExplanationSet::from_categories(self.explanations.map(join_unique));
        Ok(ReviewResult {
            scores,
            explanations,
        })
    }
}

/// Averages `results`; see the module docs for the rules.
pub fn aggregate(results: &[ReviewResult]) -> Result<ReviewResult, PreconditionError> {
    let mut agg = AggregatedReview::new();
    for r in results {
        agg.push(r);
    }
    agg.finish()
}

/// Joins with a space, dropping repeats but keeping first-seen order.
fn join_unique(items: Vec<String>) -> String {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(String::as_str)
        .filter(|s| seen.insert(*s))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FALLBACK_EXPLANATION;

    fn review(scores: [f64; 6], text: &str) -> ReviewResult {
        ReviewResult {
            scores: ReviewScoreSet::from_categories(scores),
            explanations: ReviewExplanationSet::from_categories(std::array::from_fn(|i| {
                format!("{text} #{i}")
            })),
        }
    }

    #[test]
    fn empty_input_is_a_precondition_error() {
        assert_eq!(aggregate(&[]), Err(PreconditionError::EmptyAggregate));
        assert!(AggregatedReview::new().is_empty());
    }

    #[test]
    fn single_input_is_unchanged() {
        let r = review([7.0, 6.0, 8.0, 5.0, 6.0, 4.0], "solid");
        assert_eq!(aggregate(std::slice::from_ref(&r)).unwrap(), r);
    }

    #[test]
    fn averages_each_category() {
        let a = review([4.0, 2.0, 10.0, 0.0, 5.0, 1.0], "a");
        let b = review([8.0, 3.0, 6.0, 10.0, 5.0, 2.0], "b");
        let out = aggregate(&[a, b]).unwrap();
        assert_eq!(out.scores.relevance, 6.0);
        assert_eq!(out.scores.performance, 2.5);
        assert_eq!(out.scores.security, 8.0);
        assert_eq!(out.scores.cost, 5.0);
        assert_eq!(out.scores.vulnerability, 5.0);
        assert_eq!(out.scores.ai_usage, 1.5);
    }

    #[test]
    fn total_is_recomputed_not_averaged() {
        // Per-commit totals deliberately inconsistent with their categories.
        let mut a = review([6.0, 6.0, 6.0, 6.0, 8.0, 8.0], "a");
        let mut b = review([7.0, 7.0, 7.0, 7.0, 6.0, 6.0], "b");
        a.scores.total = 10.0;
        b.scores.total = 20.0;
        let out = aggregate(&[a, b]).unwrap();
        assert_eq!(out.scores.category_sum(), 40.0);
        assert_eq!(out.scores.total, 67.0);
    }

    #[test]
    fn explanations_dedup_keeping_first_and_join_with_space() {
        let mut a = review([5.0; 6], "x");
        let mut b = review([5.0; 6], "x");
        let mut c = review([5.0; 6], "x");
        a.explanations.security = "Uses env vars.".into();
        b.explanations.security = "Hardcoded token.".into();
        c.explanations.security = "Uses env vars.".into();
        let out = aggregate(&[a, b, c]).unwrap();
        assert_eq!(out.explanations.security, "Uses env vars. Hardcoded token.");
        assert_eq!(out.explanations.relevance, "x #0");
    }

    #[test]
    fn fallback_inputs_count_as_fives() {
        let genuine = review([9.0; 6], "good");
        let out = aggregate(&[genuine, ReviewResult::fallback()]).unwrap();
        assert_eq!(out.scores.cost, 7.0);
        assert_eq!(out.explanations.cost, format!("good #3 {FALLBACK_EXPLANATION}"));
    }

    #[test]
    fn join_unique_handles_many_repeats_in_order() {
        let items: Vec<String> = (0..2_000)
            .map(|i| ["b", "a", "c"][i % 3].to_string())
            .collect();
        assert_eq!(join_unique(items), "b a c");
        assert_eq!(join_unique(Vec::new()), "");
    }
}
