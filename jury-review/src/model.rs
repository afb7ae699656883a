//! Review score schema.
//!
//! One fixed six-category schema is used by the prompt, the parser and the
//! aggregator: relevance, performance, security, cost, vulnerability and
//! AI usage. Each category is scored out of 10; the total is projected onto
//! 0..=100 by multiplying the category sum by [`TOTAL_MULTIPLIER`].

use serde::{Deserialize, Serialize};

/// Multiplier projecting the six-category sum (max 60) onto 0..=100.
pub const TOTAL_MULTIPLIER: f64 = 1.67;

/// Upper bound of a single category score.
pub const MAX_CATEGORY_SCORE: f64 = 10.0;

/// Upper bound of the projected total.
pub const MAX_TOTAL: f64 = 100.0;

/// Score given to every category when no real review could be produced.
pub const FALLBACK_SCORE: f64 = 5.0;

/// Total of the fallback review.
pub const FALLBACK_TOTAL: f64 = 50.0;

/// Explanation attached to every category of the fallback review.
pub const FALLBACK_EXPLANATION: &str = "Could not evaluate due to an error processing the review.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewCategory {
    Relevance,
    Performance,
    Security,
    Cost,
    Vulnerability,
    AiUsage,
}

impl ReviewCategory {
    pub const ALL: [ReviewCategory; 6] = [
        ReviewCategory::Relevance,
        ReviewCategory::Performance,
        ReviewCategory::Security,
        ReviewCategory::Cost,
        ReviewCategory::Vulnerability,
        ReviewCategory::AiUsage,
    ];

    /// JSON key.
    pub fn key(self) -> &'static str {
        match self {
            ReviewCategory::Relevance => "relevance",
            ReviewCategory::Performance => "performance",
            ReviewCategory::Security => "security",
            ReviewCategory::Cost => "cost",
            ReviewCategory::Vulnerability => "vulnerability",
            ReviewCategory::AiUsage => "aiUsage",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ReviewCategory::Relevance => 0,
            ReviewCategory::Performance => 1,
            ReviewCategory::Security => 2,
            ReviewCategory::Cost => 3,
            ReviewCategory::Vulnerability => 4,
            ReviewCategory::AiUsage => 5,
        }
    }
}

/// Per-category scores plus the projected total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewScoreSet {
    pub relevance: f64,
    pub performance: f64,
    pub security: f64,
    pub cost: f64,
    pub vulnerability: f64,
    pub ai_usage: f64,
    pub total: f64,
}

impl ReviewScoreSet {
    /// Builds a score set from per-category values, computing the total.
    pub fn from_categories(values: [f64; 6]) -> Self {
        let [relevance, performance, security, cost, vulnerability, ai_usage] = values;
        let mut s = Self {
            relevance,
            performance,
            security,
            cost,
            vulnerability,
            ai_usage,
            total: 0.0,
        };
        s.total = projected_total(s.category_sum());
        s
    }

    pub fn get(&self, category: ReviewCategory) -> f64 {
        match category {
            ReviewCategory::Relevance => self.relevance,
            ReviewCategory::Performance => self.performance,
            ReviewCategory::Security => self.security,
            ReviewCategory::Cost => self.cost,
            ReviewCategory::Vulnerability => self.vulnerability,
            ReviewCategory::AiUsage => self.ai_usage,
        }
    }

    fn get_mut(&mut self, category: ReviewCategory) -> &mut f64 {
        match category {
            ReviewCategory::Relevance => &mut self.relevance,
            ReviewCategory::Performance => &mut self.performance,
            ReviewCategory::Security => &mut self.security,
            ReviewCategory::Cost => &mut self.cost,
            ReviewCategory::Vulnerability => &mut self.vulnerability,
            ReviewCategory::AiUsage => &mut self.ai_usage,
        }
    }

    /// Sum of the six category scores (total excluded).
    pub fn category_sum(&self) -> f64 {
        ReviewCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Forces every value into its documented range.
    pub fn clamp_to_range(&mut self) {
        for c in ReviewCategory::ALL {
            let v = self.get_mut(c);
            *v = v.clamp(0.0, MAX_CATEGORY_SCORE);
        }
        self.total = self.total.clamp(0.0, MAX_TOTAL);
    }
}

/// `round(sum × 1.67)`, clamped to `0..=100`.
pub fn projected_total(category_sum: f64) -> f64 {
    (category_sum * TOTAL_MULTIPLIER).round().clamp(0.0, MAX_TOTAL)
}

/// Per-category justification text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewExplanationSet {
    pub relevance: String,
    pub performance: String,
    pub security: String,
    pub cost: String,
    pub vulnerability: String,
    pub ai_usage: String,
}

impl ReviewExplanationSet {
    pub fn get(&self, category: ReviewCategory) -> &str {
        match category {
            ReviewCategory::Relevance => &self.relevance,
            ReviewCategory::Performance => &self.performance,
            ReviewCategory::Security => &self.security,
            ReviewCategory::Cost => &self.cost,
            ReviewCategory::Vulnerability => &self.vulnerability,
            ReviewCategory::AiUsage => &self.ai_usage,
        }
    }

    /// Builds an explanation set from per-category texts, in
    /// [`ReviewCategory::ALL`] order.
    pub fn from_categories(values: [String; 6]) -> Self {
        let [relevance, performance, security, cost, vulnerability, ai_usage] = values;
        Self {
            relevance,
            performance,
            security,
            cost,
            vulnerability,
            ai_usage,
        }
    }
}

/// What the model is asked to return and what the API responds with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub scores: ReviewScoreSet,
    pub explanations: ReviewExplanationSet,
}

impl ReviewResult {
    /// Neutral stand-in used when the model is unavailable or unparsable.
    pub fn fallback() -> Self {
        Self {
            scores: ReviewScoreSet {
                relevance: FALLBACK_SCORE,
                performance: FALLBACK_SCORE,
                security: FALLBACK_SCORE,
                cost: FALLBACK_SCORE,
                vulnerability: FALLBACK_SCORE,
                ai_usage: FALLBACK_SCORE,
                total: FALLBACK_TOTAL,
            },
            explanations: ReviewExplanationSet::from_categories(
                std::array::from_fn(|_| FALLBACK_EXPLANATION.to_string()),
            ),
        }
    }
}

/// Why the fallback review was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The chat endpoint failed (transport, status, timeout, bad body).
    ModelUnavailable(String),
    /// The reply had no usable review JSON.
    Unparsable(String),
}

/// Provenance of a [`ReviewResult`]. Never serialized; used for logging and
/// by callers that must tell a genuine mediocre score from the stand-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOrigin {
    /// Parsed from a model reply.
    Model,
    /// Synthetic default.
    Fallback(FallbackReason),
    /// Averaged from per-commit reviews, `fallbacks` of which were synthetic.
    Aggregated { reviewed: usize, fallbacks: usize },
}

/// A review and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub result: ReviewResult,
    pub origin: ReviewOrigin,
}

impl ReviewOutcome {
    pub fn model(result: ReviewResult) -> Self {
        Self {
            result,
            origin: ReviewOrigin::Model,
        }
    }

    pub fn fallback(reason: FallbackReason) -> Self {
        Self {
            result: ReviewResult::fallback(),
            origin: ReviewOrigin::Fallback(reason),
        }
    }

    /// `true` when no part of the result comes from a real model reply.
    pub fn is_synthetic(&self) -> bool {
        match &self.origin {
            ReviewOrigin::Model => false,
            ReviewOrigin::Fallback(_) => true,
            ReviewOrigin::Aggregated { reviewed, fallbacks } => reviewed == fallbacks,
        }
    }
}
