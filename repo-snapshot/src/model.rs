//! Data produced by an extraction. Serialized with the camelCase field
//! names the dashboard consumes.

use serde::{Deserialize, Serialize};

/// One commit of the analyzed repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    /// Full 40-hex object id.
    pub hash: String,
    pub author: String,
    pub email: String,
    /// Author time as ISO-8601 UTC with millisecond precision.
    pub timestamp: String,
    /// Subject line.
    pub message: String,
    /// Repository-relative paths touched by the commit, without duplicates.
    #[serde(default)]
    pub changed_files: Vec<String>,
    /// Unified diff; empty for merges without content change.
    #[serde(default)]
    pub diff: String,
}

/// A file of the working tree at the final commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSnapshot {
    pub filename: String,
    /// Lower-cased suffix without the dot; empty when the name has none.
    pub extension: String,
    /// Repository-relative, `/`-separated.
    pub path: String,
    pub content: String,
    /// Size in bytes.
    pub size: u64,
}

/// Full outcome of [`extract`](crate::extract).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Oldest commit first.
    pub commits: Vec<CommitRecord>,
    /// Present only when the full-tree variant was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileSnapshot>>,
}

impl AnalysisResult {
    /// Number of distinct author emails in the history.
    pub fn distinct_authors(&self) -> usize {
        let mut emails: Vec<&str> = self.commits.iter().map(|c| c.email.as_str()).collect();
        emails.sort_unstable();
        emails.dedup();
        emails.len()
    }
}
