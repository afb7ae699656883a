use repo_snapshot::CommitRecord;
use serde::Deserialize;

/// Body of `POST /review`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub team_summary: String,
    /// Oldest first, as returned by `/git/analyze`. May be empty but not absent.
    #[serde(default)]
    pub commit_history: Option<Vec<CommitRecord>>,
}
