use jury_review::ReviewResult;
use repo_snapshot::{CommitRecord, FileSnapshot};
use serde::Serialize;

/// `data` of a successful `POST /git/analyze`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitAnalyzeResponse {
    /// Oldest first.
    pub commit_history: Vec<CommitRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileSnapshot>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewResult>,
}
