use serde::Deserialize;

/// Body of `POST /git/analyze`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitAnalyzeRequest {
    #[serde(default)]
    pub repo_url: String,
    /// Display name of the team; also names the scratch workspace.
    #[serde(default)]
    pub team_name: String,
    /// When non-empty, the extracted history is reviewed against it.
    #[serde(default)]
    pub problem_statement: Option<String>,
}
