use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use jury_review::summarize_team;
use tracing::{debug, info, instrument};

use crate::{
    core::{
        analysis_dump::dump_best_effort,
        app_state::AppState,
        http::response_envelope::{ApiErrorDetail, ApiResponse},
    },
    error_handler::AppError,
    routes::git_analyze::{
        git_analyze_request::GitAnalyzeRequest, git_analyze_response::GitAnalyzeResponse,
    },
};

/// Clones the team repository, rebuilds its history and, when a problem
/// statement is given, reviews it.
#[instrument(
    name = "git_analyze_route",
    skip(state, headers, r),
    fields(repo = %r.repo_url, team = %r.team_name)
)]
pub async fn git_analyze_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(r): Json<GitAnalyzeRequest>,
) -> Response {
    if let Some(id) = headers.get("X-Request-Id").and_then(|h| h.to_str().ok()) {
        debug!(%id, "request id attached");
    }

    let repo_url = r.repo_url.trim();
    let team_name = r.team_name.trim();
    if repo_url.is_empty() || team_name.is_empty() {
        let mut details = Vec::new();
        if repo_url.is_empty() {
            details.push(ApiErrorDetail::field("repoUrl", "Provide the repository clone URL."));
        }
        if team_name.is_empty() {
            details.push(ApiErrorDetail::field("teamName", "Provide a non-empty team name."));
        }
        return ApiResponse::<()>::error(
            "BAD_REQUEST",
            "Repository URL and team name are required",
            details,
        )
        .into_response_with_status(StatusCode::BAD_REQUEST);
    }

    let analysis = match repo_snapshot::extract(
        &state.snapshot,
        repo_url,
        team_name,
        state.config.include_files,
    )
    .await
    {
        Ok(a) => a,
        Err(err) => return AppError::from(err).into_response(),
    };
    info!(commits = analysis.commits.len(), "repository analyzed");

    let problem = r.problem_statement.as_deref().map(str::trim).unwrap_or("");
    let review = if problem.is_empty() {
        None
    } else {
        let summary = summarize_team(team_name, repo_url, &analysis);
        match state.reviewer.review(problem, &summary, &analysis.commits).await {
            Ok(outcome) => Some(outcome.result),
            Err(err) => return AppError::from(err).into_response(),
        }
    };

    let data = GitAnalyzeResponse {
        commit_history: analysis.commits,
        files: analysis.files,
        review,
    };
    dump_best_effort(state.config.dump_dir.as_deref(), &data).await;

    ApiResponse::success(data).into_response_with_status(StatusCode::OK)
}
