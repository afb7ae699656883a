use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::{
    core::{
        app_state::AppState,
        http::response_envelope::{ApiErrorDetail, ApiResponse},
    },
    error_handler::AppError,
    routes::review::review_request::ReviewRequest,
};

const MISSING_FIELDS: &str =
    "Missing required fields: problemStatement, teamSummary, or commitHistory";

/// Scores a commit history against a problem statement.
///
/// Model or parse failures still answer 200 with the neutral default
/// review; only malformed requests fail.
#[instrument(
    name = "review_route",
    skip(state, headers, body),
    fields(commits = body.commit_history.as_ref().map_or(0, Vec::len))
)]
pub async fn review_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ReviewRequest>,
) -> Response {
    if let Some(id) = headers.get("X-Request-Id").and_then(|h| h.to_str().ok()) {
        debug!(%id, "request id attached");
    }

    let problem = body.problem_statement.trim();
    let summary = body.team_summary.trim();
    let commits = match (&body.commit_history, problem.is_empty(), summary.is_empty()) {
        (Some(commits), false, false) => commits,
        _ => {
            let mut details = Vec::new();
            if problem.is_empty() {
                details.push(ApiErrorDetail::field(
                    "problemStatement",
                    "Describe the problem the team was asked to solve.",
                ));
            }
            if summary.is_empty() {
                details.push(ApiErrorDetail::field(
                    "teamSummary",
                    "Provide a short description of the team.",
                ));
            }
            if body.commit_history.is_none() {
                details.push(ApiErrorDetail::field(
                    "commitHistory",
                    "Pass the commit list returned by /git/analyze.",
                ));
            }
            return ApiResponse::<()>::error("BAD_REQUEST", MISSING_FIELDS, details)
                .into_response_with_status(StatusCode::BAD_REQUEST);
        }
    };

    match state.reviewer.review(problem, summary, commits).await {
        Ok(outcome) => {
            ApiResponse::success(outcome.result).into_response_with_status(StatusCode::OK)
        }
        Err(err) => AppError::from(err).into_response(),
    }
}
