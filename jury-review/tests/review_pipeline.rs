//! Runs `Reviewer` end to end against an in-process chat endpoint.

use std::sync::Arc;

use ai_llm_service::{LlmModelConfig, LlmProvider, OllamaService};
use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use jury_review::{
    FallbackReason, PreconditionError, ReviewConfig, ReviewError, ReviewMode, ReviewOrigin,
    Reviewer,
};
use repo_snapshot::CommitRecord;
use serde_json::{Value, json};

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn reviewer(endpoint: String, mode: ReviewMode) -> Reviewer {
    let llm = OllamaService::new(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: "jury-test".into(),
        endpoint,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(5),
    })
    .unwrap();
    Reviewer::new(
        Arc::new(llm),
        ReviewConfig {
            mode,
            concurrency: 2,
        },
    )
}

fn commit(hash: &str, message: &str) -> CommitRecord {
    CommitRecord {
        hash: hash.repeat(40),
        author: "Ada".into(),
        email: "ada@example.com".into(),
        timestamp: "2023-11-14T22:13:20.000Z".into(),
        message: message.into(),
        changed_files: vec!["src/main.rs".into()],
        diff: "+fn main() {}".into(),
    }
}

fn review_json(score: f64, note: &str) -> Value {
    json!({
        "scores": {
            "relevance": score, "performance": score, "security": score,
            "cost": score, "vulnerability": score, "aiUsage": score,
            "total": 0
        },
        "explanations": {
            "relevance": note, "performance": note, "security": note,
            "cost": note, "vulnerability": note, "aiUsage": note
        }
    })
}

fn chat_reply(content: String) -> Json<Value> {
    Json(json!({
        "model": "jury-test",
        "message": { "role": "assistant", "content": content },
        "done": true
    }))
}

#[tokio::test]
async fn batch_mode_parses_fenced_reply() {
    let router = Router::new().route(
        "/api/chat",
        post(|Json(body): Json<Value>| async move {
            let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
            assert!(prompt.contains("Build a todo app"));
            assert!(prompt.contains("Add task list"));
            let json = review_json(7.0, "Reasonable.");
            chat_reply(format!("Here you go:\n```json\n{json}\n```"))
        }),
    );
    let base = spawn(router).await;

    let out = reviewer(base, ReviewMode::Batch)
        .review(
            "Build a todo app",
            "Team Ada",
            &[commit("a", "Initial commit"), commit("b", "Add task list")],
        )
        .await
        .unwrap();

    assert_eq!(out.origin, ReviewOrigin::Model);
    assert_eq!(out.result.scores.relevance, 7.0);
    assert_eq!(out.result.explanations.ai_usage, "Reasonable.");
    assert!((0.0..=100.0).contains(&out.result.scores.total));
}

#[tokio::test]
async fn per_commit_mode_averages_in_commit_order() {
    let router = Router::new().route(
        "/api/chat",
        post(|Json(body): Json<Value>| async move {
            let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
            let json = if prompt.contains("commit 1 of 2") {
                review_json(4.0, "First.")
            } else {
                review_json(8.0, "Second.")
            };
            chat_reply(json.to_string())
        }),
    );
    let base = spawn(router).await;

    let out = reviewer(base, ReviewMode::PerCommit)
        .review(
            "Build a todo app",
            "Team Ada",
            &[commit("a", "Initial commit"), commit("b", "Add task list")],
        )
        .await
        .unwrap();

    assert_eq!(
        out.origin,
        ReviewOrigin::Aggregated {
            reviewed: 2,
            fallbacks: 0
        }
    );
    assert_eq!(out.result.scores.security, 6.0);
    // 6 × 6.0 = 36 → round(36 × 1.67) = 60
    assert_eq!(out.result.scores.total, 60.0);
    assert_eq!(out.result.explanations.cost, "First. Second.");
}

#[tokio::test]
async fn per_commit_mode_counts_failed_commits_as_fives() {
    let router = Router::new().route(
        "/api/chat",
        post(|Json(body): Json<Value>| async move {
            let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
            if prompt.contains("commit 1 of 2") {
                (StatusCode::INTERNAL_SERVER_ERROR, "model crashed").into_response()
            } else {
                chat_reply(review_json(9.0, "Good.").to_string()).into_response()
            }
        }),
    );
    let base = spawn(router).await;

    let out = reviewer(base, ReviewMode::PerCommit)
        .review(
            "Build a todo app",
            "Team Ada",
            &[commit("a", "Initial commit"), commit("b", "Add task list")],
        )
        .await
        .unwrap();

    assert_eq!(
        out.origin,
        ReviewOrigin::Aggregated {
            reviewed: 2,
            fallbacks: 1
        }
    );
    assert!(!out.is_synthetic());
    assert_eq!(out.result.scores.security, 7.0);
    // 6 × 7.0 = 42 → round(42 × 1.67) = 70
    assert_eq!(out.result.scores.total, 70.0);
    assert_eq!(
        out.result.explanations.relevance,
        "Could not evaluate due to an error processing the review. Good."
    );
}

#[tokio::test]
async fn per_commit_mode_rejects_empty_history() {
    let err = reviewer("http://127.0.0.1:9".into(), ReviewMode::PerCommit)
        .review("Build a todo app", "", &[])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReviewError::Precondition(PreconditionError::EmptyAggregate)
    ));
}

#[tokio::test]
async fn failing_model_yields_tagged_default() {
    let router = Router::new().route(
        "/api/chat",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn(router).await;

    let out = reviewer(base, ReviewMode::Batch)
        .review("Build a todo app", "", &[commit("a", "Initial commit")])
        .await
        .unwrap();

    assert!(out.is_synthetic());
    assert!(matches!(
        out.origin,
        ReviewOrigin::Fallback(FallbackReason::ModelUnavailable(_))
    ));
    assert_eq!(out.result.scores.total, 50.0);
}

#[tokio::test]
async fn prose_reply_yields_unparsable_default() {
    let router = Router::new().route(
        "/api/chat",
        post(|| async { chat_reply("I would rate this team highly.".into()) }),
    );
    let base = spawn(router).await;

    let out = reviewer(base, ReviewMode::PerCommit)
        .review("Build a todo app", "", &[commit("a", "Initial commit")])
        .await
        .unwrap();

    assert!(out.is_synthetic());
    assert_eq!(out.result.scores.cost, 5.0);
}
