use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

/// Request fields a serde rejection message may name.
const KNOWN_FIELDS: [&str; 6] = [
    "repoUrl",
    "teamName",
    "problemStatement",
    "teamSummary",
    "commitHistory",
    "changedFiles",
];

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn guess_path_from_serde_msg(msg: &str) -> Option<String> {
    KNOWN_FIELDS
        .into_iter()
        .find(|key| msg.contains(*key))
        .map(str::to_string)
}

fn hint_from_serde_msg(msg: &str) -> Option<String> {
    if msg.contains("expected a sequence") {
        Some("Expected an array here, e.g. \"commitHistory\": [ ... ].".into())
    } else if msg.contains("expected a string") {
        Some("Expected a JSON string for this field.".into())
    } else if msg.contains("expected a map") || msg.contains("expected struct") {
        Some("Expected a JSON object here (e.g. { \"repoUrl\": \"...\" }).".into())
    } else if msg.contains("EOF") || msg.contains("syntax") {
        Some("The request body is not valid JSON.".into())
    } else {
        None
    }
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) -> String {
    if let Some(v) = parts
        .headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        return v.to_string();
    }
    let id = format!("req-{}", Utc::now().timestamp_micros());
    if let Ok(value) = HeaderValue::from_str(&id) {
        parts.headers.insert("X-Request-Id", value);
    }
    id
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Rewrites axum's plain-text body rejections (400/422) into the
/// [`ApiResponse`] envelope. Responses already in JSON pass through.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    if is_json(&parts) {
        return Response::from_parts(parts, bytes.into());
    }

    let original = String::from_utf8_lossy(&bytes);
    let req_id = ensure_request_id(&mut parts);
    debug!(%req_id, %status, rejection = %original.trim(), "json body rejected");

    let detail = ApiErrorDetail {
        path: guess_path_from_serde_msg(&original),
        hint: hint_from_serde_msg(&original),
    };
    let details = if detail.path.is_none() && detail.hint.is_none() {
        Vec::new()
    } else {
        vec![detail]
    };

    let envelope = ApiResponse::<()>::error(
        if status == StatusCode::BAD_REQUEST {
            "BAD_REQUEST"
        } else {
            "UNPROCESSABLE_ENTITY"
        },
        original.trim(),
        details,
    );

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_camel_case_field_names() {
        let msg = "Failed to deserialize the JSON body into the target type: \
                   commitHistory: invalid type: string \"x\", expected a sequence at line 1 column 20";
        assert_eq!(guess_path_from_serde_msg(msg).as_deref(), Some("commitHistory"));
        assert!(hint_from_serde_msg(msg).unwrap().contains("array"));
    }

    #[test]
    fn unknown_messages_have_no_detail() {
        assert_eq!(guess_path_from_serde_msg("something else"), None);
        assert_eq!(hint_from_serde_msg("something else"), None);
    }
}
