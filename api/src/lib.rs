//! HTTP surface of the jury backend.
//!
//! - `POST /git/analyze`: clone + history (+ optional review)
//! - `POST /review`: score a supplied history

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::post,
};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    middleware_layer::json_extractor::json_error_mapper,
    routes::{git_analyze::git_analyze_route::git_analyze_route, review::review_route::review_route},
};

/// Builds the application router with CORS and body-rejection mapping.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origin);
    Router::new()
        .route("/git/analyze", post(git_analyze_route))
        .route("/review", post(review_route))
        .layer(middleware::from_fn(json_error_mapper))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);
    match HeaderValue::from_str(origin) {
        Ok(v) => layer.allow_origin(v),
        Err(_) => {
            warn!(%origin, "invalid CORS_ORIGIN; cross-origin requests will be refused");
            layer
        }
    }
}

/// Binds `state.config.address` and serves until Ctrl+C.
pub async fn start(state: AppState) -> AppResult<()> {
    let address = state.config.address.clone();
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| AppError::Bind {
            address: address.clone(),
            source,
        })?;
    info!(%address, "ai jury backend listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
