//! Precis HTTP API
//!
//! Each endpoint has a thin axum handler that delegates to a pure inner
//! function returning `(StatusCode, serde_json::Value)`, so the inner
//! functions can be tested without axum dispatch.
//!
//! Endpoints:
//! - GET  /                — browser form
//! - POST /api/summarize   — summarize `{ text }`
//! - GET  /api/summaries   — recently persisted summaries
//! - GET  /health          — persistence and credential status
//! - GET  /test            — liveness probe

use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use precis_core::config::ServerConfig;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;

use crate::service::{SummarizationService, SummarizeError};
use crate::ui;

pub const DEFAULT_HISTORY_LIMIT: i64 = 20;
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Largest request body accepted by `POST /api/summarize`.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub service: SummarizationService,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/", get(ui::index_handler))
        .route("/api/summarize", post(summarize_handler))
        .route("/api/summaries", get(history_handler))
        .route("/health", get(health_handler))
        .route("/test", get(test_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    service: SummarizationService,
    config: &ServerConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(HttpState { service });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server is running on http://{}", addr);
    tracing::info!("Health check available at: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct SummarizeRequest {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

// ============================================================================
// Inner (directly testable) functions
// ============================================================================

/// Translate a service error into its HTTP status and JSON body.
pub fn error_to_http(error: &SummarizeError) -> (StatusCode, serde_json::Value) {
    match error {
        SummarizeError::Validation => (
            StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": error.to_string() }),
        ),
        SummarizeError::Configuration => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "error": error.to_string() }),
        ),
        SummarizeError::Upstream { details } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({
                "error": error.to_string(),
                "details": details,
            }),
        ),
    }
}

pub async fn summarize_inner(
    service: &SummarizationService,
    req: SummarizeRequest,
) -> (StatusCode, serde_json::Value) {
    match service.summarize(req.text.as_deref()).await {
        Ok(summary) => (StatusCode::OK, serde_json::json!({ "summary": summary })),
        Err(e) => error_to_http(&e),
    }
}

pub fn health_inner(service: &SummarizationService) -> (StatusCode, serde_json::Value) {
    let database = if service.persistence_available() {
        "Connected"
    } else {
        "Disconnected"
    };
    let gemini_api = if service.credential_configured() {
        "Configured"
    } else {
        "Not configured"
    };

    (
        StatusCode::OK,
        serde_json::json!({
            "status": "OK",
            "database": database,
            "gemini_api": gemini_api,
            "version": env!("CARGO_PKG_VERSION"),
        }),
    )
}

pub fn too_large_inner() -> (StatusCode, serde_json::Value) {
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        serde_json::json!({ "error": "Text is too large" }),
    )
}

pub fn test_inner() -> serde_json::Value {
    serde_json::json!({ "message": "Server is working!" })
}

pub async fn history_inner(
    service: &SummarizationService,
    query: HistoryQuery,
) -> (StatusCode, serde_json::Value) {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    match service.recent(limit).await {
        Ok(records) => (
            StatusCode::OK,
            serde_json::json!({
                "count": records.len(),
                "summaries": records,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list summaries");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": e.to_string() }),
            )
        }
    }
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

/// A body over `MAX_BODY_BYTES` gets 413. Any other body that is missing or
/// not valid JSON is treated like a request without `text`.
pub async fn summarize_handler(
    State(state): State<Arc<HttpState>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> impl IntoResponse {
    tracing::info!("Received summarize request");
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!(limit = MAX_BODY_BYTES, "Summarize body over size limit");
            let (status, body) = too_large_inner();
            return (status, Json(body));
        }
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Unreadable summarize body");
            SummarizeRequest::default()
        }
    };
    let (status, body) = summarize_inner(&state.service, req).await;
    (status, Json(body))
}

/// An unparseable query string falls back to the default limit.
pub async fn history_handler(
    State(state): State<Arc<HttpState>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> impl IntoResponse {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Unreadable history query");
            HistoryQuery::default()
        }
    };
    let (status, body) = history_inner(&state.service, query).await;
    (status, Json(body))
}

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state.service);
    (status, Json(body))
}

pub async fn test_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(test_inner()))
}
