//! HTTP server mode for ingestion and the login query

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{Error, Result};
use crate::ingest::Orchestrator;
use crate::query::LoginQuery;
use crate::trigger::{S3Event, TriggerEnvelope};

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Runs ingestion for `POST /ingest`
    pub orchestrator: Orchestrator,
    /// Answers `GET /logins_today`
    pub query: LoginQuery,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/logins_today", get(logins_today))
        .route("/ingest", post(ingest))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server on all interfaces
pub async fn serve(orchestrator: Orchestrator, query: LoginQuery, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    serve_on(listener, AppState { orchestrator, query }).await
}

/// Serve on an already bound listener
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Starting HTTP server on http://{}", addr);
    }

    axum::serve(listener, router(state))
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

fn error_response(err: &Error) -> Response {
    tracing::error!(error = %err, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Login count for today over the latest clean artifact
async fn logins_today(State(state): State<Arc<AppState>>) -> Response {
    match state.query.logins_today().await {
        Ok(count) => (StatusCode::OK, Json(count)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Ingest the objects named by an S3 event notification
async fn ingest(State(state): State<Arc<AppState>>, Json(event): Json<S3Event>) -> Response {
    let trigger = TriggerEnvelope::from(event);
    match state.orchestrator.run(&trigger).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response(&e),
    }
}
