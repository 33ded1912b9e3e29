use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppState;

/// Root greeting
pub async fn hello() -> Json<Value> {
    Json(json!({ "msg": "Hello, World!" }))
}

/// Health check endpoint handler
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "finance-report",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health_ready(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, StatusCode> {
    if let Err(e) = state.store.ping().await {
        tracing::warn!(error = %e, "Readiness check failed");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(json!({
        "status": "ready",
        "database": "connected"
    })))
}
