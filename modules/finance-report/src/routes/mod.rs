use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{middleware::metrics::metrics_middleware, AppState};

pub mod health;
pub mod metrics;
pub mod report;

/// Build the service router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::hello))
        .route("/api/health", get(health::health))
        .route("/api/ready", get(health::health_ready))
        .route("/metrics", get(metrics::metrics))
        .route("/report", get(report::get_report))
        // request duration metrics, labelled by matched route
        .route_layer(from_fn_with_state(state.clone(), metrics_middleware))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(TraceLayer::new_for_http())
}
