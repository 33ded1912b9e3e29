use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use std::{sync::Arc, time::Instant};

use crate::AppState;

/// Records `http_request_duration_seconds` for every matched route
///
/// Attached with `route_layer`, so only requests that hit a route reach it
/// and the `path` label is the route template, never the raw URI.
pub async fn metrics_middleware(
    State(state): State<Arc<AppState>>,
    matched_path: MatchedPath,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = matched_path.as_str().to_string();
    let method = req.method().to_string();
    let start = Instant::now();

    let res = next.run(req).await;

    let status = res.status().as_u16().to_string();
    let elapsed = start.elapsed().as_secs_f64();

    state
        .metrics
        .http_request_duration_seconds
        .with_label_values(&[&path, &method, &status])
        .observe(elapsed);

    res
}
