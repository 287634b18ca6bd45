//! Request metrics middleware.
//! Records volume and latency for every matched route except `/metrics`.

use std::time::Instant;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::observability::metrics;

pub const METRICS_PATH: &str = "/metrics";

pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let endpoint = match request.extensions().get::<MatchedPath>() {
        Some(path) => path.as_str().to_string(),
        None => request.uri().path().to_string(),
    };
    if endpoint == METRICS_PATH {
        return next.run(request).await;
    }

    let method = request.method().to_string();
    let start = Instant::now();
    let response = next.run(request).await;
    metrics::record_request(&endpoint, &method, response.status().as_u16(), start);
    response
}
