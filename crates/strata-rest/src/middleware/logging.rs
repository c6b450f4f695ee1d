//! Request logging middleware.

use axum::{
    body::Body,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

/// Logs one line per request. Responses carrying cache `Warning` headers
/// are logged at `warn` so degraded writes stand out.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();
    let tier_warnings = response.headers().get_all(header::WARNING).iter().count();

    if tier_warnings > 0 {
        warn!(
            target: "http",
            %method, %uri, status, duration_ms, tier_warnings,
            "HTTP request completed with cache warnings"
        );
    } else {
        info!(target: "http", %method, %uri, status, duration_ms, "HTTP request completed");
    }

    response
}
