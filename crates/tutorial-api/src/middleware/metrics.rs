//! # Prometheus Metrics
//!
//! HTTP metrics are recorded through the `metrics` facade; the
//! `metrics-exporter-prometheus` recorder installed at startup renders
//! them for `/metrics`. Without an installed recorder the macros are
//! no-ops, so the middleware is safe to run in tests.
//!
//! Domain gauges (`tutorials_total`, `tutorials_published_total`) are
//! refreshed on each scrape (pull model) by the handler in `lib.rs`.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const HTTP_ERRORS_TOTAL: &str = "http_errors_total";
pub const TUTORIALS_TOTAL: &str = "tutorials_total";
pub const TUTORIALS_PUBLISHED_TOTAL: &str = "tutorials_published_total";

const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the process-wide Prometheus recorder.
///
/// May only succeed once per process.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
            DURATION_BUCKETS,
        )?
        .install_recorder()
}

/// Middleware that records request count, latency, and error count.
///
/// The path label is the matched route template (`/api/tutorials/{id}`),
/// not the raw URI, to keep label cardinality bounded.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let elapsed = start.elapsed().as_secs_f64();

    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.clone(),
        "path" => path.clone()
    )
    .record(elapsed);

    if response.status().is_client_error() || response.status().is_server_error() {
        metrics::counter!(
            HTTP_ERRORS_TOTAL,
            "method" => method,
            "path" => path,
            "status" => status
        )
        .increment(1);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    #[tokio::test]
    async fn middleware_passes_response_through() {
        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(axum::middleware::from_fn(metrics_middleware));
        let response = app
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
