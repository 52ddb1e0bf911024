//! # tutorial-api — Axum API Service for Tutorials
//!
//! A thin REST layer over the tutorial document store. Each request maps
//! to one repository operation, served from Postgres when `DATABASE_URL`
//! is configured and from process memory otherwise.
//!
//! ## API Surface
//!
//! | Prefix              | Module                  | Purpose                    |
//! |---------------------|-------------------------|----------------------------|
//! | `/api/tutorials*`   | [`routes::tutorials`]   | CRUD, search, published    |
//! | `/openapi.json`     | [`openapi`]             | OpenAPI 3.1 document       |
//! | `/health/*`         | this module             | Liveness/readiness probes  |
//! | `/metrics`          | this module             | Prometheus scrape (opt-in) |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! CorsLayer → TraceLayer → MetricsMiddleware → Handler
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::{header, Method, StatusCode};
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsOrigin;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let mut api = Router::new()
        .route("/", get(welcome))
        .merge(routes::tutorials::router())
        .merge(openapi::router());

    if state.metrics.is_some() {
        api = api.layer(from_fn(middleware::metrics::metrics_middleware));
    }

    let mut probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    if state.metrics.is_some() {
        probes = probes.route("/metrics", get(prometheus_metrics));
    }

    Router::new()
        .merge(probes)
        .merge(api)
        .layer(middleware::tracing_layer::layer())
        .layer(cors_layer(&state.config.cors_origin))
        .with_state(state)
}

fn cors_layer(origin: &CorsOrigin) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);
    match origin {
        CorsOrigin::Any => layer.allow_origin(Any),
        CorsOrigin::Exact(value) => layer.allow_origin(value.clone()),
    }
}

#[derive(Serialize)]
struct Welcome {
    message: &'static str,
}

/// GET / — Greeting for humans poking at the service.
async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: "Welcome to the tutorials API.",
    })
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 "ready", or 503 when the configured
/// database cannot be reached.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if let Some(pool) = state.tutorials.pool() {
        if let Err(e) = db::ping(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}

/// GET /metrics — Prometheus metrics scrape endpoint.
///
/// Refreshes the tutorial gauges from the store, then renders every metric
/// in Prometheus text exposition format.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let Some(handle) = &state.metrics else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.tutorials.counts().await {
        Ok(counts) => {
            metrics::gauge!(middleware::metrics::TUTORIALS_TOTAL).set(counts.total as f64);
            metrics::gauge!(middleware::metrics::TUTORIALS_PUBLISHED_TOTAL)
                .set(counts.published as f64);
        }
        Err(e) => tracing::warn!("Failed to refresh tutorial gauges: {e}"),
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
        .into_response()
}
