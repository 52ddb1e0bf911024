//! # Middleware
//!
//! - `metrics` — per-request Prometheus counters and latency histograms.
//! - `tracing_layer` — request spans via `tower_http::trace`.

pub mod metrics;
pub mod tracing_layer;
