use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::fill::fill;
use super::health::health;
use super::metrics::prometheus_metrics;

pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Template filling
        .route(
            "/fill",
            post(fill).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}
