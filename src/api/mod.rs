//! API layer - HTTP endpoint handlers.

mod fill;
mod health;
mod metrics;
mod routes;

// Re-export all handlers for use in server/app.rs
pub use fill::{fill, FILL_ID_HEADER, PPTX_CONTENT_TYPE};
pub use health::{health, HealthResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
