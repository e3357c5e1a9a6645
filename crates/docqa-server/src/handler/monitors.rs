//! System health monitoring handlers.

use axum::Json;
use axum::Router;
use axum::routing::get;

use crate::handler::response::HealthResponse;
use crate::service::ServiceState;

/// Returns the health monitor routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

/// Reports liveness of the service.
async fn health_status() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
