// Handlers module
// HTTP handlers for the REST API

pub mod cakes;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::warn;

use crate::service::SharedCakeService;

/// Health check handler
/// Returns "OK" with 200 while the cake store is reachable, 503 otherwise
pub async fn health_check(State(service): State<SharedCakeService>) -> impl IntoResponse {
    match service.health_check().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE")
        }
    }
}
