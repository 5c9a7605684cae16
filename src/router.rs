use axum::{
    routing::get,
    Router,
};
use std::time::Duration;

use crate::{
    handlers::{
        cakes::{create_cake, delete_cake, get_cake_by_id, get_cakes, update_cake},
        health_check,
    },
    middleware::apply_middleware,
    service::SharedCakeService,
};

/// Routes only, no middleware. Tests drive this directly.
pub fn create_routes(service: SharedCakeService) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/cakes", get(get_cakes).post(create_cake))
        .route(
            "/cakes/:id",
            get(get_cake_by_id).put(update_cake).delete(delete_cake),
        )
        .with_state(service)
}

/// Create the Axum router with all endpoints and middleware
pub fn create_router(service: SharedCakeService, request_timeout: Duration) -> Router {
    apply_middleware(create_routes(service), request_timeout)
}
