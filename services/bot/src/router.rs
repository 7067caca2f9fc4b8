use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use gatekeeper_core::health::{healthz, readyz};
use gatekeeper_core::middleware::request_id_layer;

use crate::handlers::{
    registration::{register_webhook, unregister_webhook},
    status::status,
    webhook::receive_update,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Status
        .route("/", get(status))
        // Telegram
        .route("/webhook", post(receive_update))
        .route("/webhook/registration", post(register_webhook))
        .route("/webhook/registration", delete(unregister_webhook))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
