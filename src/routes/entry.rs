use std::sync::Arc;

use axum::{Router, middleware, routing::get};

use crate::{
    middleware::{catch_panic_layer, json_error_middleware},
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

use super::api;

pub const AUTH_PREFIX: &str = "/auth";

/// Full application router. Error bodies are normalised to the JSON envelope
/// and handler panics become 500 responses.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest(AUTH_PREFIX, api::router(state))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
}

async fn health() -> ApiResult<serde_json::Value> {
    JsonApiResponse::ok(serde_json::json!({ "status": "ok" }))
}
