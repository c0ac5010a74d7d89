use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{error::AppError, response::JsonApiResponse};

pub fn catch_panic_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(panic_to_json)
}

fn panic_to_json(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic"
    };
    tracing::error!(panic = details, "handler panicked");

    let client_message = if cfg!(debug_assertions) {
        format!("Internal server error: {details}")
    } else {
        "Internal server error".to_string()
    };
    JsonApiResponse::from_error(&AppError::internal(client_message)).into_response()
}
