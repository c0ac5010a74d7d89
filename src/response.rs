use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

/// `{ "success": bool, "message"?: string, "data"?: T }`
#[derive(Debug, Serialize)]
pub struct JsonApiResponse<T: Serialize> {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> JsonApiResponse<T> {
    pub fn ok(data: T) -> ApiResult<T> {
        Ok(Self {
            status: StatusCode::OK,
            success: true,
            message: None,
            data: Some(data),
        })
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> ApiResult<T> {
        Ok(Self {
            status,
            success: true,
            message: Some(message.into()),
            data: Some(data),
        })
    }
}

impl JsonApiResponse<()> {
    pub fn message(message: impl Into<String>) -> ApiResult<()> {
        Ok(Self {
            status: StatusCode::OK,
            success: true,
            message: Some(message.into()),
            data: None,
        })
    }

    pub(crate) fn from_error(err: &AppError) -> Self {
        Self {
            status: status_for(err),
            success: false,
            message: Some(err.message().to_string()),
            data: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        log_app_error(&self, status);
        JsonApiResponse::from_error(&self).into_response()
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub(crate) fn log_app_error(err: &AppError, status: StatusCode) {
    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), error = %err, "request failed");
    } else {
        tracing::debug!(status = status.as_u16(), error = %err, "request rejected");
    }
}

pub(crate) fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
