use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use models::resource::Resource;
use service::errors::ServiceError;

use crate::auth::AuthError;

/// Error leaving a handler, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn invalid_id<R: Resource>() -> Self {
        Self::bad_request(format!("invalid {} ID", R::NAME))
    }

    pub fn validation(e: ModelError) -> Self {
        Self::bad_request(e.to_string())
    }

    /// Mapping for collection reads.
    pub fn collection<R: Resource>(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound => Self::new(StatusCode::NOT_FOUND, format!("no {} found", R::PLURAL)),
            ServiceError::Internal(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }

    /// Mapping for operations addressing one resource.
    pub fn single<R: Resource>(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound => Self::new(StatusCode::NOT_FOUND, format!("{} not found", R::NAME)),
            ServiceError::Internal(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound => Self::new(StatusCode::NOT_FOUND, "not found"),
            ServiceError::Internal(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::new(e.status(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}
