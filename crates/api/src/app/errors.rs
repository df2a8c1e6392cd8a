use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use coursebook_auth::{AuthError, RegistrationError};
use coursebook_core::{DomainError, StoreError};

pub const BASIC_CHALLENGE: &str = "Basic realm=\"coursebook\"";

/// Cause of a 500, attached to the response for the request logger.
///
/// It never reaches the response body.
#[derive(Debug, Clone)]
pub struct InternalFault(pub String);

/// Every way a handler can fail, and the response each one produces.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("access denied")]
    Unauthorized,

    #[error("principal does not own the resource")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(&'static str),

    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("bad request: {0}")]
    BadRequest(&'static str),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Unauthorized => (
                status,
                [(header::WWW_AUTHENTICATE, BASIC_CHALLENGE)],
                Json(json!({ "message": "Access Denied" })),
            )
                .into_response(),
            Self::Forbidden => json_error(status, "Access denied"),
            Self::NotFound(message) | Self::BadRequest(message) => json_error(status, message),
            Self::Validation(errors) => (status, Json(json!({ "errors": errors }))).into_response(),
            Self::Internal(cause) => {
                let mut response = (
                    status,
                    Json(json!({ "message": "Internal Server Error", "error": {} })),
                )
                    .into_response();
                response.extensions_mut().insert(InternalFault(cause));
                response
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(e) => Self::internal(e),
            _ => Self::Unauthorized,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(messages) => Self::Validation(messages),
            DomainError::InvalidId(_) => Self::BadRequest("Invalid id"),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Invalid(e) => e.into(),
            RegistrationError::Password(e) => Self::internal(e),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::internal(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(vec![rejection.body_text()])
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}
