use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::app::errors;

pub async fn welcome() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Welcome to the REST API project!" }))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found() -> Response {
    errors::json_error(StatusCode::NOT_FOUND, "Route Not Found")
}
