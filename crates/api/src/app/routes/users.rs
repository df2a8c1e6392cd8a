use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use coursebook_auth::{RegisterUser, User};
use coursebook_core::StoreError;

use crate::app::dto::{self, RegisterUserRequest};
use crate::app::errors::ApiError;
use crate::app::AppState;
use crate::context::CurrentUser;

pub async fn current_user(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    Json(dto::principal_to_json(user.principal()))
}

pub async fn register_user(
    State(state): State<AppState>,
    body: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let input = RegisterUser::from(body);

    // Argon2 is CPU-bound.
    let user = tokio::task::spawn_blocking(move || User::register(input, Utc::now()))
        .await
        .map_err(ApiError::internal)??;

    match state.store.insert_user(&user).await {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            return Err(ApiError::Validation(vec![
                "The email address you entered already exists".to_string(),
            ]));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, [(header::LOCATION, "/")]).into_response())
}
