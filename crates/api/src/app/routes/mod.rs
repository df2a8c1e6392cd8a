use axum::{
    routing::{get, post, put},
    Router,
};

use crate::app::AppState;

pub mod courses;
pub mod system;
pub mod users;

/// Endpoints anyone may call.
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(system::welcome))
        .route("/health", get(system::health))
        .route("/api/users", post(users::register_user))
        .route("/api/courses", get(courses::list_courses))
        .route("/api/courses/:id", get(courses::get_course))
}

/// Endpoints that require Basic authentication.
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(users::current_user))
        .route("/api/courses", post(courses::create_course))
        .route(
            "/api/courses/:id",
            put(courses::update_course).delete(courses::delete_course),
        )
}
