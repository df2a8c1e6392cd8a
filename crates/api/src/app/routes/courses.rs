use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use coursebook_auth::{authorize_found, AuthzError};
use coursebook_core::CourseId;
use coursebook_courses::{Course, NewCourse};

use crate::app::dto::{self, CourseRequest};
use crate::app::errors::ApiError;
use crate::app::AppState;
use crate::context::CurrentUser;

const COURSE_NOT_FOUND: &str = "Course not found";
const DELETE_NOT_FOUND: &str = "You tried to delete a course that does not exist.";

pub async fn list_courses(State(state): State<AppState>) -> Result<Response, ApiError> {
    let courses = state.store.list_courses().await?;
    let body: Vec<serde_json::Value> = courses.iter().map(dto::course_to_json).collect();
    Ok(Json(body).into_response())
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_course_id(&id)?;
    let course = state
        .store
        .get_course(id)
        .await?
        .ok_or(ApiError::NotFound(COURSE_NOT_FOUND))?;
    Ok(Json(dto::course_to_json(&course)).into_response())
}

pub async fn create_course(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<CourseRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;
    let course = NewCourse::from(body).into_course(user.principal(), Utc::now())?;
    state.store.insert_course(&course).await?;

    tracing::info!(course_id = %course.id, user_id = %user.principal().user_id, "course created");
    let location = format!("/api/courses/{}", course.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]).into_response())
}

pub async fn update_course(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    body: Result<Json<CourseRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = parse_course_id(&id)?;
    let Json(body) = body?;

    let course = state.store.get_course(id).await?;
    let mut course = owned_by(user, course, COURSE_NOT_FOUND)?;

    course.apply_changes(body.into(), Utc::now())?;
    if !state.store.update_course(&course).await? {
        return Err(ApiError::NotFound(COURSE_NOT_FOUND));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn delete_course(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_course_id(&id)?;

    let course = state.store.get_course(id).await?;
    let course = owned_by(user, course, DELETE_NOT_FOUND)?;

    if !state.store.delete_course(course.id).await? {
        return Err(ApiError::NotFound(DELETE_NOT_FOUND));
    }

    tracing::info!(course_id = %course.id, "course deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

fn parse_course_id(raw: &str) -> Result<CourseId, ApiError> {
    raw.parse::<CourseId>()
        .map_err(|_| ApiError::BadRequest("Invalid course id"))
}

// 404 comes before 403: a missing course is never an ownership failure.
fn owned_by(user: CurrentUser, course: Option<Course>, missing: &'static str) -> Result<Course, ApiError> {
    match authorize_found(user.principal(), course.as_ref()) {
        Ok(()) => course.ok_or(ApiError::NotFound(missing)),
        Err(AuthzError::NotFound) => Err(ApiError::NotFound(missing)),
        Err(AuthzError::Forbidden) => {
            tracing::warn!(user_id = %user.principal().user_id, "course change forbidden");
            Err(ApiError::Forbidden)
        }
    }
}
