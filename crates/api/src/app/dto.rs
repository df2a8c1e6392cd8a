use serde::{Deserialize, Deserializer};
use serde_json::json;
use zeroize::Zeroizing;

use coursebook_auth::{Principal, RegisterUser};
use coursebook_courses::{Course, CourseChanges, CourseOwner, NewCourse};

// -------------------------
// Request DTOs
// -------------------------

/// `POST /api/users` body. Every field is optional here so that missing
/// fields are reported together by validation instead of by the parser.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
}

impl From<RegisterUserRequest> for RegisterUser {
    fn from(body: RegisterUserRequest) -> Self {
        RegisterUser {
            first_name: body.first_name,
            last_name: body.last_name,
            email_address: body.email_address,
            password: body.password.map(Zeroizing::new),
        }
    }
}

/// Course create/update body. A `userId` field, if sent, is ignored.
///
/// Each field is `None` when absent and `Some(None)` when sent as `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub estimated_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub materials_needed: Option<Option<String>>,
}

// Only called for keys that are in the body; `default` covers the rest.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<CourseRequest> for NewCourse {
    fn from(body: CourseRequest) -> Self {
        NewCourse {
            title: body.title.flatten(),
            description: body.description.flatten(),
            estimated_time: body.estimated_time.flatten(),
            materials_needed: body.materials_needed.flatten(),
        }
    }
}

impl From<CourseRequest> for CourseChanges {
    fn from(body: CourseRequest) -> Self {
        CourseChanges {
            title: body.title,
            description: body.description,
            estimated_time: body.estimated_time,
            materials_needed: body.materials_needed,
        }
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn principal_to_json(principal: &Principal) -> serde_json::Value {
    json!({
        "id": principal.user_id.to_string(),
        "firstName": principal.first_name,
        "lastName": principal.last_name,
        "emailAddress": principal.email.as_str(),
    })
}

pub fn owner_to_json(owner: &CourseOwner) -> serde_json::Value {
    json!({
        "id": owner.id.to_string(),
        "firstName": owner.first_name,
        "lastName": owner.last_name,
        "emailAddress": owner.email.as_str(),
    })
}

pub fn course_to_json(course: &Course) -> serde_json::Value {
    json!({
        "id": course.id.to_string(),
        "title": course.title,
        "description": course.description,
        "estimatedTime": course.estimated_time,
        "materialsNeeded": course.materials_needed,
        "userId": course.user_id.map(|id| id.to_string()),
        "createdAt": course.created_at.to_rfc3339(),
        "updatedAt": course.updated_at.to_rfc3339(),
        "user": course.owner.as_ref().map(owner_to_json),
    })
}
