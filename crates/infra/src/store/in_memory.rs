use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use coursebook_auth::{User, UserDirectory};
use coursebook_core::{CourseId, Entity, StoreError, UserId};
use coursebook_courses::{Course, CourseOwner};

use super::{CourseStore, UserStore};

/// In-memory store for tests/dev.
///
/// Courses are kept without their owner summary; it is joined from the
/// users map on every read, the same way the SQL backend joins it.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    courses: RwLock<HashMap<CourseId, Course>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_owner(users: &HashMap<UserId, User>, mut course: Course) -> Course {
        course.owner = course
            .user_id
            .and_then(|id| users.get(&id))
            .map(|u| CourseOwner {
                id: u.id,
                first_name: u.first_name.clone(),
                last_name: u.last_name.clone(),
                email: u.email.clone(),
            });
        course
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.values().find(|u| u.email.as_str() == email).cloned())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("emailAddress".to_string()));
        }
        users.insert(*user.id(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl CourseStore for InMemoryStore {
    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        let courses = self.courses.read().map_err(|_| poisoned())?;

        let mut all: Vec<Course> = courses
            .values()
            .cloned()
            .map(|c| Self::with_owner(&users, c))
            .collect();
        // UUIDv7 ids sort in creation order.
        all.sort_by_key(|c| c.id);
        Ok(all)
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        let courses = self.courses.read().map_err(|_| poisoned())?;
        Ok(courses.get(&id).cloned().map(|c| Self::with_owner(&users, c)))
    }

    async fn insert_course(&self, course: &Course) -> Result<(), StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        if let Some(owner) = course.user_id {
            if !users.contains_key(&owner) {
                return Err(StoreError::Backend(format!("course owner {owner} does not exist")));
            }
        }

        let mut courses = self.courses.write().map_err(|_| poisoned())?;
        let mut stored = course.clone();
        stored.owner = None;
        courses.insert(*course.id(), stored);
        Ok(())
    }

    async fn update_course(&self, course: &Course) -> Result<bool, StoreError> {
        let mut courses = self.courses.write().map_err(|_| poisoned())?;
        let Some(stored) = courses.get_mut(course.id()) else {
            return Ok(false);
        };
        stored.title = course.title.clone();
        stored.description = course.description.clone();
        stored.estimated_time = course.estimated_time.clone();
        stored.materials_needed = course.materials_needed.clone();
        stored.updated_at = course.updated_at;
        Ok(true)
    }

    async fn delete_course(&self, id: CourseId) -> Result<bool, StoreError> {
        let mut courses = self.courses.write().map_err(|_| poisoned())?;
        Ok(courses.remove(&id).is_some())
    }
}
