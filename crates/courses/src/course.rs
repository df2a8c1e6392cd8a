use chrono::{DateTime, Utc};

use coursebook_auth::{OwnedResource, Principal};
use coursebook_core::{CourseId, DomainResult, EmailAddress, Entity, UserId, Violations};

/// Public summary of the user who owns a course.
///
/// This is what course reads expose about the owner; it has no password
/// field to leak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOwner {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
}

impl From<&Principal> for CourseOwner {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.user_id,
            first_name: principal.first_name.clone(),
            last_name: principal.last_name.clone(),
            email: principal.email.clone(),
        }
    }
}

/// A course record.
///
/// `user_id` is the stored foreign key; `owner` is the joined owner summary
/// that stores attach on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub user_id: Option<UserId>,
    pub owner: Option<CourseOwner>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Course {
    type Id = CourseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl OwnedResource for Course {
    fn owner_email(&self) -> Option<&EmailAddress> {
        self.owner.as_ref().map(|o| &o.email)
    }
}

/// Input for creating a course. Ownership is not part of the input: the
/// creating principal always becomes the owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
}

impl NewCourse {
    /// Validate and build a course owned by `owner`.
    pub fn into_course(self, owner: &Principal, now: DateTime<Utc>) -> DomainResult<Course> {
        let mut violations = Violations::new();
        check_required(&mut violations, self.title.as_deref(), "title");
        check_required(&mut violations, self.description.as_deref(), "description");
        violations.finish()?;

        Ok(Course {
            id: CourseId::new(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            estimated_time: self.estimated_time,
            materials_needed: self.materials_needed,
            user_id: Some(owner.user_id),
            owner: Some(CourseOwner::from(owner)),
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update.
///
/// The outer `Option` is presence: `None` leaves a field unchanged. The
/// inner one is the new value, so `Some(None)` clears an optional field and
/// fails validation for a required one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseChanges {
    pub title: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub estimated_time: Option<Option<String>>,
    pub materials_needed: Option<Option<String>>,
}

impl Course {
    /// Apply `changes` if they are all valid; otherwise leave `self` as is.
    ///
    /// Owner fields are never touched here.
    pub fn apply_changes(&mut self, changes: CourseChanges, now: DateTime<Utc>) -> DomainResult<()> {
        let mut violations = Violations::new();
        if let Some(title) = &changes.title {
            check_required(&mut violations, title.as_deref(), "title");
        }
        if let Some(description) = &changes.description {
            check_required(&mut violations, description.as_deref(), "description");
        }
        violations.finish()?;

        if let Some(Some(title)) = changes.title {
            self.title = title;
        }
        if let Some(Some(description)) = changes.description {
            self.description = description;
        }
        if let Some(estimated_time) = changes.estimated_time {
            self.estimated_time = estimated_time;
        }
        if let Some(materials_needed) = changes.materials_needed {
            self.materials_needed = materials_needed;
        }
        self.updated_at = now;
        Ok(())
    }
}

fn check_required(violations: &mut Violations, value: Option<&str>, field: &str) {
    if value.map(str::trim).is_none_or(str::is_empty) {
        violations.push(format!("Please provide a value for \"{field}\""));
    }
}
