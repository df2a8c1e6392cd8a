//! Storage boundary for users and courses.
//!
//! Handlers and the credential verifier only see these traits; the concrete
//! backend (in-memory for dev/tests, Postgres otherwise) is chosen at startup
//! and injected as `Arc<dyn Store>`.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;

use coursebook_auth::{User, UserDirectory};
use coursebook_core::{CourseId, StoreError};
use coursebook_courses::Course;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;

/// User persistence. Lookups come from [`UserDirectory`].
#[async_trait]
pub trait UserStore: UserDirectory {
    /// Insert a new user. Fails with `StoreError::Duplicate("emailAddress")`
    /// when the email is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;
}

/// Course persistence.
///
/// Every read attaches the owner summary (`Course::owner`) and nothing else
/// from the users table; in particular never the password hash.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// All courses, oldest first.
    async fn list_courses(&self) -> Result<Vec<Course>, StoreError>;

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StoreError>;

    async fn insert_course(&self, course: &Course) -> Result<(), StoreError>;

    /// Overwrite the editable fields of an existing course. Returns `false`
    /// if the course no longer exists. Ownership is not changed.
    async fn update_course(&self, course: &Course) -> Result<bool, StoreError>;

    /// Returns `false` if the course did not exist.
    async fn delete_course(&self, id: CourseId) -> Result<bool, StoreError>;
}

/// Everything the API needs from storage.
pub trait Store: UserStore + CourseStore {}

impl<T> Store for T where T: UserStore + CourseStore + ?Sized {}
