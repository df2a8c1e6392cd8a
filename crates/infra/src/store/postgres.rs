//! Postgres-backed store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` (field named after the constraint) |
//! | Database (other) | any other | `Backend` |
//! | PoolClosed / PoolTimedOut / Io / Tls | N/A | `Unavailable` |
//! | Other | N/A | `Backend` |
//!
//! ## Thread Safety
//!
//! `PostgresStore` is `Send + Sync` and cheap to clone; connections come
//! from the SQLx pool.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use coursebook_auth::{PasswordHash, User, UserDirectory};
use coursebook_core::{CourseId, EmailAddress, StoreError, UserId};
use coursebook_courses::{Course, CourseOwner};

use super::{CourseStore, UserStore};

const SCHEMA: &str = include_str!("../../sql/schema.sql");

const COURSE_SELECT: &str = r#"
    SELECT
        c.id,
        c.title,
        c.description,
        c.estimated_time,
        c.materials_needed,
        c.user_id,
        c.created_at,
        c.updated_at,
        u.id AS owner_id,
        u.first_name AS owner_first_name,
        u.last_name AS owner_last_name,
        u.email_address AS owner_email_address
    FROM courses c
    LEFT JOIN users u ON u.id = c.user_id
"#;

/// Postgres-backed user and course store.
///
/// The password hash is read only by `find_by_email`; course queries join
/// the owner's name and email and nothing else.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    /// Create a new PostgresStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect a pool to `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    /// Round-trip a trivial query to prove the database is reachable.
    pub async fn check_connection(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("check_connection", e))?;
        Ok(())
    }

    #[instrument(skip_all, err)]
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email_address, password_hash, created_at, updated_at
            FROM users
            WHERE email_address = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_email", e))?;

        row.map(|r| UserRow::from_row(&r).map(User::from))
            .transpose()
            .map_err(|e| map_sqlx_error("find_user_by_email", e))
    }

    #[instrument(skip_all, fields(user_id = %user.id), err)]
    pub async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, email_address, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.as_str())
        .bind(user.password_hash.as_phc())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_user", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        let sql = format!("{COURSE_SELECT} ORDER BY c.created_at ASC, c.id ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_courses", e))?;

        let mut courses = Vec::with_capacity(rows.len());
        for row in rows {
            let course = CourseRow::from_row(&row).map_err(|e| map_sqlx_error("list_courses", e))?;
            courses.push(course.into());
        }
        Ok(courses)
    }

    #[instrument(skip(self), fields(course_id = %id), err)]
    pub async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        let sql = format!("{COURSE_SELECT} WHERE c.id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_course", e))?;

        row.map(|r| CourseRow::from_row(&r).map(Course::from))
            .transpose()
            .map_err(|e| map_sqlx_error("get_course", e))
    }

    #[instrument(skip_all, fields(course_id = %course.id), err)]
    pub async fn insert_course(&self, course: &Course) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, title, description, estimated_time, materials_needed, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.estimated_time.as_deref())
        .bind(course.materials_needed.as_deref())
        .bind(course.user_id.map(Uuid::from))
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_course", e))?;
        Ok(())
    }

    #[instrument(skip_all, fields(course_id = %course.id), err)]
    pub async fn update_course(&self, course: &Course) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET title = $2,
                description = $3,
                estimated_time = $4,
                materials_needed = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.estimated_time.as_deref())
        .bind(course.materials_needed.as_deref())
        .bind(course.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_course", e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(course_id = %id), err)]
    pub async fn delete_course(&self, id: CourseId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_course", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserDirectory for PostgresStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_user_by_email(email).await
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        PostgresStore::insert_user(self, user).await
    }
}

#[async_trait]
impl CourseStore for PostgresStore {
    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        PostgresStore::list_courses(self).await
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, StoreError> {
        PostgresStore::get_course(self, id).await
    }

    async fn insert_course(&self, course: &Course) -> Result<(), StoreError> {
        PostgresStore::insert_course(self, course).await
    }

    async fn update_course(&self, course: &Course) -> Result<bool, StoreError> {
        PostgresStore::update_course(self, course).await
    }

    async fn delete_course(&self, id: CourseId) -> Result<bool, StoreError> {
        PostgresStore::delete_course(self, id).await
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Duplicate(unique_field(db_err.constraint())),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool unavailable in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {}: {}", operation, e)),
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

// Report unique violations with the API field name where we know it.
fn unique_field(constraint: Option<&str>) -> String {
    match constraint {
        Some("users_email_address_key") => "emailAddress".to_string(),
        Some(other) => other.to_string(),
        None => "unknown".to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLx row types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email_address: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for UserRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(UserRow {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email_address: row.try_get("email_address")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::from_uuid(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: EmailAddress::from_stored(row.email_address),
            password_hash: PasswordHash::from_phc(row.password_hash),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct CourseRow {
    id: Uuid,
    title: String,
    description: String,
    estimated_time: Option<String>,
    materials_needed: Option<String>,
    user_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_id: Option<Uuid>,
    owner_first_name: Option<String>,
    owner_last_name: Option<String>,
    owner_email_address: Option<String>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for CourseRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(CourseRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            estimated_time: row.try_get("estimated_time")?,
            materials_needed: row.try_get("materials_needed")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            owner_id: row.try_get("owner_id")?,
            owner_first_name: row.try_get("owner_first_name")?,
            owner_last_name: row.try_get("owner_last_name")?,
            owner_email_address: row.try_get("owner_email_address")?,
        })
    }
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        let owner = match (row.owner_id, row.owner_first_name, row.owner_last_name, row.owner_email_address) {
            (Some(id), Some(first_name), Some(last_name), Some(email)) => Some(CourseOwner {
                id: UserId::from_uuid(id),
                first_name,
                last_name,
                email: EmailAddress::from_stored(email),
            }),
            _ => None,
        };

        Course {
            id: CourseId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            estimated_time: row.estimated_time,
            materials_needed: row.materials_needed,
            user_id: row.user_id.map(UserId::from_uuid),
            owner,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
