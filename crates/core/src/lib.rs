//! `coursebook-core`: shared domain building blocks.
//!
//! Identifiers, error types and small value objects used by every other
//! crate. No IO, no HTTP, no storage.

pub mod email;
pub mod entity;
pub mod error;
pub mod id;

pub use email::EmailAddress;
pub use entity::Entity;
pub use error::{DomainError, DomainResult, StoreError, Violations};
pub use id::{CourseId, UserId};
