//! Infrastructure layer: user and course storage backends.

pub mod store;

pub use store::{CourseStore, InMemoryStore, PostgresStore, Store, UserStore};
