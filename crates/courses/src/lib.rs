//! Courses domain module.
//!
//! Course records, their owner summary, and the validation rules for
//! creating and changing them. Pure domain logic (no IO, no HTTP, no storage).

pub mod course;

pub use course::{Course, CourseChanges, CourseOwner, NewCourse};
