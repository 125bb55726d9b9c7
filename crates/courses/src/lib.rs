//! Course/enrollment example domain and its slices.
//!
//! Handlers here are deterministic domain logic (no IO, no storage); the
//! `slices` module registers them with the replay harness.

pub mod catalog;
pub mod command;
pub mod course;
pub mod enrollment;
pub mod event;
pub mod slices;

pub use catalog::{CourseCatalog, CourseListing, course_catalog};
pub use command::{CourseCommand, decide};
pub use course::{CreateCourse, create_course};
pub use enrollment::{EnrollStudent, enroll_student};
pub use event::{CourseCreated, CourseEvent, StudentEnrolled, course_created, student_enrolled};
pub use slices::registry;
