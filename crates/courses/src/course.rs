use serde::{Deserialize, Serialize};

use slicecheck_core::{DomainError, DomainResult};
use slicecheck_events::{Command, DomainEvent};

use crate::event::{CourseEvent, course_created};

/// Command: CreateCourse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCourse {
    pub name: String,
    pub capacity: u32,
}

impl CreateCourse {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

impl Command for CreateCourse {
    fn command_type(&self) -> &'static str {
        "create_course"
    }
}

pub const DUPLICATE_COURSE: &str = "Course name already exists";

/// Create a course unless one with the same name was already created.
pub fn create_course(
    history: &[DomainEvent<CourseEvent>],
    command: &CreateCourse,
) -> DomainResult<DomainEvent<CourseEvent>> {
    if command.name.trim().is_empty() {
        return Err(DomainError::validation("Course name cannot be empty"));
    }
    if command.capacity == 0 {
        return Err(DomainError::validation("Course capacity must be positive"));
    }

    let exists = history.iter().any(|event| {
        matches!(event.payload(), CourseEvent::CourseCreated(e) if e.course_name == command.name)
    });
    if exists {
        return Err(DomainError::rule_violation(DUPLICATE_COURSE));
    }

    Ok(course_created(command.name.clone(), command.capacity))
}
