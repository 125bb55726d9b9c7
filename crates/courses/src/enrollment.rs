use serde::{Deserialize, Serialize};

use slicecheck_core::{DomainError, DomainResult};
use slicecheck_events::{Command, DomainEvent};

use crate::event::{CourseEvent, student_enrolled};

/// Command: EnrollStudent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollStudent {
    pub name: String,
}

impl EnrollStudent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Command for EnrollStudent {
    fn command_type(&self) -> &'static str {
        "enroll_student"
    }
}

pub const DUPLICATE_STUDENT: &str = "Student already enrolled";

/// Enroll a student by name; a name can only be enrolled once.
pub fn enroll_student(
    history: &[DomainEvent<CourseEvent>],
    command: &EnrollStudent,
) -> DomainResult<DomainEvent<CourseEvent>> {
    if command.name.trim().is_empty() {
        return Err(DomainError::validation("Student name cannot be empty"));
    }

    let enrolled = history.iter().any(|event| {
        matches!(event.payload(), CourseEvent::StudentEnrolled(e) if e.name == command.name)
    });
    if enrolled {
        return Err(DomainError::rule_violation(DUPLICATE_STUDENT));
    }

    Ok(student_enrolled(command.name.clone()))
}
