use serde::{Deserialize, Serialize};

use slicecheck_core::DomainResult;
use slicecheck_events::{Command, DomainEvent};

use crate::course::{CreateCourse, create_course};
use crate::enrollment::{EnrollStudent, enroll_student};
use crate::event::CourseEvent;

/// Every command of the course domain, for slices that mix them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CourseCommand {
    CreateCourse(CreateCourse),
    EnrollStudent(EnrollStudent),
}

impl Command for CourseCommand {
    fn command_type(&self) -> &'static str {
        match self {
            CourseCommand::CreateCourse(c) => c.command_type(),
            CourseCommand::EnrollStudent(c) => c.command_type(),
        }
    }
}

impl From<CreateCourse> for CourseCommand {
    fn from(value: CreateCourse) -> Self {
        CourseCommand::CreateCourse(value)
    }
}

impl From<EnrollStudent> for CourseCommand {
    fn from(value: EnrollStudent) -> Self {
        CourseCommand::EnrollStudent(value)
    }
}

/// Route a command to its handler.
pub fn decide(
    history: &[DomainEvent<CourseEvent>],
    command: &CourseCommand,
) -> DomainResult<DomainEvent<CourseEvent>> {
    match command {
        CourseCommand::CreateCourse(cmd) => create_course(history, cmd),
        CourseCommand::EnrollStudent(cmd) => enroll_student(history, cmd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn commands_use_the_type_data_wire_shape() {
        let command: CourseCommand = serde_json::from_value(json!({
            "type": "create_course",
            "data": { "name": "English 101", "capacity": 33 }
        }))
        .unwrap();
        assert_eq!(command, CourseCommand::from(CreateCourse::new("English 101", 33)));
        assert_eq!(command.command_type(), "create_course");
    }

    #[test]
    fn decide_routes_by_variant() {
        let created = decide(&[], &CreateCourse::new("English 101", 33).into()).unwrap();
        assert_eq!(created.event_name(), "course_created");

        let enrolled = decide(&[created], &EnrollStudent::new("Bob Marley").into()).unwrap();
        assert_eq!(enrolled.event_name(), "student_enrolled");
    }
}
