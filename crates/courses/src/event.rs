use serde::{Deserialize, Serialize};
use serde_json::json;

use slicecheck_core::EntityId;
use slicecheck_events::{DomainEvent, EventPayload, Tags};

/// Event: CourseCreated.
///
/// `capacity` is kept on the typed payload only; the tag map (and therefore
/// the detail projection) carries the course id and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCreated {
    pub course_id: EntityId,
    pub course_name: String,
    pub capacity: u32,
}

impl CourseCreated {
    pub fn new(course_name: impl Into<String>, capacity: u32) -> Self {
        let course_name = course_name.into();
        Self {
            course_id: EntityId::from_name(&course_name),
            course_name,
            capacity,
        }
    }
}

/// Event: StudentEnrolled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentEnrolled {
    pub student_id: EntityId,
    pub name: String,
}

impl StudentEnrolled {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            student_id: EntityId::from_name(&name),
            name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseEvent {
    CourseCreated(CourseCreated),
    StudentEnrolled(StudentEnrolled),
}

impl EventPayload for CourseEvent {
    fn event_name(&self) -> &'static str {
        match self {
            CourseEvent::CourseCreated(_) => "course_created",
            CourseEvent::StudentEnrolled(_) => "student_enrolled",
        }
    }

    fn tags(&self) -> Tags {
        let mut tags = Tags::new();
        match self {
            CourseEvent::CourseCreated(e) => {
                tags.insert("course_id".into(), json!(e.course_id.to_string()));
                tags.insert("course_name".into(), json!(e.course_name));
            }
            CourseEvent::StudentEnrolled(e) => {
                tags.insert("name".into(), json!(e.name));
                tags.insert("student_id".into(), json!(e.student_id.to_string()));
            }
        }
        tags
    }

    fn natural_key(&self) -> Option<&str> {
        match self {
            CourseEvent::CourseCreated(e) => Some(e.course_name.as_str()),
            CourseEvent::StudentEnrolled(e) => Some(e.name.as_str()),
        }
    }
}

/// A recorded `course_created` event, as handlers emit and fixtures expect it.
pub fn course_created(course_name: impl Into<String>, capacity: u32) -> DomainEvent<CourseEvent> {
    DomainEvent::new(CourseEvent::CourseCreated(CourseCreated::new(
        course_name,
        capacity,
    )))
}

/// A recorded `student_enrolled` event.
pub fn student_enrolled(name: impl Into<String>) -> DomainEvent<CourseEvent> {
    DomainEvent::new(CourseEvent::StudentEnrolled(StudentEnrolled::new(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slicecheck_core::create_id;
    use slicecheck_events::{DetailProjection, EventDetails};

    #[test]
    fn course_created_details_carry_id_and_name() {
        let event = course_created("English 101", 33);
        let mut data = Tags::new();
        data.insert("course_id".into(), json!(create_id("English 101")));
        data.insert("course_name".into(), json!("English 101"));

        assert_eq!(event.details(), EventDetails::new("course_created", data));
        assert_eq!(event.event_id(), create_id("English 101"));
    }

    #[test]
    fn capacity_stays_on_the_typed_payload() {
        let event = course_created("English 101", 33);
        assert_eq!(event.get("capacity"), None);
        match event.payload() {
            CourseEvent::CourseCreated(e) => assert_eq!(e.capacity, 33),
            _ => panic!("Expected CourseCreated payload"),
        }
    }

    #[test]
    fn student_enrolled_details_carry_name_and_id() {
        let event = student_enrolled("Bob Marley");
        let details = serde_json::to_value(event.details()).unwrap();
        assert_eq!(
            details,
            json!({
                "type": "student_enrolled",
                "data": { "name": "Bob Marley", "student_id": create_id("Bob Marley") }
            })
        );
    }

    #[test]
    fn rebuilt_fixtures_compare_equal_by_details() {
        let a = course_created("English 101", 33);
        let b = course_created("English 101", 33).with_metadata("source", "fixture");
        assert_ne!(a, b);
        assert_eq!(a.details(), b.details());
    }
}
