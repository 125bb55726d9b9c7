//! Course catalog read model.

use serde::{Deserialize, Serialize};

use slicecheck_core::EntityId;
use slicecheck_events::DomainEvent;

use crate::event::CourseEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseListing {
    pub course_id: EntityId,
    pub course_name: String,
    pub capacity: u32,
}

/// Courses in creation order plus enrolled student names in enrollment order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCatalog {
    pub courses: Vec<CourseListing>,
    pub students: Vec<String>,
}

impl CourseCatalog {
    pub fn course(mut self, course_name: impl Into<String>, capacity: u32) -> Self {
        let course_name = course_name.into();
        self.courses.push(CourseListing {
            course_id: EntityId::from_name(&course_name),
            course_name,
            capacity,
        });
        self
    }

    pub fn student(mut self, name: impl Into<String>) -> Self {
        self.students.push(name.into());
        self
    }
}

/// Project the catalog from history.
pub fn course_catalog(history: &[DomainEvent<CourseEvent>]) -> CourseCatalog {
    history
        .iter()
        .fold(CourseCatalog::default(), |catalog, event| match event.payload() {
            CourseEvent::CourseCreated(e) => catalog.course(e.course_name.clone(), e.capacity),
            CourseEvent::StudentEnrolled(e) => catalog.student(e.name.clone()),
        })
}
