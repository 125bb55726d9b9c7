//! Registered slices of the course domain.

use slicecheck_harness::{Slice, SliceRegistry, Timeline};

use crate::catalog::{CourseCatalog, course_catalog};
use crate::command::{CourseCommand, decide};
use crate::course::{CreateCourse, DUPLICATE_COURSE, create_course};
use crate::enrollment::{DUPLICATE_STUDENT, EnrollStudent, enroll_student};
use crate::event::{CourseEvent, course_created, student_enrolled};

/// All course-domain slices, in replay order.
pub fn registry() -> SliceRegistry {
    SliceRegistry::new()
        .register(create_course_slice())
        .register(enroll_student_slice())
        .register(course_catalog_slice())
}

pub fn create_course_slice() -> Slice<CourseEvent, CreateCourse, ()> {
    let english = || CreateCourse::new("English 101", 33);

    Slice::command("create_course", create_course)
        .timeline(
            Timeline::new("Happy path").expect_event(english(), course_created("English 101", 33)),
        )
        .timeline(
            Timeline::new("Duplicate course name is rejected")
                .expect_event(english(), course_created("English 101", 33))
                .expect_error(english(), DUPLICATE_COURSE),
        )
        .timeline(
            Timeline::new("Distinct names coexist")
                .expect_event(english(), course_created("English 101", 33))
                .expect_event(
                    CreateCourse::new("Math 201", 20),
                    course_created("Math 201", 20),
                ),
        )
        .timeline(
            Timeline::new("Empty name is rejected")
                .expect_error(CreateCourse::new("", 10), "Course name cannot be empty"),
        )
}

pub fn enroll_student_slice() -> Slice<CourseEvent, EnrollStudent, ()> {
    let bob = || EnrollStudent::new("Bob Marley");

    Slice::command("enroll_student", enroll_student)
        .timeline(Timeline::new("Happy path").expect_event(bob(), student_enrolled("Bob Marley")))
        .timeline(
            Timeline::new("Student cannot enroll twice")
                .expect_event(bob(), student_enrolled("Bob Marley"))
                .expect_error(bob(), DUPLICATE_STUDENT),
        )
}

pub fn course_catalog_slice() -> Slice<CourseEvent, CourseCommand, CourseCatalog> {
    Slice::command_and_view("course_catalog", decide, course_catalog)
        .timeline(Timeline::new("Empty catalog").expect_state(CourseCatalog::default()))
        .timeline(
            Timeline::new("Courses and students in history order")
                .expect_event(
                    CreateCourse::new("English 101", 33).into(),
                    course_created("English 101", 33),
                )
                .expect_event(
                    EnrollStudent::new("Bob Marley").into(),
                    student_enrolled("Bob Marley"),
                )
                .expect_event(
                    CreateCourse::new("Math 201", 20).into(),
                    course_created("Math 201", 20),
                )
                .expect_state(
                    CourseCatalog::default()
                        .course("English 101", 33)
                        .course("Math 201", 20)
                        .student("Bob Marley"),
                ),
        )
        .timeline(
            Timeline::new("Rejected commands leave the catalog unchanged")
                .expect_event(
                    CreateCourse::new("English 101", 33).into(),
                    course_created("English 101", 33),
                )
                .expect_error(CreateCourse::new("English 101", 40).into(), DUPLICATE_COURSE)
                .expect_state(CourseCatalog::default().course("English 101", 33)),
        )
}
