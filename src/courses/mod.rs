// Courses, faculty-course assignments, enrollments, and the timetable.

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{Course, Enrollment, FacultyCourse, TimetableEntry, TimetableRow};
pub use repository::{
    CourseRepository, EnrollmentRepository, FacultyCourseRepository, NextClass,
    TimetableRepository,
};
