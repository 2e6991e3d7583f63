// Departments and student/faculty profiles.
// Profile rows own the link to their user account; User + profile are
// created and deleted together.

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{Department, Faculty, ProfileResponse, Student};
pub use repository::{
    require_faculty, require_student, DepartmentRepository, FacultyRepository, StudentRepository,
};
