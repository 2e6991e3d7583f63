// Assignments, exams, final grades, and the role dashboards.

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{Assignment, AssignmentSubmission, Exam, ExamMark, FinalGrade};
pub use repository::{AssignmentRepository, ExamRepository, FacultyStatsRepository, GradeRepository};
