// Data models and DTOs for assignments, exams, and grades

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::courses::NextClass;

/// Assignment database model
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Assignment {
    pub id: i32,
    pub course_id: i32,
    pub faculty_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    pub course_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
}

/// A student's submission. `marks` stays NULL until the submission is graded.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssignmentSubmission {
    pub id: i32,
    pub assignment_id: i32,
    pub student_id: i32,
    pub submission_text: String,
    pub submitted_at: DateTime<Utc>,
    pub marks: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAssignmentRequest {
    pub assignment_id: i32,
    #[validate(length(min = 1))]
    pub submission_text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GradeSubmissionRequest {
    #[validate(range(min = 0))]
    pub marks: i32,
}

/// Exam database model
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Exam {
    pub id: i32,
    pub course_id: i32,
    pub faculty_id: i32,
    pub name: String,
    pub max_marks: i32,
    pub exam_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExamRequest {
    pub course_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1))]
    pub max_marks: i32,
    pub exam_date: NaiveDate,
}

/// A student's score in one exam. Unique per (exam, student).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExamMark {
    pub id: i32,
    pub exam_id: i32,
    pub student_id: i32,
    pub marks_obtained: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UploadExamMarkRequest {
    pub exam_id: i32,
    pub student_id: i32,
    #[validate(range(min = 0))]
    pub marks_obtained: i32,
}

/// A student's exam result joined with the exam it belongs to.
#[derive(Debug, Serialize, FromRow)]
pub struct ExamMarkRow {
    pub exam_id: i32,
    pub exam_name: String,
    pub max_marks: i32,
    pub exam_date: NaiveDate,
    pub marks_obtained: i32,
}

/// Final letter grade for a course. Unique per (course, student).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FinalGrade {
    pub id: i32,
    pub course_id: i32,
    pub student_id: i32,
    pub grade: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignFinalGradeRequest {
    pub course_id: i32,
    pub student_id: i32,
    #[validate(custom = "crate::validation::validate_letter_grade")]
    pub grade: String,
}

/// The student landing view.
#[derive(Debug, Serialize)]
pub struct StudentDashboard {
    pub enrolled_courses: i64,
    pub attendance_percentage: f64,
    pub pending_assignments: i64,
    pub days_to_next_exam: Option<i64>,
}

/// The faculty landing view.
#[derive(Debug, Serialize)]
pub struct FacultyDashboard {
    pub courses: i64,
    pub students: i64,
    pub pending_papers: i64,
    pub classes_today: i64,
    pub next_class: Option<NextClass>,
}

/// Enrollment count for one taught course.
#[derive(Debug, Serialize, FromRow)]
pub struct CourseEnrollmentSummary {
    pub course_id: i32,
    pub course_code: String,
    pub course_name: String,
    pub enrolled: i64,
}

/// Ungraded-submission count for one assignment.
#[derive(Debug, Serialize, FromRow)]
pub struct PaperSummary {
    pub assignment_id: i32,
    pub title: String,
    pub course_name: String,
    pub ungraded: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_request_rejects_unknown_letters() {
        let request = AssignFinalGradeRequest {
            course_id: 1,
            student_id: 1,
            grade: "Z".into(),
        };
        assert!(request.validate().is_err());

        let ok = AssignFinalGradeRequest {
            course_id: 1,
            student_id: 1,
            grade: "B+".into(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_negative_marks_are_rejected() {
        let request = GradeSubmissionRequest { marks: -5 };
        assert!(request.validate().is_err());

        let mark = UploadExamMarkRequest {
            exam_id: 1,
            student_id: 1,
            marks_obtained: -1,
        };
        assert!(mark.validate().is_err());
    }

    #[test]
    fn test_exam_request_requires_positive_max_marks() {
        let request = CreateExamRequest {
            course_id: 1,
            name: "Midterm".into(),
            max_marks: 0,
            exam_date: NaiveDate::from_ymd_opt(2026, 11, 10).unwrap(),
        };
        assert!(request.validate().is_err());
    }
}
