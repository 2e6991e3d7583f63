// Data models and DTOs for courses, teaching assignments, enrollments, and
// the timetable

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Course database model
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Course {
    pub id: i32,
    #[schema(example = "CS101")]
    pub course_code: String,
    #[schema(example = "Data Structures")]
    pub course_name: String,
    pub credits: i32,
    pub semester: i32,
    pub department_id: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseRequest {
    #[validate(custom = "crate::validation::validate_code")]
    #[schema(example = "CS101")]
    pub course_code: String,
    #[validate(length(min = 1, max = 100))]
    pub course_name: String,
    #[validate(range(min = 1, max = 10))]
    pub credits: i32,
    #[validate(range(min = 1, max = 12))]
    pub semester: i32,
    pub department_id: i32,
}

/// A faculty member teaches a course; unique per (faculty, course).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FacultyCourse {
    pub id: i32,
    pub faculty_id: i32,
    pub course_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct AssignFacultyRequest {
    pub faculty_id: i32,
    pub course_id: i32,
}

/// A student is registered for a course; unique per (student, course).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Enrollment {
    pub id: i32,
    pub student_id: i32,
    pub course_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub course_id: i32,
}

/// Timetable database model
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TimetableEntry {
    pub id: i32,
    pub course_id: i32,
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTimetableRequest {
    pub course_id: i32,
    #[validate(custom = "crate::validation::validate_day_of_week")]
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(length(min = 1, max = 32))]
    pub room: String,
}

/// A student's timetable row joined with course and faculty names. The
/// faculty is optional: a course may not have a teaching assignment yet.
#[derive(Debug, Serialize, FromRow)]
pub struct TimetableRow {
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: String,
    pub subject: String,
    pub faculty: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_course_request_validation() {
        let ok = CreateCourseRequest {
            course_code: "CS101".into(),
            course_name: "Data Structures".into(),
            credits: 4,
            semester: 3,
            department_id: 1,
        };
        assert!(ok.validate().is_ok());

        let bad_code = CreateCourseRequest {
            course_code: "cs-101".into(),
            ..ok_clone()
        };
        assert!(bad_code.validate().is_err());

        let bad_semester = CreateCourseRequest {
            semester: 0,
            ..ok_clone()
        };
        assert!(bad_semester.validate().is_err());
    }

    fn ok_clone() -> CreateCourseRequest {
        CreateCourseRequest {
            course_code: "CS101".into(),
            course_name: "Data Structures".into(),
            credits: 4,
            semester: 3,
            department_id: 1,
        }
    }

    #[test]
    fn test_timetable_request_day_validation() {
        let request = CreateTimetableRequest {
            course_id: 1,
            day_of_week: "Blursday".into(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            room: "B204".into(),
        };
        assert!(request.validate().is_err());
    }
}
