// Data models and DTOs for attendance tracking

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One class meeting held by a faculty member for a course on a date.
/// Unique per (course, faculty, date).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendanceSession {
    pub id: i32,
    pub course_id: i32,
    pub faculty_id: i32,
    pub session_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub course_id: i32,
    pub session_date: NaiveDate,
}

/// A student's presence for one session. Unique per (session, student).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttendanceRecord {
    pub id: i32,
    pub session_id: i32,
    pub student_id: i32,
    pub present: bool,
}

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceRequest {
    pub session_id: i32,
    pub student_id: i32,
    pub present: bool,
}

/// Overall attendance across all of a student's courses.
#[derive(Debug, Serialize)]
pub struct AttendanceOverview {
    pub attended: i64,
    pub total: i64,
    pub percentage: f64,
}

/// Per-course attendance counts for a student.
#[derive(Debug, Serialize, FromRow)]
pub struct CourseAttendanceSummary {
    pub course_id: i32,
    pub subject: String,
    pub attended: i64,
    pub total: i64,
}

/// Compute a percentage, treating no recorded sessions as 0 rather than NaN.
pub fn percentage(attended: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (attended as f64 / total as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_with_no_sessions_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn test_percentage_is_out_of_hundred() {
        assert_eq!(percentage(3, 4), 75.0);
        assert_eq!(percentage(4, 4), 100.0);
    }
}
