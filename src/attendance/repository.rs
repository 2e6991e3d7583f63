// Database repository for attendance sessions and records

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::attendance::models::{AttendanceRecord, AttendanceSession, CourseAttendanceSummary};
use crate::error::ApiError;

pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_session(
        &self,
        course_id: i32,
        faculty_id: i32,
        session_date: NaiveDate,
    ) -> Result<AttendanceSession, ApiError> {
        sqlx::query_as::<_, AttendanceSession>(
            "INSERT INTO attendance_sessions (course_id, faculty_id, session_date)
             VALUES ($1, $2, $3)
             RETURNING id, course_id, faculty_id, session_date",
        )
        .bind(course_id)
        .bind(faculty_id)
        .bind(session_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            ApiError::from_db(
                e,
                "An attendance session for this course and date already exists",
            )
        })
    }

    pub async fn find_session(&self, id: i32) -> Result<Option<AttendanceSession>, ApiError> {
        let session = sqlx::query_as::<_, AttendanceSession>(
            "SELECT id, course_id, faculty_id, session_date
             FROM attendance_sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn mark(
        &self,
        session_id: i32,
        student_id: i32,
        present: bool,
    ) -> Result<AttendanceRecord, ApiError> {
        sqlx::query_as::<_, AttendanceRecord>(
            "INSERT INTO attendance_records (session_id, student_id, present)
             VALUES ($1, $2, $3)
             RETURNING id, session_id, student_id, present",
        )
        .bind(session_id)
        .bind(student_id)
        .bind(present)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            ApiError::from_db(e, "Attendance is already recorded for this student and session")
        })
    }

    /// Attended and total record counts across all of a student's courses.
    pub async fn overall_counts(&self, student_id: i32) -> Result<(i64, i64), ApiError> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE present), COUNT(*)
             FROM attendance_records
             WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Per-course attended/total counts for a student. Courses with no
    /// recorded attendance yet still appear with zero counts.
    pub async fn per_course_counts(
        &self,
        student_id: i32,
    ) -> Result<Vec<CourseAttendanceSummary>, ApiError> {
        let rows = sqlx::query_as::<_, CourseAttendanceSummary>(
            "SELECT c.id AS course_id, c.course_name AS subject,
                    COUNT(ar.id) FILTER (WHERE ar.present) AS attended,
                    COUNT(ar.id) AS total
             FROM courses c
             JOIN enrollments e ON e.course_id = c.id
             LEFT JOIN attendance_sessions ats ON ats.course_id = c.id
             LEFT JOIN attendance_records ar
                 ON ar.session_id = ats.id AND ar.student_id = e.student_id
             WHERE e.student_id = $1
             GROUP BY c.id, c.course_name
             ORDER BY c.course_name",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
