// HTTP handlers for attendance

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::attendance::models::{
    percentage, AttendanceOverview, AttendanceRecord, AttendanceSession, CreateSessionRequest,
    MarkAttendanceRequest,
};
use crate::attendance::repository::AttendanceRepository;
use crate::auth::{Identity, Role};
use crate::courses::repository::{EnrollmentRepository, FacultyCourseRepository};
use crate::error::ApiError;
use crate::people::{require_faculty, require_student};
use crate::AppState;

/// Open an attendance session for a course the caller teaches
/// POST /api/faculty/attendance/sessions
pub async fn create_session(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<AttendanceSession>), ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;

    if !FacultyCourseRepository::new(state.db.clone())
        .teaches(faculty.id, request.course_id)
        .await?
    {
        return Err(ApiError::Forbidden(
            "You are not assigned to this course".to_string(),
        ));
    }

    let session = AttendanceRepository::new(state.db.clone())
        .create_session(request.course_id, faculty.id, request.session_date)
        .await?;

    tracing::info!(
        "Opened attendance session {} for course {} on {}",
        session.id,
        session.course_id,
        session.session_date
    );
    Ok((StatusCode::CREATED, Json(session)))
}

/// Record a student's presence for one of the caller's sessions
/// POST /api/faculty/attendance/records
pub async fn mark_attendance(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<MarkAttendanceRequest>,
) -> Result<(StatusCode, Json<AttendanceRecord>), ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;

    let repo = AttendanceRepository::new(state.db.clone());
    // Body-supplied foreign key: an unresolvable session is a caller mistake.
    let session = repo
        .find_session(request.session_id)
        .await?
        .ok_or_else(|| {
            ApiError::InvalidReference(format!("Invalid session id {}", request.session_id))
        })?;

    if session.faculty_id != faculty.id {
        return Err(ApiError::Forbidden(
            "This attendance session belongs to another faculty member".to_string(),
        ));
    }

    // Marking a student who is not registered for the course is a caller
    // mistake, not a missing resource.
    if !EnrollmentRepository::new(state.db.clone())
        .is_enrolled(request.student_id, session.course_id)
        .await?
    {
        return Err(ApiError::InvalidReference(format!(
            "Student {} is not enrolled in course {}",
            request.student_id, session.course_id
        )));
    }

    let record = repo
        .mark(request.session_id, request.student_id, request.present)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Overall attendance percentage for the authenticated student
/// GET /api/student/attendance
pub async fn my_attendance(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<AttendanceOverview>, ApiError> {
    let user = identity.require(Role::Student)?;
    let student = require_student(&state.db, user.id).await?;

    let (attended, total) = AttendanceRepository::new(state.db.clone())
        .overall_counts(student.id)
        .await?;

    Ok(Json(AttendanceOverview {
        attended,
        total,
        percentage: percentage(attended, total),
    }))
}

#[derive(Debug, Serialize)]
pub struct CourseAttendanceRow {
    pub course_id: i32,
    pub subject: String,
    pub attended: i64,
    pub total: i64,
    pub percentage: f64,
}

/// Per-course attendance summary for the authenticated student
/// GET /api/student/attendance/summary
pub async fn my_attendance_summary(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<CourseAttendanceRow>>, ApiError> {
    let user = identity.require(Role::Student)?;
    let student = require_student(&state.db, user.id).await?;

    let rows = AttendanceRepository::new(state.db.clone())
        .per_course_counts(student.id)
        .await?
        .into_iter()
        .map(|s| CourseAttendanceRow {
            percentage: percentage(s.attended, s.total),
            course_id: s.course_id,
            subject: s.subject,
            attended: s.attended,
            total: s.total,
        })
        .collect();

    Ok(Json(rows))
}
