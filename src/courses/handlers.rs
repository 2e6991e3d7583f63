// HTTP handlers for courses, teaching assignments, enrollments, and the
// timetable

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::auth::{Identity, Role};
use crate::courses::models::{
    AssignFacultyRequest, Course, CreateCourseRequest, CreateTimetableRequest, EnrollRequest,
    Enrollment, FacultyCourse, TimetableEntry, TimetableRow,
};
use crate::courses::repository::{
    CourseRepository, EnrollmentRepository, FacultyCourseRepository, TimetableRepository,
};
use crate::error::ApiError;
use crate::people::{require_faculty, require_student, DepartmentRepository, FacultyRepository};
use crate::AppState;

/// Create a course (admin only)
/// POST /api/admin/courses
#[utoipa::path(
    post,
    path = "/api/admin/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Duplicate code or invalid department"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_token" = [])),
    tag = "courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    identity.require(Role::Admin)?;
    request.validate()?;

    if !DepartmentRepository::new(state.db.clone())
        .exists(request.department_id)
        .await?
    {
        return Err(ApiError::InvalidReference(format!(
            "Invalid department id {}",
            request.department_id
        )));
    }

    let course = CourseRepository::new(state.db.clone())
        .create(
            &request.course_code,
            &request.course_name,
            request.credits,
            request.semester,
            request.department_id,
        )
        .await?;

    tracing::info!("Created course {} ({})", course.course_code, course.id);
    Ok((StatusCode::CREATED, Json(course)))
}

/// List all courses (any authenticated user)
/// GET /api/courses
#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "All courses", body = Vec<Course>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_token" = [])),
    tag = "courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    _identity: Identity,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = CourseRepository::new(state.db.clone()).list().await?;
    Ok(Json(courses))
}

/// List courses in a department (any authenticated user)
/// GET /api/departments/{id}/courses
pub async fn list_courses_by_department(
    State(state): State<AppState>,
    _identity: Identity,
    Path(department_id): Path<i32>,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = CourseRepository::new(state.db.clone())
        .list_by_department(department_id)
        .await?;
    Ok(Json(courses))
}

/// Assign a faculty member to a course (admin only)
/// POST /api/admin/faculty-courses
pub async fn assign_faculty_course(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<AssignFacultyRequest>,
) -> Result<(StatusCode, Json<FacultyCourse>), ApiError> {
    identity.require(Role::Admin)?;

    if !FacultyRepository::new(state.db.clone())
        .exists(request.faculty_id)
        .await?
    {
        return Err(ApiError::InvalidReference(format!(
            "Invalid faculty id {}",
            request.faculty_id
        )));
    }
    if !CourseRepository::new(state.db.clone())
        .exists(request.course_id)
        .await?
    {
        return Err(ApiError::InvalidReference(format!(
            "Invalid course id {}",
            request.course_id
        )));
    }

    let assignment = FacultyCourseRepository::new(state.db.clone())
        .assign(request.faculty_id, request.course_id)
        .await?;

    tracing::info!(
        "Assigned faculty {} to course {}",
        assignment.faculty_id,
        assignment.course_id
    );
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Enroll the authenticated student in a course
/// POST /api/student/enrollments
pub async fn enroll(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<EnrollRequest>,
) -> Result<(StatusCode, Json<Enrollment>), ApiError> {
    let user = identity.require(Role::Student)?;
    let student = require_student(&state.db, user.id).await?;

    if !CourseRepository::new(state.db.clone())
        .exists(request.course_id)
        .await?
    {
        return Err(ApiError::InvalidReference(format!(
            "Invalid course id {}",
            request.course_id
        )));
    }

    let enrollment = EnrollmentRepository::new(state.db.clone())
        .enroll(student.id, request.course_id)
        .await?;

    tracing::info!(
        "Enrolled student {} in course {}",
        enrollment.student_id,
        enrollment.course_id
    );
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Courses the authenticated student is enrolled in
/// GET /api/student/courses
pub async fn my_enrolled_courses(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Course>>, ApiError> {
    let user = identity.require(Role::Student)?;
    let student = require_student(&state.db, user.id).await?;

    let courses = EnrollmentRepository::new(state.db.clone())
        .courses_for_student(student.id)
        .await?;
    Ok(Json(courses))
}

/// Courses the authenticated faculty member teaches
/// GET /api/faculty/courses
pub async fn my_teaching_courses(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Course>>, ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;

    let courses = FacultyCourseRepository::new(state.db.clone())
        .courses_for_faculty(faculty.id)
        .await?;
    Ok(Json(courses))
}

/// Roster for a course the authenticated faculty member teaches
/// GET /api/faculty/courses/{id}/students
pub async fn course_roster(
    State(state): State<AppState>,
    identity: Identity,
    Path(course_id): Path<i32>,
) -> Result<Json<Vec<crate::people::Student>>, ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;

    if !FacultyCourseRepository::new(state.db.clone())
        .teaches(faculty.id, course_id)
        .await?
    {
        return Err(ApiError::Forbidden(
            "You are not assigned to this course".to_string(),
        ));
    }

    let students = EnrollmentRepository::new(state.db.clone())
        .students_for_course(course_id)
        .await?;
    Ok(Json(students))
}

/// Create a timetable entry (admin or faculty)
/// POST /api/timetable
pub async fn create_timetable_entry(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateTimetableRequest>,
) -> Result<(StatusCode, Json<TimetableEntry>), ApiError> {
    identity.require_any(&[Role::Admin, Role::Faculty])?;
    request.validate()?;

    if request.end_time <= request.start_time {
        return Err(ApiError::BadRequest(
            "end_time must be after start_time".to_string(),
        ));
    }
    if !CourseRepository::new(state.db.clone())
        .exists(request.course_id)
        .await?
    {
        return Err(ApiError::InvalidReference(format!(
            "Invalid course id {}",
            request.course_id
        )));
    }

    let entry = TimetableRepository::new(state.db.clone())
        .create(
            request.course_id,
            &request.day_of_week,
            request.start_time,
            request.end_time,
            &request.room,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Timetable for the authenticated student's enrolled courses
/// GET /api/student/timetable
pub async fn my_timetable(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<TimetableRow>>, ApiError> {
    let user = identity.require(Role::Student)?;
    let student = require_student(&state.db, user.id).await?;

    let rows = TimetableRepository::new(state.db.clone())
        .for_student(student.id)
        .await?;
    Ok(Json(rows))
}
