// HTTP handlers for assignments, exams, grades, and the dashboards

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use validator::Validate;

use crate::attendance::models::percentage;
use crate::attendance::AttendanceRepository;
use crate::auth::{Identity, Role};
use crate::courses::repository::{
    EnrollmentRepository, FacultyCourseRepository, TimetableRepository,
};
use crate::coursework::models::{
    AssignFinalGradeRequest, Assignment, AssignmentSubmission, CourseEnrollmentSummary,
    CreateAssignmentRequest, CreateExamRequest, Exam, ExamMark, ExamMarkRow, FacultyDashboard,
    FinalGrade, GradeSubmissionRequest, PaperSummary, StudentDashboard, SubmitAssignmentRequest,
    UploadExamMarkRequest,
};
use crate::coursework::repository::{
    AssignmentRepository, ExamRepository, FacultyStatsRepository, GradeRepository,
};
use crate::error::ApiError;
use crate::people::{require_faculty, require_student, Faculty};
use crate::AppState;

async fn require_teaches(
    state: &AppState,
    faculty: &Faculty,
    course_id: i32,
) -> Result<(), ApiError> {
    if FacultyCourseRepository::new(state.db.clone())
        .teaches(faculty.id, course_id)
        .await?
    {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You are not assigned to this course".to_string(),
        ))
    }
}

async fn require_enrolled(
    state: &AppState,
    student_id: i32,
    course_id: i32,
) -> Result<(), ApiError> {
    if EnrollmentRepository::new(state.db.clone())
        .is_enrolled(student_id, course_id)
        .await?
    {
        Ok(())
    } else {
        Err(ApiError::InvalidReference(format!(
            "Student {} is not enrolled in course {}",
            student_id, course_id
        )))
    }
}

/// Create an assignment for a taught course
/// POST /api/faculty/assignments
pub async fn create_assignment(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<Assignment>), ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;
    request.validate()?;
    require_teaches(&state, &faculty, request.course_id).await?;

    let assignment = AssignmentRepository::new(state.db.clone())
        .create(
            request.course_id,
            faculty.id,
            &request.title,
            request.description.as_deref(),
            request.due_date,
        )
        .await?;

    tracing::info!(
        "Created assignment {} for course {}",
        assignment.id,
        assignment.course_id
    );
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Assignments for an enrolled course
/// GET /api/student/courses/{id}/assignments
pub async fn course_assignments(
    State(state): State<AppState>,
    identity: Identity,
    Path(course_id): Path<i32>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    let user = identity.require(Role::Student)?;
    let student = require_student(&state.db, user.id).await?;

    if !EnrollmentRepository::new(state.db.clone())
        .is_enrolled(student.id, course_id)
        .await?
    {
        return Err(ApiError::Forbidden(
            "You are not enrolled in this course".to_string(),
        ));
    }

    let assignments = AssignmentRepository::new(state.db.clone())
        .list_for_course(course_id)
        .await?;
    Ok(Json(assignments))
}

/// Submit work for an assignment
/// POST /api/student/submissions
pub async fn submit_assignment(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<SubmitAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentSubmission>), ApiError> {
    let user = identity.require(Role::Student)?;
    let student = require_student(&state.db, user.id).await?;
    request.validate()?;

    let repo = AssignmentRepository::new(state.db.clone());
    let assignment = repo
        .find_by_id(request.assignment_id)
        .await?
        .ok_or_else(|| {
            ApiError::InvalidReference(format!("Invalid assignment id {}", request.assignment_id))
        })?;

    require_enrolled(&state, student.id, assignment.course_id).await?;

    let submission = repo
        .submit(request.assignment_id, student.id, &request.submission_text)
        .await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// Submissions for an assignment the caller authored a course for
/// GET /api/faculty/assignments/{id}/submissions
pub async fn assignment_submissions(
    State(state): State<AppState>,
    identity: Identity,
    Path(assignment_id): Path<i32>,
) -> Result<Json<Vec<AssignmentSubmission>>, ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;

    let repo = AssignmentRepository::new(state.db.clone());
    let assignment = repo
        .find_by_id(assignment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Assignment", assignment_id))?;

    require_teaches(&state, &faculty, assignment.course_id).await?;

    let submissions = repo.submissions_for_assignment(assignment_id).await?;
    Ok(Json(submissions))
}

/// Grade a submission
/// PUT /api/faculty/submissions/{id}/grade
pub async fn grade_submission(
    State(state): State<AppState>,
    identity: Identity,
    Path(submission_id): Path<i32>,
    Json(request): Json<GradeSubmissionRequest>,
) -> Result<Json<AssignmentSubmission>, ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;
    request.validate()?;

    let repo = AssignmentRepository::new(state.db.clone());
    let submission = repo
        .find_submission(submission_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Submission", submission_id))?;
    let assignment = repo
        .find_by_id(submission.assignment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Assignment", submission.assignment_id))?;

    require_teaches(&state, &faculty, assignment.course_id).await?;

    let graded = repo.grade(submission_id, request.marks).await?;
    tracing::info!("Graded submission {} with {} marks", graded.id, request.marks);
    Ok(Json(graded))
}

/// Schedule an exam for a taught course
/// POST /api/faculty/exams
pub async fn create_exam(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateExamRequest>,
) -> Result<(StatusCode, Json<Exam>), ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;
    request.validate()?;
    require_teaches(&state, &faculty, request.course_id).await?;

    let exam = ExamRepository::new(state.db.clone())
        .create(
            request.course_id,
            faculty.id,
            &request.name,
            request.max_marks,
            request.exam_date,
        )
        .await?;

    tracing::info!("Scheduled exam {} for course {}", exam.id, exam.course_id);
    Ok((StatusCode::CREATED, Json(exam)))
}

/// Upload a student's exam mark
/// POST /api/faculty/exam-marks
pub async fn upload_exam_mark(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<UploadExamMarkRequest>,
) -> Result<(StatusCode, Json<ExamMark>), ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;
    request.validate()?;

    let repo = ExamRepository::new(state.db.clone());
    let exam = repo.find_by_id(request.exam_id).await?.ok_or_else(|| {
        ApiError::InvalidReference(format!("Invalid exam id {}", request.exam_id))
    })?;

    require_teaches(&state, &faculty, exam.course_id).await?;
    require_enrolled(&state, request.student_id, exam.course_id).await?;

    if request.marks_obtained > exam.max_marks {
        return Err(ApiError::BadRequest(format!(
            "marks_obtained {} exceeds the exam maximum of {}",
            request.marks_obtained, exam.max_marks
        )));
    }

    let mark = repo
        .upload_mark(request.exam_id, request.student_id, request.marks_obtained)
        .await?;

    Ok((StatusCode::CREATED, Json(mark)))
}

/// Assign a final letter grade
/// POST /api/faculty/final-grades
pub async fn assign_final_grade(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<AssignFinalGradeRequest>,
) -> Result<(StatusCode, Json<FinalGrade>), ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;
    request.validate()?;

    require_teaches(&state, &faculty, request.course_id).await?;
    require_enrolled(&state, request.student_id, request.course_id).await?;

    let grade = GradeRepository::new(state.db.clone())
        .assign(request.course_id, request.student_id, &request.grade)
        .await?;

    tracing::info!(
        "Assigned grade {} to student {} in course {}",
        grade.grade,
        grade.student_id,
        grade.course_id
    );
    Ok((StatusCode::CREATED, Json(grade)))
}

/// Own exam results in one course
/// GET /api/student/courses/{id}/exam-marks
pub async fn my_exam_marks(
    State(state): State<AppState>,
    identity: Identity,
    Path(course_id): Path<i32>,
) -> Result<Json<Vec<ExamMarkRow>>, ApiError> {
    let user = identity.require(Role::Student)?;
    let student = require_student(&state.db, user.id).await?;

    let marks = ExamRepository::new(state.db.clone())
        .marks_for_student_course(student.id, course_id)
        .await?;
    Ok(Json(marks))
}

/// Own final grade in one course; 404 until assigned
/// GET /api/student/courses/{id}/final-grade
pub async fn my_final_grade(
    State(state): State<AppState>,
    identity: Identity,
    Path(course_id): Path<i32>,
) -> Result<Json<FinalGrade>, ApiError> {
    let user = identity.require(Role::Student)?;
    let student = require_student(&state.db, user.id).await?;

    let grade = GradeRepository::new(state.db.clone())
        .find(course_id, student.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Final grade for course", course_id))?;
    Ok(Json(grade))
}

/// Student landing view
/// GET /api/student/dashboard
pub async fn student_dashboard(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<StudentDashboard>, ApiError> {
    let user = identity.require(Role::Student)?;
    let student = require_student(&state.db, user.id).await?;

    let enrolled_courses = EnrollmentRepository::new(state.db.clone())
        .count_for_student(student.id)
        .await?;
    let (attended, total) = AttendanceRepository::new(state.db.clone())
        .overall_counts(student.id)
        .await?;
    let pending_assignments = AssignmentRepository::new(state.db.clone())
        .pending_count_for_student(student.id)
        .await?;

    let today = Local::now().date_naive();
    let days_to_next_exam = ExamRepository::new(state.db.clone())
        .next_exam_date(student.id, today)
        .await?
        .map(|date| (date - today).num_days());

    Ok(Json(StudentDashboard {
        enrolled_courses,
        attendance_percentage: percentage(attended, total),
        pending_assignments,
        days_to_next_exam,
    }))
}

/// Faculty landing view
/// GET /api/faculty/dashboard
pub async fn faculty_dashboard(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<FacultyDashboard>, ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;

    let stats = FacultyStatsRepository::new(state.db.clone());
    let courses = stats.course_count(faculty.id).await?;
    let students = stats.student_count(faculty.id).await?;
    let pending_papers = AssignmentRepository::new(state.db.clone())
        .ungraded_count_for_faculty(faculty.id)
        .await?;

    let now = Local::now();
    let day = now.format("%A").to_string();
    let timetable = TimetableRepository::new(state.db.clone());
    let classes_today = timetable.classes_on_day(faculty.id, &day).await?;
    let next_class = timetable.next_class(faculty.id, &day, now.time()).await?;

    Ok(Json(FacultyDashboard {
        courses,
        students,
        pending_papers,
        classes_today,
        next_class,
    }))
}

/// Enrollment counts per taught course
/// GET /api/faculty/students-summary
pub async fn students_summary(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<CourseEnrollmentSummary>>, ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;

    let rows = FacultyStatsRepository::new(state.db.clone())
        .students_summary(faculty.id)
        .await?;
    Ok(Json(rows))
}

/// Ungraded-submission counts per assignment
/// GET /api/faculty/papers-summary
pub async fn papers_summary(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<PaperSummary>>, ApiError> {
    let user = identity.require(Role::Faculty)?;
    let faculty = require_faculty(&state.db, user.id).await?;

    let rows = AssignmentRepository::new(state.db.clone())
        .papers_summary(faculty.id)
        .await?;
    Ok(Json(rows))
}
