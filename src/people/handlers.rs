// HTTP handlers for departments and student/faculty profiles

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rand::{distributions::Alphanumeric, Rng};
use validator::Validate;

use crate::auth::{Identity, Role};
use crate::auth::password::PasswordService;
use crate::error::ApiError;
use crate::people::models::{
    CreateDepartmentRequest, CreateFacultyRequest, CreateStudentRequest, CreatedFacultyResponse,
    CreatedStudentResponse, Department, Faculty, ListStudentsQuery, ProfileResponse, Student,
    UpdateFacultyRequest, UpdateStudentRequest,
};
use crate::people::repository::{DepartmentRepository, FacultyRepository, StudentRepository};
use crate::AppState;

const TEMP_PASSWORD_LEN: usize = 12;

/// Generate the temporary password for an admin-created account.
fn generate_temp_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

/// Create a department (admin only)
/// POST /api/admin/departments
#[utoipa::path(
    post,
    path = "/api/admin/departments",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Duplicate code or invalid input"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_token" = [])),
    tag = "departments"
)]
pub async fn create_department(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateDepartmentRequest>,
) -> Result<(StatusCode, Json<Department>), ApiError> {
    identity.require(Role::Admin)?;
    request.validate()?;

    let department = DepartmentRepository::new(state.db.clone())
        .create(&request.code, &request.name)
        .await?;

    tracing::info!("Created department {} ({})", department.code, department.id);
    Ok((StatusCode::CREATED, Json(department)))
}

/// List all departments (any authenticated user)
/// GET /api/departments
#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "All departments", body = Vec<Department>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_token" = [])),
    tag = "departments"
)]
pub async fn list_departments(
    State(state): State<AppState>,
    _identity: Identity,
) -> Result<Json<Vec<Department>>, ApiError> {
    let departments = DepartmentRepository::new(state.db.clone()).list().await?;
    Ok(Json(departments))
}

/// Create a student profile together with its user account (admin only)
/// POST /api/admin/students
pub async fn create_student(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<CreatedStudentResponse>), ApiError> {
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

    let temporary_password = generate_temp_password();
    let password_hash = PasswordService::hash_password(&temporary_password)
        .map_err(|_| ApiError::Internal("password hashing failed".to_string()))?;

    let student = StudentRepository::new(state.db.clone())
        .create_with_user(
            &request.name,
            &request.reg_no,
            request.department_id,
            &request.email,
            &password_hash,
        )
        .await?;

    tracing::info!("Created student {} (reg_no {})", student.id, student.reg_no);
    Ok((
        StatusCode::CREATED,
        Json(CreatedStudentResponse {
            student,
            email: request.email,
            temporary_password,
        }),
    ))
}

/// Update a student profile (admin only)
/// PUT /api/admin/students/{id}
pub async fn update_student(
    State(state): State<AppState>,
    identity: Identity,
    Path(student_id): Path<i32>,
    Json(request): Json<UpdateStudentRequest>,
) -> Result<Json<Student>, ApiError> {
    identity.require(Role::Admin)?;
    request.validate()?;

    if let Some(department_id) = request.department_id {
        if !DepartmentRepository::new(state.db.clone())
            .exists(department_id)
            .await?
        {
            return Err(ApiError::InvalidReference(format!(
                "Invalid department id {}",
                department_id
            )));
        }
    }

    let student = StudentRepository::new(state.db.clone())
        .update(
            student_id,
            request.name.as_deref(),
            request.reg_no.as_deref(),
            request.department_id,
        )
        .await?;

    Ok(Json(student))
}

/// Delete a student and its linked user account (admin only)
/// DELETE /api/admin/students/{id}
pub async fn delete_student(
    State(state): State<AppState>,
    identity: Identity,
    Path(student_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    identity.require(Role::Admin)?;

    StudentRepository::new(state.db.clone())
        .delete_with_user(student_id)
        .await?;

    tracing::info!("Deleted student {} and linked user", student_id);
    Ok(StatusCode::NO_CONTENT)
}

/// List students with optional department filter (admin or faculty)
/// GET /api/students
pub async fn list_students(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ListStudentsQuery>,
) -> Result<Json<Vec<Student>>, ApiError> {
    identity.require_any(&[Role::Admin, Role::Faculty])?;

    let (limit, offset) = query.pagination();
    let students = StudentRepository::new(state.db.clone())
        .list(query.department_id, limit, offset)
        .await?;

    Ok(Json(students))
}

/// Own student profile with department name
/// GET /api/student/me
pub async fn my_student_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = identity.require(Role::Student)?;

    let profile = StudentRepository::new(state.db.clone())
        .profile_by_user_id(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student profile for user", user.id))?;

    Ok(Json(profile))
}

/// Create a faculty profile together with its user account (admin only)
/// POST /api/admin/faculty
pub async fn create_faculty(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateFacultyRequest>,
) -> Result<(StatusCode, Json<CreatedFacultyResponse>), ApiError> {
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

    let temporary_password = generate_temp_password();
    let password_hash = PasswordService::hash_password(&temporary_password)
        .map_err(|_| ApiError::Internal("password hashing failed".to_string()))?;

    let faculty = FacultyRepository::new(state.db.clone())
        .create_with_user(
            &request.name,
            &request.employee_id,
            request.department_id,
            &request.email,
            &password_hash,
        )
        .await?;

    tracing::info!(
        "Created faculty {} (employee_id {})",
        faculty.id,
        faculty.employee_id
    );
    Ok((
        StatusCode::CREATED,
        Json(CreatedFacultyResponse {
            faculty,
            email: request.email,
            temporary_password,
        }),
    ))
}

/// Update a faculty profile (admin only)
/// PUT /api/admin/faculty/{id}
pub async fn update_faculty(
    State(state): State<AppState>,
    identity: Identity,
    Path(faculty_id): Path<i32>,
    Json(request): Json<UpdateFacultyRequest>,
) -> Result<Json<Faculty>, ApiError> {
    identity.require(Role::Admin)?;
    request.validate()?;

    if let Some(department_id) = request.department_id {
        if !DepartmentRepository::new(state.db.clone())
            .exists(department_id)
            .await?
        {
            return Err(ApiError::InvalidReference(format!(
                "Invalid department id {}",
                department_id
            )));
        }
    }

    let faculty = FacultyRepository::new(state.db.clone())
        .update(
            faculty_id,
            request.name.as_deref(),
            request.employee_id.as_deref(),
            request.department_id,
        )
        .await?;

    Ok(Json(faculty))
}

/// Delete a faculty member and its linked user account (admin only)
/// DELETE /api/admin/faculty/{id}
pub async fn delete_faculty(
    State(state): State<AppState>,
    identity: Identity,
    Path(faculty_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    identity.require(Role::Admin)?;

    FacultyRepository::new(state.db.clone())
        .delete_with_user(faculty_id)
        .await?;

    tracing::info!("Deleted faculty {} and linked user", faculty_id);
    Ok(StatusCode::NO_CONTENT)
}

/// List all faculty (admin only)
/// GET /api/faculty
pub async fn list_faculty(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<Faculty>>, ApiError> {
    identity.require(Role::Admin)?;

    let faculty = FacultyRepository::new(state.db.clone()).list().await?;
    Ok(Json(faculty))
}

/// Own faculty profile with department name
/// GET /api/faculty/me
pub async fn my_faculty_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = identity.require(Role::Faculty)?;

    let profile = FacultyRepository::new(state.db.clone())
        .profile_by_user_id(user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Faculty profile for user", user.id))?;

    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_password_shape() {
        let password = generate_temp_password();
        assert_eq!(password.len(), TEMP_PASSWORD_LEN);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_temp_passwords_are_random() {
        assert_ne!(generate_temp_password(), generate_temp_password());
    }
}
