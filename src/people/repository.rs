// Database repositories for departments, students, and faculty.
//
// Paired lifecycles (User + profile) run in a single transaction: both rows
// commit together or neither does.

use sqlx::PgPool;

use crate::auth::models::Role;
use crate::auth::repository::UserRepository;
use crate::error::ApiError;
use crate::people::models::{Department, Faculty, ProfileResponse, Student};

/// Resolve the student profile owned by an authenticated user, or fail with
/// NotFound. Role-checked handlers call this right after the guard.
pub async fn require_student(pool: &PgPool, user_id: i32) -> Result<Student, ApiError> {
    StudentRepository::new(pool.clone())
        .find_by_user_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student profile for user", user_id))
}

/// Resolve the faculty profile owned by an authenticated user.
pub async fn require_faculty(pool: &PgPool, user_id: i32) -> Result<Faculty, ApiError> {
    FacultyRepository::new(pool.clone())
        .find_by_user_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Faculty profile for user", user_id))
}

pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, code: &str, name: &str) -> Result<Department, ApiError> {
        sqlx::query_as::<_, Department>(
            "INSERT INTO departments (code, name) VALUES ($1, $2) RETURNING id, code, name",
        )
        .bind(code)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::from_db(e, &format!("Department with code '{}' already exists", code)))
    }

    pub async fn list(&self) -> Result<Vec<Department>, ApiError> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT id, code, name FROM departments ORDER BY code")
                .fetch_all(&self.pool)
                .await?;
        Ok(departments)
    }

    pub async fn exists(&self, id: i32) -> Result<bool, ApiError> {
        let exists: Option<bool> =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists.unwrap_or(false))
    }
}

pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the User account and Student profile atomically.
    pub async fn create_with_user(
        &self,
        name: &str,
        reg_no: &str,
        department_id: i32,
        email: &str,
        password_hash: &str,
    ) -> Result<Student, ApiError> {
        let mut tx = self.pool.begin().await?;

        let user = UserRepository::insert_in_tx(&mut tx, email, password_hash, Role::Student)
            .await
            .map_err(|e| ApiError::from_db(e, &format!("Email '{}' is already registered", email)))?;

        let student = sqlx::query_as::<_, Student>(
            "INSERT INTO students (name, reg_no, department_id, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, reg_no, department_id, user_id",
        )
        .bind(name)
        .bind(reg_no)
        .bind(department_id)
        .bind(user.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            ApiError::from_db(e, &format!("Student with reg_no '{}' already exists", reg_no))
        })?;

        tx.commit().await?;
        Ok(student)
    }

    /// Delete the Student profile and its linked User atomically.
    pub async fn delete_with_user(&self, student_id: i32) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<i32> =
            sqlx::query_scalar("DELETE FROM students WHERE id = $1 RETURNING user_id")
                .bind(student_id)
                .fetch_optional(&mut *tx)
                .await?;

        let user_id = user_id.ok_or_else(|| ApiError::not_found("Student", student_id))?;
        UserRepository::delete_in_tx(&mut tx, user_id).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn update(
        &self,
        student_id: i32,
        name: Option<&str>,
        reg_no: Option<&str>,
        department_id: Option<i32>,
    ) -> Result<Student, ApiError> {
        sqlx::query_as::<_, Student>(
            "UPDATE students
             SET name = COALESCE($1, name),
                 reg_no = COALESCE($2, reg_no),
                 department_id = COALESCE($3, department_id)
             WHERE id = $4
             RETURNING id, name, reg_no, department_id, user_id",
        )
        .bind(name)
        .bind(reg_no)
        .bind(department_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            ApiError::from_db(
                e,
                &format!("Student with reg_no '{}' already exists", reg_no.unwrap_or("")),
            )
        })?
        .ok_or_else(|| ApiError::not_found("Student", student_id))
    }

    /// Resolve the profile owned by a user account.
    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Student>, ApiError> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT id, name, reg_no, department_id, user_id FROM students WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(student)
    }

    /// Profile view with department name and account email.
    pub async fn profile_by_user_id(&self, user_id: i32) -> Result<Option<ProfileResponse>, ApiError> {
        let profile = sqlx::query_as::<_, ProfileResponse>(
            "SELECT s.id, s.name, d.name AS department, u.email
             FROM students s
             JOIN departments d ON d.id = s.department_id
             JOIN users u ON u.id = s.user_id
             WHERE s.user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn list(
        &self,
        department_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Student>, ApiError> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT id, name, reg_no, department_id, user_id
             FROM students
             WHERE ($1::int IS NULL OR department_id = $1)
             ORDER BY reg_no
             LIMIT $2 OFFSET $3",
        )
        .bind(department_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }
}

pub struct FacultyRepository {
    pool: PgPool,
}

impl FacultyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the User account and Faculty profile atomically.
    pub async fn create_with_user(
        &self,
        name: &str,
        employee_id: &str,
        department_id: i32,
        email: &str,
        password_hash: &str,
    ) -> Result<Faculty, ApiError> {
        let mut tx = self.pool.begin().await?;

        let user = UserRepository::insert_in_tx(&mut tx, email, password_hash, Role::Faculty)
            .await
            .map_err(|e| ApiError::from_db(e, &format!("Email '{}' is already registered", email)))?;

        let faculty = sqlx::query_as::<_, Faculty>(
            "INSERT INTO faculty (name, employee_id, department_id, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, employee_id, department_id, user_id",
        )
        .bind(name)
        .bind(employee_id)
        .bind(department_id)
        .bind(user.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            ApiError::from_db(
                e,
                &format!("Faculty with employee_id '{}' already exists", employee_id),
            )
        })?;

        tx.commit().await?;
        Ok(faculty)
    }

    /// Delete the Faculty profile and its linked User atomically.
    pub async fn delete_with_user(&self, faculty_id: i32) -> Result<(), ApiError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Option<i32> =
            sqlx::query_scalar("DELETE FROM faculty WHERE id = $1 RETURNING user_id")
                .bind(faculty_id)
                .fetch_optional(&mut *tx)
                .await?;

        let user_id = user_id.ok_or_else(|| ApiError::not_found("Faculty", faculty_id))?;
        UserRepository::delete_in_tx(&mut tx, user_id).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn update(
        &self,
        faculty_id: i32,
        name: Option<&str>,
        employee_id: Option<&str>,
        department_id: Option<i32>,
    ) -> Result<Faculty, ApiError> {
        sqlx::query_as::<_, Faculty>(
            "UPDATE faculty
             SET name = COALESCE($1, name),
                 employee_id = COALESCE($2, employee_id),
                 department_id = COALESCE($3, department_id)
             WHERE id = $4
             RETURNING id, name, employee_id, department_id, user_id",
        )
        .bind(name)
        .bind(employee_id)
        .bind(department_id)
        .bind(faculty_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            ApiError::from_db(
                e,
                &format!(
                    "Faculty with employee_id '{}' already exists",
                    employee_id.unwrap_or("")
                ),
            )
        })?
        .ok_or_else(|| ApiError::not_found("Faculty", faculty_id))
    }

    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Faculty>, ApiError> {
        let faculty = sqlx::query_as::<_, Faculty>(
            "SELECT id, name, employee_id, department_id, user_id FROM faculty WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(faculty)
    }

    pub async fn profile_by_user_id(&self, user_id: i32) -> Result<Option<ProfileResponse>, ApiError> {
        let profile = sqlx::query_as::<_, ProfileResponse>(
            "SELECT f.id, f.name, d.name AS department, u.email
             FROM faculty f
             JOIN departments d ON d.id = f.department_id
             JOIN users u ON u.id = f.user_id
             WHERE f.user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn list(&self) -> Result<Vec<Faculty>, ApiError> {
        let faculty = sqlx::query_as::<_, Faculty>(
            "SELECT id, name, employee_id, department_id, user_id FROM faculty ORDER BY employee_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(faculty)
    }

    pub async fn exists(&self, id: i32) -> Result<bool, ApiError> {
        let exists: Option<bool> =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM faculty WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists.unwrap_or(false))
    }
}
