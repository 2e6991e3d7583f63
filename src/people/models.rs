// Data models and DTOs for departments and student/faculty profiles

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Department database model
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Department {
    pub id: i32,
    #[schema(example = "CSE")]
    pub code: String,
    #[schema(example = "Computer Science")]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentRequest {
    #[validate(custom = "crate::validation::validate_code")]
    #[schema(example = "CSE")]
    pub code: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Computer Science")]
    pub name: String,
}

/// Student database model
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub reg_no: String,
    pub department_id: i32,
    pub user_id: i32,
}

/// Faculty database model
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Faculty {
    pub id: i32,
    pub name: String,
    pub employee_id: String,
    pub department_id: i32,
    pub user_id: i32,
}

/// Profile view joined with department name and account email.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub name: String,
    pub department: String,
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    #[schema(example = "R001")]
    pub reg_no: String,
    pub department_id: i32,
    #[validate(email)]
    pub email: String,
}

/// Returned once at creation; the temporary password is not stored in clear
/// anywhere else.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedStudentResponse {
    pub student: Student,
    pub email: String,
    pub temporary_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub reg_no: Option<String>,
    pub department_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFacultyRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    #[schema(example = "E042")]
    pub employee_id: String,
    pub department_id: i32,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedFacultyResponse {
    pub faculty: Faculty,
    pub email: String,
    pub temporary_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFacultyRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub employee_id: Option<String>,
    pub department_id: Option<i32>,
}

/// Query parameters for the student listing.
#[derive(Debug, Deserialize)]
pub struct ListStudentsQuery {
    pub department_id: Option<i32>,
    /// 1-indexed page, defaults to 1
    pub page: Option<u32>,
    /// Items per page, defaults to 50
    pub limit: Option<u32>,
}

impl ListStudentsQuery {
    /// Normalize pagination to (limit, offset); zero values fall back to
    /// defaults rather than erroring.
    pub fn pagination(&self) -> (i64, i64) {
        let limit = match self.limit {
            Some(l) if l > 0 => l.min(200) as i64,
            _ => 50,
        };
        let page = match self.page {
            Some(p) if p > 0 => p as i64,
            _ => 1,
        };
        (limit, (page - 1) * limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let query = ListStudentsQuery {
            department_id: None,
            page: None,
            limit: None,
        };
        assert_eq!(query.pagination(), (50, 0));
    }

    #[test]
    fn test_pagination_offset() {
        let query = ListStudentsQuery {
            department_id: None,
            page: Some(3),
            limit: Some(20),
        };
        assert_eq!(query.pagination(), (20, 40));
    }

    #[test]
    fn test_pagination_clamps_zero_and_oversize() {
        let query = ListStudentsQuery {
            department_id: None,
            page: Some(0),
            limit: Some(0),
        };
        assert_eq!(query.pagination(), (50, 0));

        let query = ListStudentsQuery {
            department_id: None,
            page: Some(1),
            limit: Some(10_000),
        };
        assert_eq!(query.pagination().0, 200);
    }

    #[test]
    fn test_create_student_request_validation() {
        use validator::Validate;

        let ok = CreateStudentRequest {
            name: "Ann".into(),
            reg_no: "R001".into(),
            department_id: 1,
            email: "ann@x.com".into(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = CreateStudentRequest {
            email: "not-an-email".into(),
            ..CreateStudentRequest {
                name: "Ann".into(),
                reg_no: "R001".into(),
                department_id: 1,
                email: String::new(),
            }
        };
        assert!(bad_email.validate().is_err());
    }
}
