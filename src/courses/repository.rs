// Database repositories for courses, teaching assignments, enrollments, and
// the timetable

use chrono::NaiveTime;
use sqlx::PgPool;

use crate::courses::models::{Course, Enrollment, FacultyCourse, TimetableEntry, TimetableRow};
use crate::error::ApiError;

pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        course_code: &str,
        course_name: &str,
        credits: i32,
        semester: i32,
        department_id: i32,
    ) -> Result<Course, ApiError> {
        sqlx::query_as::<_, Course>(
            "INSERT INTO courses (course_code, course_name, credits, semester, department_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, course_code, course_name, credits, semester, department_id",
        )
        .bind(course_code)
        .bind(course_name)
        .bind(credits)
        .bind(semester)
        .bind(department_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            ApiError::from_db(e, &format!("Course with code '{}' already exists", course_code))
        })
    }

    pub async fn list(&self) -> Result<Vec<Course>, ApiError> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT id, course_code, course_name, credits, semester, department_id
             FROM courses ORDER BY course_code",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    pub async fn list_by_department(&self, department_id: i32) -> Result<Vec<Course>, ApiError> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT id, course_code, course_name, credits, semester, department_id
             FROM courses WHERE department_id = $1 ORDER BY course_code",
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    pub async fn exists(&self, id: i32) -> Result<bool, ApiError> {
        let exists: Option<bool> =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists.unwrap_or(false))
    }
}

pub struct FacultyCourseRepository {
    pool: PgPool,
}

impl FacultyCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn assign(&self, faculty_id: i32, course_id: i32) -> Result<FacultyCourse, ApiError> {
        sqlx::query_as::<_, FacultyCourse>(
            "INSERT INTO faculty_courses (faculty_id, course_id)
             VALUES ($1, $2)
             RETURNING id, faculty_id, course_id",
        )
        .bind(faculty_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::from_db(e, "Faculty is already assigned to this course"))
    }

    /// Whether a faculty member teaches a course. The ownership check every
    /// faculty authoring operation runs before writing.
    pub async fn teaches(&self, faculty_id: i32, course_id: i32) -> Result<bool, ApiError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM faculty_courses WHERE faculty_id = $1 AND course_id = $2)",
        )
        .bind(faculty_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.unwrap_or(false))
    }

    pub async fn courses_for_faculty(&self, faculty_id: i32) -> Result<Vec<Course>, ApiError> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT c.id, c.course_code, c.course_name, c.credits, c.semester, c.department_id
             FROM courses c
             JOIN faculty_courses fc ON fc.course_id = c.id
             WHERE fc.faculty_id = $1
             ORDER BY c.course_code",
        )
        .bind(faculty_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }
}

pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a student for a course. Concurrent duplicates are resolved
    /// by the unique constraint: exactly one insert wins.
    pub async fn enroll(&self, student_id: i32, course_id: i32) -> Result<Enrollment, ApiError> {
        sqlx::query_as::<_, Enrollment>(
            "INSERT INTO enrollments (student_id, course_id)
             VALUES ($1, $2)
             RETURNING id, student_id, course_id",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::from_db(e, "Student is already enrolled in this course"))
    }

    pub async fn is_enrolled(&self, student_id: i32, course_id: i32) -> Result<bool, ApiError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE student_id = $1 AND course_id = $2)",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists.unwrap_or(false))
    }

    pub async fn courses_for_student(&self, student_id: i32) -> Result<Vec<Course>, ApiError> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT c.id, c.course_code, c.course_name, c.credits, c.semester, c.department_id
             FROM courses c
             JOIN enrollments e ON e.course_id = c.id
             WHERE e.student_id = $1
             ORDER BY c.course_code",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    /// Roster for a course.
    pub async fn students_for_course(
        &self,
        course_id: i32,
    ) -> Result<Vec<crate::people::Student>, ApiError> {
        let students = sqlx::query_as::<_, crate::people::Student>(
            "SELECT s.id, s.name, s.reg_no, s.department_id, s.user_id
             FROM students s
             JOIN enrollments e ON e.student_id = s.id
             WHERE e.course_id = $1
             ORDER BY s.reg_no",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    pub async fn count_for_student(&self, student_id: i32) -> Result<i64, ApiError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE student_id = $1")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

pub struct TimetableRepository {
    pool: PgPool,
}

impl TimetableRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        course_id: i32,
        day_of_week: &str,
        start_time: NaiveTime,
        end_time: NaiveTime,
        room: &str,
    ) -> Result<TimetableEntry, ApiError> {
        let entry = sqlx::query_as::<_, TimetableEntry>(
            "INSERT INTO timetable (course_id, day_of_week, start_time, end_time, room)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, course_id, day_of_week, start_time, end_time, room",
        )
        .bind(course_id)
        .bind(day_of_week)
        .bind(start_time)
        .bind(end_time)
        .bind(room)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    /// Timetable rows for all of a student's enrolled courses, with course
    /// and (when assigned) faculty names. Rows come back in week order,
    /// Monday first, then by start time.
    pub async fn for_student(&self, student_id: i32) -> Result<Vec<TimetableRow>, ApiError> {
        let rows = sqlx::query_as::<_, TimetableRow>(
            "SELECT t.day_of_week, t.start_time, t.end_time, t.room,
                    c.course_name AS subject, f.name AS faculty
             FROM timetable t
             JOIN courses c ON c.id = t.course_id
             JOIN enrollments e ON e.course_id = c.id
             LEFT JOIN faculty_courses fc ON fc.course_id = c.id
             LEFT JOIN faculty f ON f.id = fc.faculty_id
             WHERE e.student_id = $1
             ORDER BY array_position(
                 ARRAY['Monday','Tuesday','Wednesday','Thursday','Friday','Saturday','Sunday'],
                 t.day_of_week
             ), t.start_time",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Number of classes a faculty member holds on the given day.
    pub async fn classes_on_day(&self, faculty_id: i32, day: &str) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM timetable t
             JOIN faculty_courses fc ON fc.course_id = t.course_id
             WHERE fc.faculty_id = $1 AND t.day_of_week = $2",
        )
        .bind(faculty_id)
        .bind(day)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// The next class for a faculty member on the given day after a time.
    pub async fn next_class(
        &self,
        faculty_id: i32,
        day: &str,
        after: NaiveTime,
    ) -> Result<Option<NextClass>, ApiError> {
        let next = sqlx::query_as::<_, NextClass>(
            "SELECT c.course_name AS course, t.start_time, t.room
             FROM timetable t
             JOIN courses c ON c.id = t.course_id
             JOIN faculty_courses fc ON fc.course_id = c.id
             WHERE fc.faculty_id = $1 AND t.day_of_week = $2 AND t.start_time > $3
             ORDER BY t.start_time
             LIMIT 1",
        )
        .bind(faculty_id)
        .bind(day)
        .bind(after)
        .fetch_optional(&self.pool)
        .await?;
        Ok(next)
    }
}

/// The next upcoming class on a faculty member's schedule today.
#[derive(Debug, serde::Serialize, sqlx::FromRow)]
pub struct NextClass {
    pub course: String,
    pub start_time: NaiveTime,
    pub room: String,
}
