// Database repositories for assignments, exams, and grades

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::coursework::models::{
    Assignment, AssignmentSubmission, CourseEnrollmentSummary, Exam, ExamMark, ExamMarkRow,
    FinalGrade, PaperSummary,
};
use crate::error::ApiError;

pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        course_id: i32,
        faculty_id: i32,
        title: &str,
        description: Option<&str>,
        due_date: NaiveDate,
    ) -> Result<Assignment, ApiError> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "INSERT INTO assignments (course_id, faculty_id, title, description, due_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, course_id, faculty_id, title, description, due_date",
        )
        .bind(course_id)
        .bind(faculty_id)
        .bind(title)
        .bind(description)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(assignment)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Assignment>, ApiError> {
        let assignment = sqlx::query_as::<_, Assignment>(
            "SELECT id, course_id, faculty_id, title, description, due_date
             FROM assignments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(assignment)
    }

    pub async fn list_for_course(&self, course_id: i32) -> Result<Vec<Assignment>, ApiError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            "SELECT id, course_id, faculty_id, title, description, due_date
             FROM assignments WHERE course_id = $1 ORDER BY due_date",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }

    pub async fn submit(
        &self,
        assignment_id: i32,
        student_id: i32,
        submission_text: &str,
    ) -> Result<AssignmentSubmission, ApiError> {
        sqlx::query_as::<_, AssignmentSubmission>(
            "INSERT INTO assignment_submissions
                 (assignment_id, student_id, submission_text, submitted_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, assignment_id, student_id, submission_text, submitted_at, marks",
        )
        .bind(assignment_id)
        .bind(student_id)
        .bind(submission_text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::from_db(e, "You have already submitted this assignment"))
    }

    pub async fn find_submission(
        &self,
        id: i32,
    ) -> Result<Option<AssignmentSubmission>, ApiError> {
        let submission = sqlx::query_as::<_, AssignmentSubmission>(
            "SELECT id, assignment_id, student_id, submission_text, submitted_at, marks
             FROM assignment_submissions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(submission)
    }

    pub async fn submissions_for_assignment(
        &self,
        assignment_id: i32,
    ) -> Result<Vec<AssignmentSubmission>, ApiError> {
        let submissions = sqlx::query_as::<_, AssignmentSubmission>(
            "SELECT id, assignment_id, student_id, submission_text, submitted_at, marks
             FROM assignment_submissions
             WHERE assignment_id = $1
             ORDER BY submitted_at",
        )
        .bind(assignment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(submissions)
    }

    pub async fn grade(
        &self,
        submission_id: i32,
        marks: i32,
    ) -> Result<AssignmentSubmission, ApiError> {
        sqlx::query_as::<_, AssignmentSubmission>(
            "UPDATE assignment_submissions SET marks = $1 WHERE id = $2
             RETURNING id, assignment_id, student_id, submission_text, submitted_at, marks",
        )
        .bind(marks)
        .bind(submission_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Submission", submission_id))
    }

    /// Assignments in a student's enrolled courses with no submission from
    /// that student yet.
    pub async fn pending_count_for_student(&self, student_id: i32) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM assignments a
             JOIN enrollments e ON e.course_id = a.course_id
             WHERE e.student_id = $1
               AND NOT EXISTS (
                   SELECT 1 FROM assignment_submissions s
                   WHERE s.assignment_id = a.id AND s.student_id = e.student_id
               )",
        )
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Ungraded submissions across all courses a faculty member teaches.
    pub async fn ungraded_count_for_faculty(&self, faculty_id: i32) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM assignment_submissions s
             JOIN assignments a ON a.id = s.assignment_id
             JOIN faculty_courses fc ON fc.course_id = a.course_id
             WHERE fc.faculty_id = $1 AND s.marks IS NULL",
        )
        .bind(faculty_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Ungraded-submission counts per assignment for a faculty member.
    pub async fn papers_summary(&self, faculty_id: i32) -> Result<Vec<PaperSummary>, ApiError> {
        let rows = sqlx::query_as::<_, PaperSummary>(
            "SELECT a.id AS assignment_id, a.title, c.course_name,
                    COUNT(s.id) FILTER (WHERE s.marks IS NULL) AS ungraded
             FROM assignments a
             JOIN courses c ON c.id = a.course_id
             LEFT JOIN assignment_submissions s ON s.assignment_id = a.id
             WHERE a.faculty_id = $1
             GROUP BY a.id, a.title, c.course_name
             ORDER BY a.due_date",
        )
        .bind(faculty_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

pub struct ExamRepository {
    pool: PgPool,
}

impl ExamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        course_id: i32,
        faculty_id: i32,
        name: &str,
        max_marks: i32,
        exam_date: NaiveDate,
    ) -> Result<Exam, ApiError> {
        let exam = sqlx::query_as::<_, Exam>(
            "INSERT INTO exams (course_id, faculty_id, name, max_marks, exam_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, course_id, faculty_id, name, max_marks, exam_date",
        )
        .bind(course_id)
        .bind(faculty_id)
        .bind(name)
        .bind(max_marks)
        .bind(exam_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(exam)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Exam>, ApiError> {
        let exam = sqlx::query_as::<_, Exam>(
            "SELECT id, course_id, faculty_id, name, max_marks, exam_date
             FROM exams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(exam)
    }

    pub async fn upload_mark(
        &self,
        exam_id: i32,
        student_id: i32,
        marks_obtained: i32,
    ) -> Result<ExamMark, ApiError> {
        sqlx::query_as::<_, ExamMark>(
            "INSERT INTO exam_marks (exam_id, student_id, marks_obtained)
             VALUES ($1, $2, $3)
             RETURNING id, exam_id, student_id, marks_obtained",
        )
        .bind(exam_id)
        .bind(student_id)
        .bind(marks_obtained)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::from_db(e, "Marks are already uploaded for this student and exam"))
    }

    /// A student's results for every exam in one course.
    pub async fn marks_for_student_course(
        &self,
        student_id: i32,
        course_id: i32,
    ) -> Result<Vec<ExamMarkRow>, ApiError> {
        let rows = sqlx::query_as::<_, ExamMarkRow>(
            "SELECT ex.id AS exam_id, ex.name AS exam_name, ex.max_marks, ex.exam_date,
                    em.marks_obtained
             FROM exam_marks em
             JOIN exams ex ON ex.id = em.exam_id
             WHERE em.student_id = $1 AND ex.course_id = $2
             ORDER BY ex.exam_date",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Date of the next exam on or after `today` across a student's enrolled
    /// courses.
    pub async fn next_exam_date(
        &self,
        student_id: i32,
        today: NaiveDate,
    ) -> Result<Option<NaiveDate>, ApiError> {
        let date: Option<NaiveDate> = sqlx::query_scalar(
            "SELECT MIN(ex.exam_date)
             FROM exams ex
             JOIN enrollments e ON e.course_id = ex.course_id
             WHERE e.student_id = $1 AND ex.exam_date >= $2",
        )
        .bind(student_id)
        .bind(today)
        .fetch_one(&self.pool)
        .await?;
        Ok(date)
    }
}

pub struct GradeRepository {
    pool: PgPool,
}

impl GradeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn assign(
        &self,
        course_id: i32,
        student_id: i32,
        grade: &str,
    ) -> Result<FinalGrade, ApiError> {
        sqlx::query_as::<_, FinalGrade>(
            "INSERT INTO final_grades (course_id, student_id, grade)
             VALUES ($1, $2, $3)
             RETURNING id, course_id, student_id, grade",
        )
        .bind(course_id)
        .bind(student_id)
        .bind(grade)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            ApiError::from_db(e, "A final grade is already assigned for this student and course")
        })
    }

    pub async fn find(
        &self,
        course_id: i32,
        student_id: i32,
    ) -> Result<Option<FinalGrade>, ApiError> {
        let grade = sqlx::query_as::<_, FinalGrade>(
            "SELECT id, course_id, student_id, grade
             FROM final_grades WHERE course_id = $1 AND student_id = $2",
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(grade)
    }
}

/// Aggregate queries backing the faculty dashboard and summaries.
pub struct FacultyStatsRepository {
    pool: PgPool,
}

impl FacultyStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn course_count(&self, faculty_id: i32) -> Result<i64, ApiError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM faculty_courses WHERE faculty_id = $1")
                .bind(faculty_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Distinct students enrolled across all taught courses.
    pub async fn student_count(&self, faculty_id: i32) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT e.student_id)
             FROM enrollments e
             JOIN faculty_courses fc ON fc.course_id = e.course_id
             WHERE fc.faculty_id = $1",
        )
        .bind(faculty_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Enrollment counts per taught course.
    pub async fn students_summary(
        &self,
        faculty_id: i32,
    ) -> Result<Vec<CourseEnrollmentSummary>, ApiError> {
        let rows = sqlx::query_as::<_, CourseEnrollmentSummary>(
            "SELECT c.id AS course_id, c.course_code, c.course_name,
                    COUNT(e.id) AS enrolled
             FROM courses c
             JOIN faculty_courses fc ON fc.course_id = c.id
             LEFT JOIN enrollments e ON e.course_id = c.id
             WHERE fc.faculty_id = $1
             GROUP BY c.id, c.course_code, c.course_name
             ORDER BY c.course_code",
        )
        .bind(faculty_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
