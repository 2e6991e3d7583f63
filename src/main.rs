mod attendance;
mod auth;
mod config;
mod courses;
mod coursework;
mod db;
mod error;
mod people;
mod validation;

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::TokenService;
use config::AppConfig;

/// OpenAPI documentation for the auth and catalog endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::login_handler,
        auth::handlers::me_handler,
        people::handlers::create_department,
        people::handlers::list_departments,
        courses::handlers::create_course,
        courses::handlers::list_courses,
    ),
    components(
        schemas(
            auth::models::Role,
            auth::models::LoginRequest,
            auth::models::LoginResponse,
            auth::models::UserResponse,
            people::models::Department,
            people::models::CreateDepartmentRequest,
            courses::models::Course,
            courses::models::CreateCourseRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login and current-user endpoints"),
        (name = "departments", description = "Department catalog"),
        (name = "courses", description = "Course catalog"),
    ),
    info(
        title = "Campus API",
        version = "1.0.0",
        description = "Role-based academic records backend",
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: TokenService,
}

async fn root_handler() -> &'static str {
    "Campus API"
}

/// Creates and configures the application router.
/// Every route under /api except login goes through the access guard.
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(root_handler))
        // Auth
        .route("/api/auth/login", post(auth::handlers::login_handler))
        .route("/api/auth/me", get(auth::handlers::me_handler))
        // Admin: catalog and people management
        .route(
            "/api/admin/departments",
            post(people::handlers::create_department),
        )
        .route("/api/admin/courses", post(courses::handlers::create_course))
        .route("/api/admin/students", post(people::handlers::create_student))
        .route(
            "/api/admin/students/:id",
            put(people::handlers::update_student).delete(people::handlers::delete_student),
        )
        .route("/api/admin/faculty", post(people::handlers::create_faculty))
        .route(
            "/api/admin/faculty/:id",
            put(people::handlers::update_faculty).delete(people::handlers::delete_faculty),
        )
        .route(
            "/api/admin/faculty-courses",
            post(courses::handlers::assign_faculty_course),
        )
        .route("/api/faculty", get(people::handlers::list_faculty))
        // Shared reads
        .route("/api/departments", get(people::handlers::list_departments))
        .route("/api/courses", get(courses::handlers::list_courses))
        .route(
            "/api/departments/:id/courses",
            get(courses::handlers::list_courses_by_department),
        )
        .route("/api/students", get(people::handlers::list_students))
        // Faculty
        .route("/api/faculty/me", get(people::handlers::my_faculty_profile))
        .route(
            "/api/faculty/courses",
            get(courses::handlers::my_teaching_courses),
        )
        .route(
            "/api/faculty/courses/:id/students",
            get(courses::handlers::course_roster),
        )
        .route(
            "/api/faculty/attendance/sessions",
            post(attendance::handlers::create_session),
        )
        .route(
            "/api/faculty/attendance/records",
            post(attendance::handlers::mark_attendance),
        )
        .route(
            "/api/faculty/assignments",
            post(coursework::handlers::create_assignment),
        )
        .route(
            "/api/faculty/assignments/:id/submissions",
            get(coursework::handlers::assignment_submissions),
        )
        .route(
            "/api/faculty/submissions/:id/grade",
            put(coursework::handlers::grade_submission),
        )
        .route("/api/faculty/exams", post(coursework::handlers::create_exam))
        .route(
            "/api/faculty/exam-marks",
            post(coursework::handlers::upload_exam_mark),
        )
        .route(
            "/api/faculty/final-grades",
            post(coursework::handlers::assign_final_grade),
        )
        .route(
            "/api/faculty/dashboard",
            get(coursework::handlers::faculty_dashboard),
        )
        .route(
            "/api/faculty/students-summary",
            get(coursework::handlers::students_summary),
        )
        .route(
            "/api/faculty/papers-summary",
            get(coursework::handlers::papers_summary),
        )
        .route(
            "/api/timetable",
            post(courses::handlers::create_timetable_entry),
        )
        // Student
        .route("/api/student/me", get(people::handlers::my_student_profile))
        .route("/api/student/enrollments", post(courses::handlers::enroll))
        .route(
            "/api/student/courses",
            get(courses::handlers::my_enrolled_courses),
        )
        .route(
            "/api/student/courses/:id/assignments",
            get(coursework::handlers::course_assignments),
        )
        .route(
            "/api/student/submissions",
            post(coursework::handlers::submit_assignment),
        )
        .route(
            "/api/student/courses/:id/exam-marks",
            get(coursework::handlers::my_exam_marks),
        )
        .route(
            "/api/student/courses/:id/final-grade",
            get(coursework::handlers::my_final_grade),
        )
        .route("/api/student/timetable", get(courses::handlers::my_timetable))
        .route(
            "/api/student/attendance",
            get(attendance::handlers::my_attendance),
        )
        .route(
            "/api/student/attendance/summary",
            get(attendance::handlers::my_attendance_summary),
        )
        .route(
            "/api/student/dashboard",
            get(coursework::handlers::student_dashboard),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Campus API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let state = AppState {
        db: db_pool,
        tokens: TokenService::new(&config.auth),
    };
    let app = create_router(state);

    // Start the Axum server
    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Campus API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
