// Attendance sessions and per-student records.

pub mod handlers;
pub mod models;
pub mod repository;

pub use models::{AttendanceRecord, AttendanceSession};
pub use repository::AttendanceRepository;
