// Authentication module
// Credential verification, token issuance/validation, and the access guard
// composed by every protected handler.

pub mod error;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use guard::Identity;
pub use models::{LoginRequest, LoginResponse, Role, User, UserResponse};
pub use repository::UserRepository;
pub use token::{Claims, TokenError, TokenService};
