pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{AuthResponse, ErrorResponse, LoginRequest, SignupRequest, UserResponse};
pub use errors::{ApiError, AuthErrorKind};
pub use handlers::auth::{login_handler, signup_handler};
pub use handlers::health::health_check;
pub use middleware::{RequestId, RequestIdMiddleware};
pub use routes::{configure_auth_routes, json_config};
