use actix_web::web;
use std::sync::Arc;

use crate::application::auth::{LoginUserUseCase, SignupUserUseCase};

use super::errors::ApiError;
use super::handlers::auth::{login_handler, signup_handler};

/// JSON extractor settings; malformed bodies get the standard error shape
pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default()
    .limit(16 * 1024)
    .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

/// Configure authentication routes
///
/// Mounts the authentication endpoints under the provided scope
/// (e.g., /api/auth).
///
/// # Routes
///
/// - POST /signup - Register a new user account
/// - POST /login - Verify credentials
pub fn configure_auth_routes(
  cfg: &mut web::ServiceConfig,
  signup_use_case: Arc<SignupUserUseCase>,
  login_use_case: Arc<LoginUserUseCase>,
) {
  cfg
    .app_data(json_config())
    .app_data(web::Data::new(signup_use_case))
    .app_data(web::Data::new(login_use_case))
    .route("/signup", web::post().to(signup_handler))
    .route("/login", web::post().to(login_handler));
}
