use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::auth::entities::UserProfile;

/// Request for user signup
///
/// Missing fields deserialize as empty strings so they are reported as
/// validation failures rather than JSON errors.
#[derive(Deserialize, Validate)]
pub struct SignupRequest {
  #[serde(default)]
  #[validate(length(min = 1, message = "Username is required"))]
  pub username: String,

  #[serde(default)]
  #[validate(length(min = 1, message = "Email is required"))]
  pub email: String,

  #[serde(default)]
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Request for user login
///
/// Carries `email` or `username` depending on the deployment's login policy.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
  #[serde(default)]
  pub email: Option<String>,

  #[serde(default)]
  pub username: Option<String>,

  #[serde(default)]
  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Public user fields returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
  pub id: Uuid,
  pub username: String,
  pub email: String,
}

impl From<UserProfile> for UserResponse {
  fn from(profile: UserProfile) -> Self {
    Self {
      id: profile.id,
      username: profile.username,
      email: profile.email,
    }
  }
}

/// Response after a successful signup or login
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
  pub success: bool,
  pub message: String,
  pub user: UserResponse,
}

impl AuthResponse {
  pub fn new(message: impl Into<String>, user: impl Into<UserResponse>) -> Self {
    Self {
      success: true,
      message: message.into(),
      user: user.into(),
    }
  }
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Always false
  pub success: bool,

  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,
}

impl ErrorResponse {
  pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      success: false,
      error: error.into(),
      message: message.into(),
    }
  }
}
