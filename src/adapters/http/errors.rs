use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::auth::errors::{AuthError, HashError};

use super::dtos::ErrorResponse;

/// Message shared by every failed login, whatever the underlying cause
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Authentication error (400 or 401)
  Auth(AuthErrorKind),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
  /// Email already registered (400)
  DuplicateEmail,

  /// Username already taken (400)
  DuplicateUsername,

  /// Unknown account or wrong password (401)
  InvalidCredentials,
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::DuplicateEmail => StatusCode::BAD_REQUEST,
        AuthErrorKind::DuplicateUsername => StatusCode::BAD_REQUEST,
        AuthErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
      },
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::Auth(kind) => match kind {
        AuthErrorKind::DuplicateEmail => ("duplicate_email", "Email already exists".to_string()),
        AuthErrorKind::DuplicateUsername => (
          "duplicate_username",
          "Username already exists".to_string(),
        ),
        AuthErrorKind::InvalidCredentials => (
          "invalid_credentials",
          INVALID_CREDENTIALS_MESSAGE.to_string(),
        ),
      },
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(ErrorResponse::new(error_type, message))
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidCredential(err) => ApiError::Validation(err.to_string()),
      AuthError::DuplicateEmail => ApiError::Auth(AuthErrorKind::DuplicateEmail),
      AuthError::DuplicateUsername => ApiError::Auth(AuthErrorKind::DuplicateUsername),
      AuthError::UserNotFound | AuthError::InvalidPassword => {
        ApiError::Auth(AuthErrorKind::InvalidCredentials)
      }
      AuthError::Hash(HashError::MalformedHash) => {
        ApiError::Internal("stored password hash is malformed".to_string())
      }
      AuthError::Hash(err) => ApiError::Internal(err.to_string()),
      AuthError::Repository(err) => ApiError::Internal(err.to_string()),
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::errors::{RepositoryError, ValidationError};

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::DuplicateEmail).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidCredentials).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_login_failures_are_indistinguishable() {
    let not_found = ApiError::from(AuthError::UserNotFound);
    let wrong_password = ApiError::from(AuthError::InvalidPassword);

    assert!(matches!(
      not_found,
      ApiError::Auth(AuthErrorKind::InvalidCredentials)
    ));
    assert!(matches!(
      wrong_password,
      ApiError::Auth(AuthErrorKind::InvalidCredentials)
    ));
    assert_eq!(not_found.status_code(), wrong_password.status_code());
  }

  #[test]
  fn test_credentials_message_names_no_identifier() {
    let message = INVALID_CREDENTIALS_MESSAGE.to_lowercase();
    assert!(!message.contains("email"));
    assert!(!message.contains("username"));
  }

  #[test]
  fn test_malformed_hash_is_internal() {
    let api_error = ApiError::from(AuthError::Hash(HashError::MalformedHash));
    assert_eq!(api_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let api_error = ApiError::from(AuthError::Repository(RepositoryError::ConnectionFailed(
      "down".to_string(),
    )));
    assert_eq!(api_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn test_invalid_credential_is_validation() {
    let api_error = ApiError::from(AuthError::InvalidCredential(ValidationError::InvalidEmail));
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);
  }
}
