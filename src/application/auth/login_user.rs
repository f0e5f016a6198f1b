use serde::Deserialize;
use std::sync::Arc;

use crate::domain::auth::entities::UserProfile;
use crate::domain::auth::errors::{AuthError, ValidationError};
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, LoginIdentifier, Password, Username};

/// Which account key a deployment accepts at login
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginIdentifierPolicy {
  #[default]
  Email,
  Username,
}

/// Command for logging in a user
///
/// Only the field named by the configured policy is read.
#[derive(Debug, Clone)]
pub struct LoginUserCommand {
  pub email: Option<String>,
  pub username: Option<String>,
  pub password: String,
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
  policy: LoginIdentifierPolicy,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(auth_service: Arc<AuthService>, policy: LoginIdentifierPolicy) -> Self {
    Self {
      auth_service,
      policy,
    }
  }

  /// Executes the login use case
  ///
  /// # Errors
  /// - `AuthError::InvalidCredential` if the identifier or password is missing or malformed
  /// - `AuthError::UserNotFound` / `AuthError::InvalidPassword` on failed authentication
  pub async fn execute(&self, command: LoginUserCommand) -> Result<UserProfile, AuthError> {
    let LoginUserCommand {
      email,
      username,
      password,
    } = command;

    let password = Password::new(password)?;

    let identifier = match self.policy {
      LoginIdentifierPolicy::Email => {
        let email = email.ok_or_else(|| ValidationError::MissingField {
          field: "email".to_string(),
        })?;
        LoginIdentifier::Email(Email::new(email)?)
      }
      LoginIdentifierPolicy::Username => {
        let username = username.ok_or_else(|| ValidationError::MissingField {
          field: "username".to_string(),
        })?;
        LoginIdentifier::Username(Username::new(username)?)
      }
    };

    self.auth_service.login(identifier, password).await
  }
}
