use std::sync::Arc;

use crate::domain::auth::entities::UserProfile;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password, Username};

/// Command for registering a new user
#[derive(Debug, Clone)]
pub struct SignupUserCommand {
  pub username: String,
  pub email: String,
  /// Plain text, hashed before it is stored
  pub password: String,
}

/// Use case for registering a new user
pub struct SignupUserUseCase {
  auth_service: Arc<AuthService>,
}

impl SignupUserUseCase {
  /// Creates a new instance of SignupUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the signup use case
  ///
  /// The password is checked first, so an empty password is rejected before
  /// anything else is looked at.
  ///
  /// # Errors
  /// - `AuthError::InvalidCredential` for a missing or malformed field
  /// - `AuthError::DuplicateEmail` / `AuthError::DuplicateUsername` on conflicts
  pub async fn execute(&self, command: SignupUserCommand) -> Result<UserProfile, AuthError> {
    let SignupUserCommand {
      username,
      email,
      password,
    } = command;

    let password = Password::new(password)?;
    let email = Email::new(email)?;
    let username = Username::new(username)?;

    self.auth_service.signup(username, email, password).await
  }
}
