use async_trait::async_trait;

use super::entities::{NewUser, User};
use super::errors::AuthError;
use super::value_objects::{Email, Password, PasswordHash, Username};

/// Repository trait for user persistence operations
///
/// Implementations must enforce email and username uniqueness atomically in
/// `save`, independent of any `exists_*` pre-check made by the caller.
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Returns true if a user with this email is stored
  async fn exists_by_email(&self, email: &Email) -> Result<bool, AuthError>;

  /// Returns true if a user with this username is stored
  async fn exists_by_username(&self, username: &Username) -> Result<bool, AuthError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError>;

  /// Finds a user by their username
  async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError>;

  /// Persists a new user and returns it with its assigned identifier
  ///
  /// Fails with `AuthError::DuplicateEmail` or `AuthError::DuplicateUsername`
  /// when a uniqueness constraint is violated.
  async fn save(&self, user: NewUser) -> Result<User, AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password with a freshly generated salt
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a stored hash
  ///
  /// Returns `Ok(false)` on mismatch. Fails only when the stored hash is not
  /// a recognized encoding.
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}
