use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::value_objects::{Email, PasswordHash, Username};

/// A user record that has not been persisted yet
///
/// The store assigns the identifier when it saves the record.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username: Username,
  pub email: Email,
  pub password_hash: PasswordHash,
}

impl NewUser {
  pub fn new(username: Username, email: Email, password_hash: PasswordHash) -> Self {
    Self {
      username,
      email,
      password_hash,
    }
  }
}

/// User entity representing a registered account
///
/// Records are immutable once created.
#[derive(Debug, Clone)]
pub struct User {
  /// Unique identifier assigned by the store
  pub id: Uuid,
  /// Unique username
  pub username: String,
  /// Unique, lowercase email address
  pub email: String,
  /// Self-describing Argon2 hash, never the raw password
  pub password_hash: PasswordHash,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
}

impl User {
  /// Builds the stored record for a new user with a freshly assigned id
  pub fn from_new(new_user: NewUser) -> Self {
    Self {
      id: Uuid::new_v4(),
      username: new_user.username.into_inner(),
      email: new_user.email.into_inner(),
      password_hash: new_user.password_hash,
      created_at: Utc::now(),
    }
  }

  /// Creates a user from database fields (for reconstruction)
  pub fn from_db(
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      username,
      email,
      password_hash: PasswordHash::new(password_hash),
      created_at,
    }
  }

  /// Public view of this user
  pub fn profile(&self) -> UserProfile {
    UserProfile::from(self)
  }
}

/// Public view of a user; carries no credential material
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
  pub id: Uuid,
  pub username: String,
  pub email: String,
}

impl From<&User> for UserProfile {
  fn from(user: &User) -> Self {
    Self {
      id: user.id,
      username: user.username.clone(),
      email: user.email.clone(),
    }
  }
}

impl From<User> for UserProfile {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      username: user.username,
      email: user.email,
    }
  }
}
