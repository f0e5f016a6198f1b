use thiserror::Error;

/// Main authentication error type
///
/// Every signup and login failure is one of these variants, so callers can
/// match on the kind instead of parsing messages.
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Invalid credentials: {0}")]
  InvalidCredential(#[from] ValidationError),

  #[error("Email already exists")]
  DuplicateEmail,

  #[error("Username already exists")]
  DuplicateUsername,

  #[error("User not found")]
  UserNotFound,

  #[error("Invalid password")]
  InvalidPassword,

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}

impl AuthError {
  /// True when a stored hash could not be decoded, which points at corrupted
  /// storage rather than anything the caller did
  pub fn is_malformed_hash(&self) -> bool {
    matches!(self, AuthError::Hash(HashError::MalformedHash))
  }

  /// Short machine-readable name for logs
  pub fn kind(&self) -> &'static str {
    match self {
      AuthError::InvalidCredential(_) => "invalid_credential",
      AuthError::DuplicateEmail => "duplicate_email",
      AuthError::DuplicateUsername => "duplicate_username",
      AuthError::UserNotFound => "user_not_found",
      AuthError::InvalidPassword => "invalid_password",
      AuthError::Hash(HashError::MalformedHash) => "malformed_hash",
      AuthError::Hash(_) => "hash_failure",
      AuthError::Repository(_) => "repository_failure",
    }
  }
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Invalid Argon2 parameters: {0}")]
  InvalidParams(String),

  #[error("Stored password hash is not a recognized encoding")]
  MalformedHash,

  #[error("Failed to hash password: {0}")]
  HashingFailed(String),
}

/// Input validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("Invalid email format")]
  InvalidEmail,

  #[error("Username must be between {min} and {max} characters")]
  UsernameLength { min: usize, max: usize },

  #[error("Username may only contain letters, digits, '_', '-' and '.'")]
  UsernameCharacters,

  #[error("Password too long, maximum {max} characters allowed")]
  PasswordTooLong { max: usize },

  #[error("Missing required field: {field}")]
  MissingField { field: String },
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}
