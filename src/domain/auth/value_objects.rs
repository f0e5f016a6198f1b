use std::fmt;
use validator::ValidateEmail;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::ValidationError;

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation
  pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
    let email = email.into();
    let email = email.trim();

    if email.is_empty() {
      return Err(ValidationError::MissingField {
        field: "email".to_string(),
      });
    }

    if !email.validate_email() {
      return Err(ValidationError::InvalidEmail);
    }

    // Normalize to lowercase
    Ok(Self(email.to_lowercase()))
  }

  /// Returns the email as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Username Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
  pub const MIN_LENGTH: usize = 3;
  pub const MAX_LENGTH: usize = 50;

  /// Creates a new Username after validation
  ///
  /// Surrounding whitespace is dropped; case is preserved.
  pub fn new(username: impl Into<String>) -> Result<Self, ValidationError> {
    let username = username.into();
    let username = username.trim();

    if username.is_empty() {
      return Err(ValidationError::MissingField {
        field: "username".to_string(),
      });
    }

    let length = username.chars().count();
    if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
      return Err(ValidationError::UsernameLength {
        min: Self::MIN_LENGTH,
        max: Self::MAX_LENGTH,
      });
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
    if !username.chars().all(allowed) {
      return Err(ValidationError::UsernameCharacters);
    }

    Ok(Self(username.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Username {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

/// Raw password supplied for the duration of a signup or login call
///
/// The buffer is wiped when the value is dropped. `Debug` and `Display`
/// never print the content.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  pub const MAX_LENGTH: usize = 128;

  /// Creates a new Password after validation
  ///
  /// Rejects empty input and anything longer than `MAX_LENGTH` characters.
  pub fn new(password: impl Into<String>) -> Result<Self, ValidationError> {
    let password = Self(password.into());

    if password.0.is_empty() {
      return Err(ValidationError::MissingField {
        field: "password".to_string(),
      });
    }

    if password.0.chars().count() > Self::MAX_LENGTH {
      return Err(ValidationError::PasswordTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(password)
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn as_bytes(&self) -> &[u8] {
    self.0.as_bytes()
  }
}

// Implement Debug without exposing the password
impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

impl fmt::Display for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("***")
  }
}

// ============================================================================
// PasswordHash Value Object (self-describing PHC string)
// ============================================================================

/// Stored password hash
///
/// The content is opaque to the domain; only a `PasswordHasher` decides
/// whether the encoding is one it recognizes.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Wraps a hash string as read from storage or produced by a hasher
  pub fn new(hash: impl Into<String>) -> Self {
    Self(hash.into())
  }

  /// Returns the hash as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for PasswordHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("PasswordHash(***)")
  }
}

// ============================================================================
// LoginIdentifier
// ============================================================================

/// The account key a login attempt is looked up by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
  Email(Email),
  Username(Username),
}

impl fmt::Display for LoginIdentifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Email(email) => write!(f, "email:{}", email),
      Self::Username(username) => write!(f, "username:{}", username),
    }
  }
}

impl From<Email> for LoginIdentifier {
  fn from(email: Email) -> Self {
    Self::Email(email)
  }
}

impl From<Username> for LoginIdentifier {
  fn from(username: Username) -> Self {
    Self::Username(username)
  }
}
