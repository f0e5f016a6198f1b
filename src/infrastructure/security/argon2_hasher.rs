use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Verification rejects stored costs above this multiple of the configured
/// (or default, whichever is higher) parameters
const MAX_COST_FACTOR: u32 = 4;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HasherParams {
  /// Memory cost in KiB
  pub memory_kib: u32,
  /// Number of passes
  pub iterations: u32,
  /// Degree of parallelism
  pub parallelism: u32,
}

impl Default for HasherParams {
  fn default() -> Self {
    Self {
      memory_kib: 19456,
      iterations: 2,
      parallelism: 1,
    }
  }
}

impl HasherParams {
  /// Highest cost a stored hash may request when it is verified
  fn verification_ceiling(&self) -> Self {
    let default = Self::default();
    Self {
      memory_kib: self
        .memory_kib
        .max(default.memory_kib)
        .saturating_mul(MAX_COST_FACTOR),
      iterations: self
        .iterations
        .max(default.iterations)
        .saturating_mul(MAX_COST_FACTOR),
      parallelism: self
        .parallelism
        .max(default.parallelism)
        .saturating_mul(MAX_COST_FACTOR),
    }
  }

  fn admits(&self, params: &Params) -> bool {
    params.m_cost() <= self.memory_kib
      && params.t_cost() <= self.iterations
      && params.p_cost() <= self.parallelism
  }
}

/// Argon2id password hasher implementation
///
/// Produces PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$digest`) that
/// carry everything needed to verify them later, so the cost can be raised
/// without touching stored records. The defaults are:
/// - Memory cost: 19 MiB (19456 KiB)
/// - Time cost: 2 iterations
/// - Parallelism: 1 thread
///
/// Hashing is CPU-bound and runs on the blocking thread pool. Stored hashes
/// asking for more than a few times the configured cost are treated as
/// malformed and never run.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
  ceiling: HasherParams,
}

impl Argon2PasswordHasher {
  /// Creates a hasher with the default parameters
  pub fn new() -> Result<Self, AuthError> {
    Self::with_params(HasherParams::default())
  }

  /// Creates a hasher with explicit cost parameters
  pub fn with_params(params: HasherParams) -> Result<Self, AuthError> {
    // Output length: 32 bytes
    let argon2_params = Params::new(
      params.memory_kib,
      params.iterations,
      params.parallelism,
      Some(32),
    )
    .map_err(|e| {
      AuthError::Hash(HashError::InvalidParams(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    Ok(Self {
      argon2,
      ceiling: params.verification_ceiling(),
    })
  }

  fn hash_blocking(argon2: &Argon2<'static>, password: &Password) -> Result<PasswordHash, AuthError> {
    // 16 random bytes from the OS CSPRNG
    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    let hash = argon2
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| {
        AuthError::Hash(HashError::HashingFailed(format!(
          "Failed to hash password: {}",
          e
        )))
      })?;

    Ok(PasswordHash::new(hash.to_string()))
  }

  fn verify_blocking(
    argon2: &Argon2<'static>,
    ceiling: &HasherParams,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let parsed_hash = Argon2PasswordHash::new(hashed_password.as_str())
      .map_err(|_| AuthError::Hash(HashError::MalformedHash))?;

    if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
      return Err(AuthError::Hash(HashError::MalformedHash));
    }

    let stored_params =
      Params::try_from(&parsed_hash).map_err(|_| AuthError::Hash(HashError::MalformedHash))?;
    if !ceiling.admits(&stored_params) {
      return Err(AuthError::Hash(HashError::MalformedHash));
    }

    // Algorithm, version, cost and salt come from the parsed hash; the digest
    // comparison inside verify_password is constant-time
    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
      Ok(()) => Ok(true),
      Err(argon2::password_hash::Error::Password) => Ok(false),
      Err(_) => Err(AuthError::Hash(HashError::MalformedHash)),
    }
  }
}

impl Default for Argon2PasswordHasher {
  fn default() -> Self {
    Self::new().expect("Failed to create default Argon2PasswordHasher")
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  /// Hashes a plain text password using Argon2id
  ///
  /// # Returns
  /// * `Ok(PasswordHash)` - The hashed password
  /// * `Err(AuthError)` - If hashing fails
  ///
  /// Length bounds are enforced when the `Password` is constructed.
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let argon2 = self.argon2.clone();
    let password = password.clone();

    tokio::task::spawn_blocking(move || Self::hash_blocking(&argon2, &password))
      .await
      .map_err(|e| {
        AuthError::Hash(HashError::HashingFailed(format!(
          "Hashing task failed: {}",
          e
        )))
      })?
  }

  /// Verifies a plain text password against a hashed password
  ///
  /// # Returns
  /// * `Ok(true)` - If the password matches
  /// * `Ok(false)` - If the password does not match
  /// * `Err(AuthError)` - If the stored hash is not a recognized encoding
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let argon2 = self.argon2.clone();
    let ceiling = self.ceiling;
    let password = password.clone();
    let hashed_password = hashed_password.clone();

    tokio::task::spawn_blocking(move || {
      Self::verify_blocking(&argon2, &ceiling, &password, &hashed_password)
    })
      .await
      .map_err(|e| {
        AuthError::Hash(HashError::HashingFailed(format!(
          "Verification task failed: {}",
          e
        )))
      })?
  }
}
