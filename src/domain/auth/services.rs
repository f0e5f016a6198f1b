use std::sync::Arc;
use tokio::sync::OnceCell;

use super::entities::{NewUser, UserProfile};
use super::errors::AuthError;
use super::ports::{PasswordHasher, UserRepository};
use super::value_objects::{Email, LoginIdentifier, Password, PasswordHash, Username};

/// Password verified against a placeholder hash when the account is missing
const TIMING_GUARD_PASSWORD: &str = "timing-guard-placeholder";

/// Authentication service implementing signup and login
///
/// Holds no per-request state; the repository is the only shared mutable
/// resource and the final authority on uniqueness.
pub struct AuthService {
  user_repo: Arc<dyn UserRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  timing_guard_hash: OnceCell<PasswordHash>,
}

impl AuthService {
  /// Creates a new instance of AuthService
  pub fn new(user_repo: Arc<dyn UserRepository>, password_hasher: Arc<dyn PasswordHasher>) -> Self {
    Self {
      user_repo,
      password_hasher,
      timing_guard_hash: OnceCell::new(),
    }
  }

  /// Computes the placeholder hash used for logins against missing accounts
  ///
  /// Called once at startup so the first such login does not pay for a hash
  /// on top of the verification. Safe to call more than once.
  pub async fn warm_up(&self) -> Result<(), AuthError> {
    self.guard_hash().await.map(|_| ())
  }

  /// Registers a new user
  ///
  /// Uniqueness is checked before the password is hashed so rejected requests
  /// skip the hashing cost. The repository re-checks atomically on save.
  ///
  /// # Errors
  /// - `AuthError::DuplicateEmail` if the email is already registered
  /// - `AuthError::DuplicateUsername` if the username is already taken
  pub async fn signup(
    &self,
    username: Username,
    email: Email,
    password: Password,
  ) -> Result<UserProfile, AuthError> {
    if self.user_repo.exists_by_email(&email).await? {
      tracing::info!("Signup rejected: email already registered");
      return Err(AuthError::DuplicateEmail);
    }

    if self.user_repo.exists_by_username(&username).await? {
      tracing::info!("Signup rejected: username already taken");
      return Err(AuthError::DuplicateUsername);
    }

    let password_hash = self.password_hasher.hash(&password).await?;
    drop(password);

    let user = match self
      .user_repo
      .save(NewUser::new(username, email, password_hash))
      .await
    {
      Ok(user) => user,
      Err(e @ (AuthError::DuplicateEmail | AuthError::DuplicateUsername)) => {
        // Another signup won the race between the pre-check and the insert
        tracing::warn!("Signup lost uniqueness race: {}", e.kind());
        return Err(e);
      }
      Err(e) => return Err(e),
    };

    tracing::info!("User registered: user_id={}", user.id);

    Ok(user.into())
  }

  /// Verifies a login attempt and returns the matching user's public view
  ///
  /// # Errors
  /// - `AuthError::UserNotFound` if no account matches the identifier
  /// - `AuthError::InvalidPassword` if the password does not match
  /// - `AuthError::Hash(HashError::MalformedHash)` if the stored hash is corrupt
  pub async fn login(
    &self,
    identifier: LoginIdentifier,
    password: Password,
  ) -> Result<UserProfile, AuthError> {
    let user = match &identifier {
      LoginIdentifier::Email(email) => self.user_repo.find_by_email(email).await?,
      LoginIdentifier::Username(username) => self.user_repo.find_by_username(username).await?,
    };

    let Some(user) = user else {
      self.equalize_timing(&password).await;
      tracing::info!("Login failed: no account for identifier");
      return Err(AuthError::UserNotFound);
    };

    let is_valid = match self
      .password_hasher
      .verify(&password, &user.password_hash)
      .await
    {
      Ok(is_valid) => is_valid,
      Err(e) => {
        if e.is_malformed_hash() {
          tracing::error!("Stored password hash is corrupt for user_id={}", user.id);
        }
        return Err(e);
      }
    };

    if !is_valid {
      tracing::info!("Login failed: wrong password for user_id={}", user.id);
      return Err(AuthError::InvalidPassword);
    }

    tracing::info!("Login successful for user_id={}", user.id);

    Ok(user.into())
  }

  /// Spends one verification on a placeholder hash so a missing account takes
  /// about as long as a wrong password
  async fn equalize_timing(&self, password: &Password) {
    match self.guard_hash().await {
      Ok(hash) => {
        if let Err(e) = self.password_hasher.verify(password, hash).await {
          tracing::debug!("Timing guard verification failed: {}", e);
        }
      }
      Err(e) => tracing::debug!("Timing guard hash unavailable: {}", e),
    }
  }

  async fn guard_hash(&self) -> Result<&PasswordHash, AuthError> {
    self
      .timing_guard_hash
      .get_or_try_init(|| async {
        match Password::new(TIMING_GUARD_PASSWORD) {
          Ok(placeholder) => self.password_hasher.hash(&placeholder).await,
          Err(e) => Err(AuthError::from(e)),
        }
      })
      .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::entities::User;
  use crate::domain::auth::errors::HashError;
  use crate::infrastructure::persistence::memory::InMemoryUserRepository;
  use crate::infrastructure::security::{Argon2PasswordHasher, HasherParams};
  use async_trait::async_trait;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn fast_hasher() -> Arc<Argon2PasswordHasher> {
    Arc::new(
      Argon2PasswordHasher::with_params(HasherParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
      })
      .unwrap(),
    )
  }

  fn service() -> (AuthService, Arc<InMemoryUserRepository>) {
    let repo = Arc::new(InMemoryUserRepository::new());
    let service = AuthService::new(repo.clone(), fast_hasher());
    (service, repo)
  }

  async fn signup(
    service: &AuthService,
    username: &str,
    email: &str,
    password: &str,
  ) -> Result<UserProfile, AuthError> {
    service
      .signup(
        Username::new(username).unwrap(),
        Email::new(email).unwrap(),
        Password::new(password).unwrap(),
      )
      .await
  }

  async fn login(service: &AuthService, email: &str, password: &str) -> Result<UserProfile, AuthError> {
    service
      .login(
        Email::new(email).unwrap().into(),
        Password::new(password).unwrap(),
      )
      .await
  }

  /// Counts hash calls and delegates to a real hasher
  struct CountingHasher {
    inner: Arc<Argon2PasswordHasher>,
    hash_calls: AtomicUsize,
  }

  #[async_trait]
  impl PasswordHasher for CountingHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
      self.hash_calls.fetch_add(1, Ordering::SeqCst);
      self.inner.hash(password).await
    }

    async fn verify(
      &self,
      password: &Password,
      hashed_password: &PasswordHash,
    ) -> Result<bool, AuthError> {
      self.inner.verify(password, hashed_password).await
    }
  }

  /// Passes every pre-check and then reports a duplicate on save, the way a
  /// store behaves when a concurrent signup commits first
  struct RacingRepository;

  #[async_trait]
  impl UserRepository for RacingRepository {
    async fn exists_by_email(&self, _email: &Email) -> Result<bool, AuthError> {
      Ok(false)
    }

    async fn exists_by_username(&self, _username: &Username) -> Result<bool, AuthError> {
      Ok(false)
    }

    async fn find_by_email(&self, _email: &Email) -> Result<Option<User>, AuthError> {
      Ok(None)
    }

    async fn find_by_username(&self, _username: &Username) -> Result<Option<User>, AuthError> {
      Ok(None)
    }

    async fn save(&self, _user: NewUser) -> Result<User, AuthError> {
      Err(AuthError::DuplicateEmail)
    }
  }

  #[tokio::test]
  async fn test_signup_and_login_scenario() {
    let (service, _repo) = service();

    let alice = signup(&service, "alice", "alice@x.com", "Secret123!")
      .await
      .unwrap();
    assert_eq!(alice.username, "alice");
    assert_eq!(alice.email, "alice@x.com");

    let duplicate = signup(&service, "bob", "alice@x.com", "Other!").await;
    assert!(matches!(duplicate, Err(AuthError::DuplicateEmail)));

    let logged_in = login(&service, "alice@x.com", "Secret123!").await.unwrap();
    assert_eq!(logged_in, alice);

    let wrong = login(&service, "alice@x.com", "wrong").await;
    assert!(matches!(wrong, Err(AuthError::InvalidPassword)));
  }

  #[tokio::test]
  async fn test_signup_stores_hash_not_password() {
    let (service, repo) = service();

    signup(&service, "alice", "alice@x.com", "Secret123!")
      .await
      .unwrap();

    let stored = repo
      .find_by_email(&Email::new("alice@x.com").unwrap())
      .await
      .unwrap()
      .unwrap();
    assert_ne!(stored.password_hash.as_str(), "Secret123!");
    assert!(stored.password_hash.as_str().starts_with("$argon2id$"));
  }

  #[tokio::test]
  async fn test_duplicate_email_creates_no_record() {
    let (service, repo) = service();

    signup(&service, "alice", "alice@x.com", "Secret123!")
      .await
      .unwrap();
    let result = signup(&service, "bob", "ALICE@x.com", "Other!").await;

    assert!(matches!(result, Err(AuthError::DuplicateEmail)));
    assert_eq!(repo.len().await, 1);
    assert!(
      !repo
        .exists_by_username(&Username::new("bob").unwrap())
        .await
        .unwrap()
    );
  }

  #[tokio::test]
  async fn test_duplicate_username() {
    let (service, repo) = service();

    signup(&service, "alice", "alice@x.com", "Secret123!")
      .await
      .unwrap();
    let result = signup(&service, "alice", "other@x.com", "Other!").await;

    assert!(matches!(result, Err(AuthError::DuplicateUsername)));
    assert_eq!(repo.len().await, 1);
  }

  #[tokio::test]
  async fn test_duplicate_is_rejected_before_hashing() {
    let repo = Arc::new(InMemoryUserRepository::new());
    let hasher = Arc::new(CountingHasher {
      inner: fast_hasher(),
      hash_calls: AtomicUsize::new(0),
    });
    let service = AuthService::new(repo, hasher.clone());

    signup(&service, "alice", "alice@x.com", "Secret123!")
      .await
      .unwrap();
    assert_eq!(hasher.hash_calls.load(Ordering::SeqCst), 1);

    let _ = signup(&service, "bob", "alice@x.com", "Other!").await;
    let _ = signup(&service, "alice", "bob@x.com", "Other!").await;
    assert_eq!(hasher.hash_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_store_duplicate_after_precheck_is_reported() {
    let service = AuthService::new(Arc::new(RacingRepository), fast_hasher());

    let result = signup(&service, "alice", "alice@x.com", "Secret123!").await;
    assert!(matches!(result, Err(AuthError::DuplicateEmail)));
  }

  #[tokio::test]
  async fn test_concurrent_duplicate_signups_only_one_succeeds() {
    let (service, repo) = service();
    let service = Arc::new(service);

    let mut handles = Vec::new();
    for i in 0..8 {
      let service = service.clone();
      handles.push(tokio::spawn(async move {
        service
          .signup(
            Username::new(format!("user{}", i)).unwrap(),
            Email::new("same@x.com").unwrap(),
            Password::new("Secret123!").unwrap(),
          )
          .await
      }));
    }

    let mut successes = 0;
    for handle in handles {
      match handle.await.unwrap() {
        Ok(_) => successes += 1,
        Err(e) => assert!(matches!(e, AuthError::DuplicateEmail)),
      }
    }

    assert_eq!(successes, 1);
    assert_eq!(repo.len().await, 1);
  }

  #[tokio::test]
  async fn test_login_unknown_email() {
    let (service, _repo) = service();

    let result = login(&service, "nobody@x.com", "Secret123!").await;
    assert!(matches!(result, Err(AuthError::UserNotFound)));
  }

  #[tokio::test]
  async fn test_warm_up_prepares_timing_guard_once() {
    let hasher = Arc::new(CountingHasher {
      inner: fast_hasher(),
      hash_calls: AtomicUsize::new(0),
    });
    let service = AuthService::new(Arc::new(InMemoryUserRepository::new()), hasher.clone());

    service.warm_up().await.unwrap();
    service.warm_up().await.unwrap();
    assert_eq!(hasher.hash_calls.load(Ordering::SeqCst), 1);

    // A missing account now costs a verification only
    let result = login(&service, "nobody@x.com", "Secret123!").await;
    assert!(matches!(result, Err(AuthError::UserNotFound)));
    assert_eq!(hasher.hash_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_login_by_username() {
    let (service, _repo) = service();

    let alice = signup(&service, "alice", "alice@x.com", "Secret123!")
      .await
      .unwrap();

    let result = service
      .login(
        Username::new("alice").unwrap().into(),
        Password::new("Secret123!").unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(result, alice);

    let missing = service
      .login(
        Username::new("carol").unwrap().into(),
        Password::new("Secret123!").unwrap(),
      )
      .await;
    assert!(matches!(missing, Err(AuthError::UserNotFound)));
  }

  #[tokio::test]
  async fn test_login_with_corrupt_hash_is_malformed_hash() {
    let repo = Arc::new(InMemoryUserRepository::new());
    repo
      .save(NewUser::new(
        Username::new("alice").unwrap(),
        Email::new("alice@x.com").unwrap(),
        PasswordHash::new("not-a-hash"),
      ))
      .await
      .unwrap();
    let service = AuthService::new(repo, fast_hasher());

    let result = login(&service, "alice@x.com", "Secret123!").await;
    assert!(matches!(
      result,
      Err(AuthError::Hash(HashError::MalformedHash))
    ));
  }
}
