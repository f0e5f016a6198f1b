use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth::{
  entities::{NewUser, User},
  errors::AuthError,
  ports::UserRepository,
  value_objects::{Email, Username},
};

/// Process-local implementation of the UserRepository trait
///
/// Used when no database is configured. Uniqueness checks and the insert
/// happen under a single write lock, so concurrent saves of the same email
/// or username cannot both succeed.
#[derive(Default)]
pub struct InMemoryUserRepository {
  users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of stored users
  pub async fn len(&self) -> usize {
    self.users.read().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.users.read().await.is_empty()
  }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
  async fn exists_by_email(&self, email: &Email) -> Result<bool, AuthError> {
    let users = self.users.read().await;
    Ok(users.values().any(|u| u.email == email.as_str()))
  }

  async fn exists_by_username(&self, username: &Username) -> Result<bool, AuthError> {
    let users = self.users.read().await;
    Ok(users.values().any(|u| u.username == username.as_str()))
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let users = self.users.read().await;
    Ok(users.values().find(|u| u.email == email.as_str()).cloned())
  }

  async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
    let users = self.users.read().await;
    Ok(
      users
        .values()
        .find(|u| u.username == username.as_str())
        .cloned(),
    )
  }

  async fn save(&self, user: NewUser) -> Result<User, AuthError> {
    let mut users = self.users.write().await;

    if users.values().any(|u| u.email == user.email.as_str()) {
      return Err(AuthError::DuplicateEmail);
    }

    if users.values().any(|u| u.username == user.username.as_str()) {
      return Err(AuthError::DuplicateUsername);
    }

    let user = User::from_new(user);
    users.insert(user.id, user.clone());

    Ok(user)
  }
}
