use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::{NewUser, User},
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
  value_objects::{Email, Username},
};

const EMAIL_CONSTRAINT: &str = "users_email_key";
const USERNAME_CONSTRAINT: &str = "users_username_key";

/// PostgreSQL implementation of the UserRepository trait
///
/// Uniqueness is enforced by the `users_email_key` and `users_username_key`
/// constraints; violations are reported as the matching duplicate error.
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  username: String,
  email: String,
  password_hash: String,
  created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(
      row.id,
      row.username,
      row.email,
      row.password_hash,
      row.created_at,
    )
  }
}

/// Maps an insert failure to a domain error, naming the violated constraint
fn map_insert_error(error: sqlx::Error) -> AuthError {
  if let sqlx::Error::Database(db_err) = &error {
    if db_err.is_unique_violation() {
      return match db_err.constraint() {
        Some(EMAIL_CONSTRAINT) => AuthError::DuplicateEmail,
        Some(USERNAME_CONSTRAINT) => AuthError::DuplicateUsername,
        other => AuthError::Repository(RepositoryError::DuplicateKey(
          other.unwrap_or("unknown").to_string(),
        )),
      };
    }
  }

  error.into()
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn exists_by_email(&self, email: &Email) -> Result<bool, AuthError> {
    let exists =
      sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

    Ok(exists)
  }

  async fn exists_by_username(&self, username: &Username) -> Result<bool, AuthError> {
    let exists =
      sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await?;

    Ok(exists)
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
    )
    .bind(email.as_str())
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
    )
    .bind(username.as_str())
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn save(&self, user: NewUser) -> Result<User, AuthError> {
    let user = User::from_new(user);

    let row = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, created_at
            "#,
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(user.password_hash.as_str())
    .bind(user.created_at)
    .fetch_one(&self.pool)
    .await
    .map_err(map_insert_error)?;

    Ok(row.into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::value_objects::PasswordHash;
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    // Start a PostgreSQL container
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .expect("Failed to run migrations");

    (pool, container)
  }

  fn new_user(username: &str, email: &str) -> NewUser {
    NewUser::new(
      Username::new(username).unwrap(),
      Email::new(email).unwrap(),
      PasswordHash::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$ZGlnZXN0"),
    )
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_save_and_find() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    let saved = repo.save(new_user("alice", "alice@x.com")).await.unwrap();
    assert_eq!(saved.username, "alice");

    let email = Email::new("alice@x.com").unwrap();
    let found = repo.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.id, saved.id);
    assert_eq!(found.password_hash, saved.password_hash);

    let username = Username::new("alice").unwrap();
    let found = repo.find_by_username(&username).await.unwrap().unwrap();
    assert_eq!(found.id, saved.id);

    assert!(repo.exists_by_email(&email).await.unwrap());
    assert!(repo.exists_by_username(&username).await.unwrap());
    assert!(
      !repo
        .exists_by_email(&Email::new("bob@x.com").unwrap())
        .await
        .unwrap()
    );
  }

  #[tokio::test]
  #[ignore = "requires docker"]
  async fn test_duplicate_constraints() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresUserRepository::new(pool);

    repo.save(new_user("alice", "alice@x.com")).await.unwrap();

    let result = repo.save(new_user("bob", "alice@x.com")).await;
    assert!(matches!(result, Err(AuthError::DuplicateEmail)));

    let result = repo.save(new_user("alice", "carol@x.com")).await;
    assert!(matches!(result, Err(AuthError::DuplicateUsername)));
  }
}
