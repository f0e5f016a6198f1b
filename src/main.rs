use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use credential_service::{
  adapters::http::{RequestIdMiddleware, configure_auth_routes, health_check},
  application::auth::{LoginUserUseCase, SignupUserUseCase},
  domain::auth::{ports::UserRepository, services::AuthService},
  infrastructure::{
    config::{Config, DatabaseConfig},
    persistence::{memory::InMemoryUserRepository, postgres::PostgresUserRepository},
    security::Argon2PasswordHasher,
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "credential_service=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting credential service");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  let user_repo: Arc<dyn UserRepository> = match &config.database {
    Some(database) => Arc::new(PostgresUserRepository::new(connect_database(database).await?)),
    None => {
      tracing::warn!("No database configured, users are kept in memory only");
      Arc::new(InMemoryUserRepository::new())
    }
  };

  let hasher_params = config.security.argon2;
  let password_hasher = Arc::new(
    Argon2PasswordHasher::with_params(hasher_params)
      .context("Failed to create password hasher")?,
  );
  tracing::info!(
    "Argon2id hasher ready: m={} t={} p={}",
    hasher_params.memory_kib,
    hasher_params.iterations,
    hasher_params.parallelism
  );

  let auth_service = Arc::new(AuthService::new(user_repo, password_hasher));
  auth_service
    .warm_up()
    .await
    .context("Failed to prepare timing guard hash")?;

  let signup_use_case = Arc::new(SignupUserUseCase::new(auth_service.clone()));
  let login_use_case = Arc::new(LoginUserUseCase::new(
    auth_service,
    config.auth.login_identifier,
  ));
  tracing::info!(
    "Login identifier policy: {:?}",
    config.auth.login_identifier
  );

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    App::new()
      .wrap(Logger::default())
      .wrap(RequestIdMiddleware::new())
      .service(web::scope("/api/auth").configure(|cfg| {
        configure_auth_routes(cfg, signup_use_case.clone(), login_use_case.clone())
      }))
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))
  .with_context(|| format!("Failed to bind {}:{}", server_host, server_port))?
  .run()
  .await
  .context("HTTP server failed")?;

  Ok(())
}

/// Connects to PostgreSQL and applies pending migrations
async fn connect_database(database: &DatabaseConfig) -> anyhow::Result<sqlx::PgPool> {
  tracing::info!("Connecting to database");

  let pool = tokio::time::timeout(
    Duration::from_secs(database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(database.max_connections)
      .acquire_timeout(Duration::from_secs(database.acquire_timeout_seconds))
      .connect(&database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      database.connect_timeout_seconds
    );
    anyhow::anyhow!(
      "Database connection timed out after {} seconds",
      database.connect_timeout_seconds
    )
  })?
  .context("Failed to connect to database")?;

  tracing::info!("Database connection pool created");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  Ok(pool)
}
