use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{AuthResponse, LoginRequest, SignupRequest},
  errors::ApiError,
};
use crate::application::auth::{
  LoginUserCommand, LoginUserUseCase, SignupUserCommand, SignupUserUseCase,
};

/// Handler for user signup
///
/// POST /api/auth/signup
/// Body: SignupRequest (JSON)
/// Response: AuthResponse (JSON) with status 200
pub async fn signup_handler(
  request: web::Json<SignupRequest>,
  use_case: web::Data<Arc<SignupUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let SignupRequest {
    username,
    email,
    password,
  } = request.into_inner();

  let user = use_case
    .execute(SignupUserCommand {
      username,
      email,
      password,
    })
    .await?;

  Ok(HttpResponse::Ok().json(AuthResponse::new("User registered successfully", user)))
}

/// Handler for user login
///
/// POST /api/auth/login
/// Body: LoginRequest (JSON)
/// Response: AuthResponse (JSON) with status 200
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginUserUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let LoginRequest {
    email,
    username,
    password,
  } = request.into_inner();

  let user = use_case
    .execute(LoginUserCommand {
      email,
      username,
      password,
    })
    .await?;

  Ok(HttpResponse::Ok().json(AuthResponse::new("Login successful", user)))
}
