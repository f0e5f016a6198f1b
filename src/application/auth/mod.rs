//! Authentication use cases
//!
//! These turn raw request fields into validated value objects and hand them
//! to the domain `AuthService`.

mod login_user;
mod signup_user;

pub use login_user::{LoginIdentifierPolicy, LoginUserCommand, LoginUserUseCase};
pub use signup_user::{SignupUserCommand, SignupUserUseCase};
