//! User registration and credential verification service
//!
//! Layers, innermost first:
//! - `domain`: value objects, the `User` entity, ports, and `AuthService`
//! - `application`: signup and login use cases
//! - `infrastructure`: Argon2 hasher, user stores, configuration
//! - `adapters`: actix-web HTTP boundary

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
