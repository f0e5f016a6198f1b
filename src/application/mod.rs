//! Application layer
//!
//! Use cases that orchestrate domain services to implement the signup and
//! login workflows.

pub mod auth;
