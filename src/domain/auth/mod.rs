pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{NewUser, User, UserProfile};
pub use errors::{AuthError, HashError, RepositoryError, ValidationError};
pub use value_objects::{Email, LoginIdentifier, Password, PasswordHash, Username};
