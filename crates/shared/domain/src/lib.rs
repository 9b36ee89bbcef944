//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user entity, its creation inputs, the domain error taxonomy, and the
//! password capabilities (validation policy and hashing).

pub mod constants;
pub mod error;
pub mod password;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use password::{
    Argon2Hasher, HashedPassword, MinLengthValidator, PasswordError, PasswordHasher,
    PasswordValidator, StrictPasswordValidator,
};
pub use user::{generate_user_id, CreateParams, InsertParams, User, UserRole};
