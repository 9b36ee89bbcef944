//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (transport, storage engine).

use thiserror::Error;

use crate::password::PasswordError;

/// Broad class of a [`DomainError`], used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; retry only after fixing it
    Validation,
    /// Collides with an existing record; not retryable with the same input
    Conflict,
    /// Lookup miss
    NotFound,
    /// Storage, hashing or deadline failure; the caller decides on retries
    Infrastructure,
}

/// Domain-specific errors for user creation and lookup.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid username")]
    InvalidUsername,

    #[error("invalid role '{0}'. Valid roles are user and admin")]
    InvalidRole(String),

    #[error("invalid password: {0}")]
    InvalidPassword(#[source] PasswordError),

    #[error("this ID is already in use")]
    IdAlreadyExists,

    #[error("this username is already in use")]
    UsernameAlreadyExists,

    #[error("user does not exist")]
    DoesNotExist,

    /// Password hashing or hash parsing failed
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Backing store failure
    #[error("storage error: {0}")]
    Storage(String),

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl DomainError {
    /// Create a hashing error
    pub fn hashing(msg: impl Into<String>) -> Self {
        DomainError::Hashing(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        DomainError::Storage(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidUsername
            | DomainError::InvalidRole(_)
            | DomainError::InvalidPassword(_) => ErrorKind::Validation,
            DomainError::IdAlreadyExists | DomainError::UsernameAlreadyExists => {
                ErrorKind::Conflict
            }
            DomainError::DoesNotExist => ErrorKind::NotFound,
            DomainError::Hashing(_) | DomainError::Storage(_) | DomainError::DeadlineExceeded => {
                ErrorKind::Infrastructure
            }
        }
    }
}

impl From<PasswordError> for DomainError {
    fn from(err: PasswordError) -> Self {
        DomainError::InvalidPassword(err)
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
