//! Unified error classification for callers of the core.
//!
//! `AppError` is the transport-neutral view of a failure: a stable code a
//! transport layer can map to its own status values, and a user-facing
//! message that hides infrastructure details.

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Validation
    #[error("{message}")]
    Validation { code: &'static str, message: String },

    // Resource errors
    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    #[error("Resource not found")]
    NotFound,

    // Process-level errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { code, .. } | AppError::Conflict { code, .. } => *code,
            AppError::NotFound => "NOT_FOUND",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller can expect success by retrying unchanged input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Internal(_) | AppError::Io(_))
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation { message, .. } | AppError::Conflict { message, .. } => {
                message.clone()
            }

            // Hide details for internal errors
            AppError::Io(e) => {
                tracing::error!("I/O error: {:?}", e);
                "An I/O error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }

    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        AppError::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::InvalidUsername => AppError::validation("INVALID_USERNAME", message),
            DomainError::InvalidRole(_) => AppError::validation("INVALID_ROLE", message),
            DomainError::InvalidPassword(_) => AppError::validation("INVALID_PASSWORD", message),
            DomainError::IdAlreadyExists => AppError::conflict("ID_ALREADY_EXISTS", message),
            DomainError::UsernameAlreadyExists => {
                AppError::conflict("USERNAME_ALREADY_EXISTS", message)
            }
            DomainError::DoesNotExist => AppError::NotFound,
            DomainError::Hashing(_) | DomainError::Storage(_) | DomainError::DeadlineExceeded => {
                AppError::Internal(message)
            }
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;
