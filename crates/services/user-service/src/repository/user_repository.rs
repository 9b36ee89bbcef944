//! User repository capabilities, split into queries and commands.
//!
//! The Creator depends on these traits only. A backend may implement either
//! side on its own, and tests can supply a narrow fake for just one of them.

use async_trait::async_trait;

use domain::{DomainResult, InsertParams, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read side (Query).
///
/// Lookups fail with `DomainError::DoesNotExist` on a miss; any other error
/// is an infrastructure failure.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserQueries: Send + Sync {
    /// Find user by exact ID
    async fn get_by_id(&self, id: &str) -> DomainResult<User>;

    /// Find user by username
    async fn get_by_username(&self, username: &str) -> DomainResult<User>;
}

/// Write side (Command).
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserCommands: Send + Sync {
    /// Store a new user and return the record as persisted.
    ///
    /// The store owns `created_at`. Backends that enforce uniqueness report
    /// collisions as `IdAlreadyExists` / `UsernameAlreadyExists`.
    async fn insert(&self, params: InsertParams) -> DomainResult<User>;
}
