//! User service - the entry point handed to callers.
//!
//! Creation goes through the [`Creator`]; lookups go straight to the query
//! side of the repository.

use async_trait::async_trait;
use std::sync::Arc;

use domain::{CreateParams, DomainResult, User};

use crate::repository::UserQueries;
use crate::service::Creator;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a new user
    async fn create_user(&self, params: CreateParams) -> DomainResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: &str) -> DomainResult<User>;

    /// Get user by username
    async fn get_user_by_username(&self, username: &str) -> DomainResult<User>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    creator: Creator,
    queries: Arc<dyn UserQueries>,
}

impl UserManager {
    pub fn new(creator: Creator, queries: Arc<dyn UserQueries>) -> Self {
        Self { creator, queries }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, params: CreateParams) -> DomainResult<User> {
        self.creator.create(params).await
    }

    async fn get_user(&self, id: &str) -> DomainResult<User> {
        self.queries.get_by_id(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<User> {
        self.queries.get_by_username(username).await
    }
}
