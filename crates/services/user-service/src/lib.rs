//! User Service Library
//!
//! Creates users with a unique ID and username, a validated and hashed
//! password, and a role, and looks them up by ID or username.
//!
//! - [`service::Creator`] holds the creation rules.
//! - [`repository`] defines the query/command capabilities it depends on.
//! - [`infra::MemoryUserStore`] is the in-memory backend.

pub mod config;
pub mod import;
pub mod infra;
pub mod repository;
pub mod service;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use common::{AppError, AppResult};
use domain::{CreateParams, User};

use crate::config::UserServiceConfig;
use crate::import::ImportSummary;
use crate::infra::MemoryUserStore;
use crate::service::{Creator, UserManager, UserService};

/// Wire a store, the configured password capabilities and a Creator.
///
/// The returned store is the same instance the service reads and writes.
pub fn build_user_manager(config: &UserServiceConfig) -> (Arc<MemoryUserStore>, UserManager) {
    let store = Arc::new(MemoryUserStore::with_mode(config.insert_mode));

    let creator = Creator::new(
        config.password_validator(),
        config.password_hasher(),
        store.clone(),
        store.clone(),
    );
    let manager = UserManager::new(creator, store.clone());

    (store, manager)
}

/// Create a single user in a fresh store and read it back.
pub async fn run_create(config: &UserServiceConfig, params: CreateParams) -> AppResult<User> {
    let (_store, service) = build_user_manager(config);

    let user = service.create_user(params).await?;

    let by_id = service.get_user(&user.id).await?;
    let by_username = service.get_user_by_username(&user.username).await?;
    if by_id != user || by_username != user {
        return Err(AppError::internal("stored user does not match the created user"));
    }

    info!(user_id = %user.id, "user created and verified");
    Ok(user)
}

/// Import users from a file into a fresh store.
pub async fn run_import(config: &UserServiceConfig, path: &Path) -> AppResult<ImportSummary> {
    let (store, service) = build_user_manager(config);

    let summary = import::import_file(&service, path).await?;
    info!(stored = store.len().await, "import complete");

    Ok(summary)
}
