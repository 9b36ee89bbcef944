//! In-memory user store.
//!
//! Records live in a `HashMap` keyed by ID behind a `tokio::sync::RwLock`:
//! lookups share the read lock, inserts take the write lock. Username lookup
//! is a full scan, which is fine for small record counts only.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use domain::{DomainError, DomainResult, HashedPassword, InsertParams, User, UserRole};

use crate::repository::{UserCommands, UserQueries};

/// How `insert` treats an existing ID or username.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsertMode {
    /// Fail with `IdAlreadyExists` / `UsernameAlreadyExists`, checked under
    /// the write lock.
    #[default]
    RejectDuplicates,
    /// Always succeed, replacing any record with the same ID. Uniqueness then
    /// rests on the Creator's pre-checks alone, which race.
    Overwrite,
}

/// Stored shape of a user.
#[derive(Debug, Clone)]
struct UserRecord {
    id: String,
    username: String,
    hashed_password: HashedPassword,
    role: UserRole,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    fn to_domain(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            hashed_password: self.hashed_password.clone(),
            role: self.role,
            created_at: self.created_at,
            deleted_at: self.deleted_at,
        }
    }
}

/// In-memory implementation of [`UserQueries`] and [`UserCommands`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
    mode: InsertMode,
}

impl MemoryUserStore {
    /// Create an empty store that rejects duplicates at insert time.
    pub fn new() -> Self {
        Self::with_mode(InsertMode::RejectDuplicates)
    }

    pub fn with_mode(mode: InsertMode) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            mode,
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserQueries for MemoryUserStore {
    async fn get_by_id(&self, id: &str) -> DomainResult<User> {
        self.users
            .read()
            .await
            .get(id)
            .map(UserRecord::to_domain)
            .ok_or(DomainError::DoesNotExist)
    }

    async fn get_by_username(&self, username: &str) -> DomainResult<User> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .map(UserRecord::to_domain)
            .ok_or(DomainError::DoesNotExist)
    }
}

#[async_trait]
impl UserCommands for MemoryUserStore {
    async fn insert(&self, params: InsertParams) -> DomainResult<User> {
        let mut users = self.users.write().await;

        if self.mode == InsertMode::RejectDuplicates {
            if users.contains_key(&params.id) {
                return Err(DomainError::IdAlreadyExists);
            }
            if users.values().any(|u| u.username == params.username) {
                return Err(DomainError::UsernameAlreadyExists);
            }
        }

        let record = UserRecord {
            id: params.id,
            username: params.username,
            hashed_password: params.hashed_password,
            role: params.role,
            created_at: Utc::now(),
            deleted_at: None,
        };
        let user = record.to_domain();

        if users.insert(record.id.clone(), record).is_some() {
            tracing::warn!(user_id = %user.id, "overwrote existing user record");
        }
        tracing::debug!(user_id = %user.id, total = users.len(), "user record stored");

        Ok(user)
    }
}
