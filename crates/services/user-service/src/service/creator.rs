//! User creation workflow.
//!
//! Checks run in a fixed order and stop at the first failure:
//! ID collision, username presence, role validity, username collision,
//! password policy. Only then is the password hashed, the ID and role
//! defaulted, and the record inserted. Nothing is written on any failure path.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use domain::{
    generate_user_id, CreateParams, DomainError, DomainResult, ErrorKind, HashedPassword,
    InsertParams, PasswordHasher, PasswordValidator, User, UserRole,
};

use crate::repository::{UserCommands, UserQueries};

/// Orchestrates user creation over injected collaborators.
pub struct Creator {
    validator: Arc<dyn PasswordValidator>,
    hasher: Arc<dyn PasswordHasher>,
    queries: Arc<dyn UserQueries>,
    commands: Arc<dyn UserCommands>,
}

impl Creator {
    pub fn new(
        validator: Arc<dyn PasswordValidator>,
        hasher: Arc<dyn PasswordHasher>,
        queries: Arc<dyn UserQueries>,
        commands: Arc<dyn UserCommands>,
    ) -> Self {
        Self {
            validator,
            hasher,
            queries,
            commands,
        }
    }

    /// Validate, hash and insert a new user.
    #[instrument(skip_all, fields(username = %params.username))]
    pub async fn create(&self, params: CreateParams) -> DomainResult<User> {
        match self.try_create(params).await {
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, "user created");
                Ok(user)
            }
            Err(err) => {
                if err.kind() == ErrorKind::Infrastructure {
                    warn!(error = %err, "user creation failed");
                } else {
                    debug!(error = %err, "user creation rejected");
                }
                Err(err)
            }
        }
    }

    /// Like [`Creator::create`], but gives up with `DeadlineExceeded` once
    /// `timeout` elapses. The insert is the last step, so an expired deadline
    /// never leaves a partial write behind.
    pub async fn create_with_deadline(
        &self,
        params: CreateParams,
        timeout: Duration,
    ) -> DomainResult<User> {
        tokio::time::timeout(timeout, self.create(params))
            .await
            .map_err(|_| {
                warn!(?timeout, "user creation timed out");
                DomainError::DeadlineExceeded
            })?
    }

    async fn try_create(&self, params: CreateParams) -> DomainResult<User> {
        let role = self.check_create_params(&params).await?;

        let CreateParams {
            id,
            username,
            password,
            ..
        } = params;

        let hashed_password = self.hash_password(password).await?;

        let insert_params = InsertParams {
            id: id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(generate_user_id),
            username,
            hashed_password,
            role: role.unwrap_or_default(),
        };

        self.commands.insert(insert_params).await
    }

    /// Returns the parsed role when one was supplied.
    async fn check_create_params(&self, params: &CreateParams) -> DomainResult<Option<UserRole>> {
        if let Some(id) = params.requested_id() {
            match self.queries.get_by_id(id).await {
                Ok(_) => return Err(DomainError::IdAlreadyExists),
                Err(DomainError::DoesNotExist) => {}
                Err(err) => return Err(err),
            }
        }

        if params.username.is_empty() {
            return Err(DomainError::InvalidUsername);
        }

        let role = params
            .requested_role()
            .map(str::parse::<UserRole>)
            .transpose()?;

        match self.queries.get_by_username(&params.username).await {
            Ok(_) => return Err(DomainError::UsernameAlreadyExists),
            Err(DomainError::DoesNotExist) => {}
            Err(err) => return Err(err),
        }

        self.validator.validate(&params.password)?;

        Ok(role)
    }

    /// Hashing is CPU-bound, so it runs on the blocking pool.
    async fn hash_password(&self, password: String) -> DomainResult<HashedPassword> {
        let hasher = Arc::clone(&self.hasher);
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::hashing(format!("hashing task failed: {}", e)))??;

        if hashed.is_empty() {
            return Err(DomainError::hashing("hasher returned an empty credential"));
        }
        Ok(hashed)
    }
}
