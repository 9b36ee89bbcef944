//! User service configuration.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use common::{AppError, AppResult, ServiceConfig};
use domain::{
    Argon2Hasher, MinLengthValidator, PasswordHasher, PasswordValidator, StrictPasswordValidator,
    DEFAULT_HASH_COST, MIN_PASSWORD_LENGTH,
};

use crate::infra::InsertMode;

const ENV_PREFIX: &str = "USER_SERVICE";

/// Which password policy new users must satisfy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordPolicy {
    /// Minimum length only
    #[default]
    Length,
    /// Minimum length plus a letter and a digit
    Strict,
}

impl FromStr for PasswordPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "length" => Ok(PasswordPolicy::Length),
            "strict" => Ok(PasswordPolicy::Strict),
            other => Err(AppError::config(format!(
                "unknown password policy '{}', expected 'length' or 'strict'",
                other
            ))),
        }
    }
}

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    pub service: ServiceConfig,
    /// Minimum password length
    pub password_min_length: usize,
    pub password_policy: PasswordPolicy,
    /// Argon2 time cost, clamped by the hasher
    pub hash_cost: u32,
    pub insert_mode: InsertMode,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        config.service = ServiceConfig::from_env("user-service", ENV_PREFIX);
        Ok(config)
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}_{}", ENV_PREFIX, name));

        let password_policy = match var("PASSWORD_POLICY") {
            Some(raw) => raw.parse()?,
            None => PasswordPolicy::default(),
        };

        let insert_mode = match var("STORE_INSERT_MODE") {
            Some(raw) => parse_insert_mode(&raw)?,
            None => InsertMode::default(),
        };

        Ok(Self {
            service: ServiceConfig {
                service_name: "user-service".to_string(),
                ..ServiceConfig::default()
            },
            password_min_length: parse_or(
                "PASSWORD_MIN_LENGTH",
                var("PASSWORD_MIN_LENGTH"),
                MIN_PASSWORD_LENGTH,
            ),
            password_policy,
            hash_cost: parse_or("HASH_COST", var("HASH_COST"), DEFAULT_HASH_COST),
            insert_mode,
        })
    }

    /// Build the configured password validator.
    pub fn password_validator(&self) -> Arc<dyn PasswordValidator> {
        match self.password_policy {
            PasswordPolicy::Length => Arc::new(MinLengthValidator::new(self.password_min_length)),
            PasswordPolicy::Strict => {
                Arc::new(StrictPasswordValidator::new(self.password_min_length))
            }
        }
    }

    /// Build the configured password hasher.
    pub fn password_hasher(&self) -> Arc<dyn PasswordHasher> {
        let hasher = Argon2Hasher::new(self.hash_cost);
        if hasher.cost() != self.hash_cost {
            tracing::warn!(
                requested = self.hash_cost,
                effective = hasher.cost(),
                "hash cost out of range, using default"
            );
        }
        Arc::new(hasher)
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "user-service".to_string(),
                ..ServiceConfig::default()
            },
            password_min_length: MIN_PASSWORD_LENGTH,
            password_policy: PasswordPolicy::Length,
            hash_cost: DEFAULT_HASH_COST,
            insert_mode: InsertMode::RejectDuplicates,
        }
    }
}

fn parse_insert_mode(raw: &str) -> AppResult<InsertMode> {
    match raw.to_ascii_lowercase().as_str() {
        "reject_duplicates" => Ok(InsertMode::RejectDuplicates),
        "overwrite" => Ok(InsertMode::Overwrite),
        other => Err(AppError::config(format!(
            "unknown store insert mode '{}', expected 'reject_duplicates' or 'overwrite'",
            other
        ))),
    }
}

/// Parse a numeric setting, keeping the default when it is malformed.
fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(
                "{}_{}='{}' is not valid, using default {}",
                ENV_PREFIX,
                name,
                raw,
                default
            );
            default
        }),
        None => default,
    }
}
