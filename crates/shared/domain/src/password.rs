//! Password capabilities - validation policy and one-way hashing.
//!
//! The Creator only sees the [`PasswordValidator`] and [`PasswordHasher`]
//! traits. The types below are the reference implementations.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

use crate::constants::{DEFAULT_HASH_COST, MAX_HASH_COST, MIN_HASH_COST, MIN_PASSWORD_LENGTH};
use crate::error::{DomainError, DomainResult};

/// Why a password was rejected by a validator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password length is too small (minimum {min} bytes)")]
    TooSmall { min: usize },

    #[error("password must contain at least one {0}")]
    MissingCharacterClass(&'static str),
}

/// Accepts or rejects a candidate password.
pub trait PasswordValidator: Send + Sync {
    fn validate(&self, password: &str) -> Result<(), PasswordError>;
}

/// Turns a plaintext password into an opaque, self-describing credential.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> DomainResult<HashedPassword>;

    /// Check a plaintext password against a stored credential.
    fn verify(&self, password: &str, hashed: &HashedPassword) -> DomainResult<bool>;
}

/// Opaque hashed credential as stored on a user record.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(Vec<u8>);

// Don't expose hash in debug output (security)
impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HashedPassword").field(&"[REDACTED]").finish()
    }
}

impl HashedPassword {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Validators
// =============================================================================

/// Rejects passwords shorter than a minimum length in bytes.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    min_len: usize,
}

impl MinLengthValidator {
    pub fn new(min_len: usize) -> Self {
        Self { min_len }
    }
}

impl Default for MinLengthValidator {
    fn default() -> Self {
        Self::new(MIN_PASSWORD_LENGTH)
    }
}

impl PasswordValidator for MinLengthValidator {
    fn validate(&self, password: &str) -> Result<(), PasswordError> {
        if password.len() < self.min_len {
            return Err(PasswordError::TooSmall { min: self.min_len });
        }
        Ok(())
    }
}

/// Minimum length plus at least one letter and one digit.
#[derive(Debug, Clone, Default)]
pub struct StrictPasswordValidator {
    length: MinLengthValidator,
}

impl StrictPasswordValidator {
    pub fn new(min_len: usize) -> Self {
        Self {
            length: MinLengthValidator::new(min_len),
        }
    }
}

impl PasswordValidator for StrictPasswordValidator {
    fn validate(&self, password: &str) -> Result<(), PasswordError> {
        self.length.validate(password)?;

        if !password.chars().any(char::is_alphabetic) {
            return Err(PasswordError::MissingCharacterClass("letter"));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordError::MissingCharacterClass("digit"));
        }
        Ok(())
    }
}

// =============================================================================
// Hasher
// =============================================================================

/// Argon2id hasher with a configurable time cost.
///
/// Output is a PHC string, so the parameters travel with the hash and
/// verification never needs the configured cost.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    cost: u32,
}

impl Argon2Hasher {
    /// Create a hasher. Costs outside `MIN_HASH_COST..=MAX_HASH_COST` fall
    /// back to `DEFAULT_HASH_COST`.
    pub fn new(cost: u32) -> Self {
        let cost = if (MIN_HASH_COST..=MAX_HASH_COST).contains(&cost) {
            cost
        } else {
            DEFAULT_HASH_COST
        };
        Self { cost }
    }

    /// Effective cost after clamping.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    fn argon2(&self) -> DomainResult<Argon2<'static>> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            self.cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| DomainError::hashing(format!("invalid argon2 parameters: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_COST)
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> DomainResult<HashedPassword> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DomainError::hashing(format!("password hash failed: {}", e)))?;
        Ok(HashedPassword(hash.to_string().into_bytes()))
    }

    fn verify(&self, password: &str, hashed: &HashedPassword) -> DomainResult<bool> {
        let encoded = std::str::from_utf8(hashed.as_bytes())
            .map_err(|e| DomainError::hashing(format!("invalid hash encoding: {}", e)))?;
        let parsed = PasswordHash::new(encoded)
            .map_err(|e| DomainError::hashing(format!("invalid hash format: {}", e)))?;

        // Parameters come from the PHC string, not from self.cost
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DomainError::hashing(format!("password verify failed: {}", e))),
        }
    }
}
