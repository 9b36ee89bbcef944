//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_USER: &str = "user";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// Password policy
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Password hashing (Argon2 time cost)
// =============================================================================

/// Lowest accepted hashing cost
pub const MIN_HASH_COST: u32 = argon2::Params::MIN_T_COST;

/// Highest accepted hashing cost
pub const MAX_HASH_COST: u32 = argon2::Params::MAX_T_COST;

/// Cost used when none is configured or the configured one is out of range
pub const DEFAULT_HASH_COST: u32 = argon2::Params::DEFAULT_T_COST;
