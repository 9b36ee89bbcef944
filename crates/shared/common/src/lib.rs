//! Common utilities shared across services.
//!
//! This crate provides:
//! - Error classification for domain failures
//! - Configuration structures
//! - Tracing initialisation

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::*;
pub use error::{AppError, AppResult};
pub use telemetry::init_tracing;
