//! Repository layer - data access abstraction.

mod user_repository;

pub use user_repository::{UserCommands, UserQueries};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::{MockUserCommands, MockUserQueries};
