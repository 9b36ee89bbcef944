//! Service layer - user use cases.

mod creator;
mod user_service;

pub use creator::Creator;
pub use user_service::{UserManager, UserService};
