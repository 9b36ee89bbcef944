//! Infrastructure layer - storage backends.

mod memory;

pub use memory::{InsertMode, MemoryUserStore};
