//! objmap-store: the external-store boundary
//!
//! The mapping layer talks to its key-value store exclusively through the
//! [`Store`] trait defined here: existence checks, hash records, sets,
//! score-ordered sets, and batched command submission. This crate also ships
//! [`MemoryStore`], a thread-safe in-memory backend that doubles as the
//! executable contract of the trait for tests.
//!
//! Wire protocols, connection pooling, timeouts and retries are owned by
//! backend implementations, never by this boundary.

pub mod command;
pub mod error;
pub mod memory;
pub mod traits;
mod zset;

pub use command::{Command, Order, Reply};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::Store;
pub use zset::SortedSet;
