//! objmap - Typed object-to-keyspace mapping engine
//!
//! objmap projects typed entities onto a Redis-shaped key-value store and
//! keeps the auxiliary structures that make them queryable consistent with
//! every write: unique indexes, set indexes, and score-ordered rankings.
//!
//! # Quick Start
//!
//! ```ignore
//! use objmap::{EntityMapper, FieldValue, MemoryStore, Order};
//! use std::sync::Arc;
//!
//! let mapper = EntityMapper::new(Arc::new(MemoryStore::new()));
//!
//! // Insert a typed entity; indexes and rankings update with it
//! let mut player = Player::with_id("001");
//! player.set_name("alice");
//! player.set_star(5);
//! assert!(mapper.insert(&mut player)?);
//!
//! // Look it up by unique field, or walk the ranking
//! let found: Option<Player> = mapper.unique("Name", &FieldValue::from("alice"))?;
//! let top = mapper.range_ids::<Player>("Star", 0, 9, Order::Descending)?;
//! ```
//!
//! # Architecture
//!
//! Entity types declare their schema through the [`Entity`] trait; the
//! [`EntityMapper`] is the sole operational surface and talks to the store
//! through the [`Store`] trait. [`MemoryStore`] is the bundled in-memory
//! backend; network backends implement [`Store`] elsewhere.

pub use objmap_core::{
    pending_changes, ChangeSet, Entity, Error, FieldDescriptor, FieldKind, FieldValue, KeyError,
    PendingChange, Result, Schema, SchemaRegistry, ID_FIELD,
};
pub use objmap_mapper::EntityMapper;
pub use objmap_store::{Command, MemoryStore, Order, Reply, Store, StoreError, StoreResult};
