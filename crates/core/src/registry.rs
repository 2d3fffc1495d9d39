//! Schema registry: fill-once, read-mostly cache of per-type schemas
//!
//! The registry is an explicit object owned by (or shared with) the mapper,
//! not ambient process-global state. The first reference to an entity type
//! builds and validates its schema; later lookups hit the cache.
//!
//! ## Conflict detection
//!
//! Rust type names are not globally unique across crates, and `TYPE_NAME` is
//! a free-form constant, so two distinct types could claim the same name and
//! silently share a keyspace. The registry keeps a `name -> TypeId` map and
//! fails the second registration with `SchemaConflict` instead.
//!
//! ## Concurrency
//!
//! Read-through cache behind a `parking_lot::RwLock`: lookups take the read
//! lock; a miss upgrades to the write lock, re-checks, builds, inserts.

use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::schema::Schema;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct RegistryState {
    by_type: HashMap<TypeId, Arc<Schema>>,
    by_name: HashMap<&'static str, TypeId>,
}

/// Fill-once cache of per-type schemas with name-conflict detection
#[derive(Default)]
pub struct SchemaRegistry {
    state: RwLock<RegistryState>,
}

impl SchemaRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The schema for `E`, building and caching it on first use
    pub fn schema_for<E: Entity + 'static>(&self) -> Result<Arc<Schema>> {
        let type_id = TypeId::of::<E>();
        if let Some(schema) = self.state.read().by_type.get(&type_id) {
            return Ok(Arc::clone(schema));
        }

        let mut state = self.state.write();
        // Re-check: another thread may have built it between the locks.
        if let Some(schema) = state.by_type.get(&type_id) {
            return Ok(Arc::clone(schema));
        }
        match state.by_name.get(E::TYPE_NAME) {
            Some(owner) if *owner != type_id => {
                return Err(Error::SchemaConflict(E::TYPE_NAME.to_string()));
            }
            _ => {}
        }

        let schema = Arc::new(Schema::build(E::TYPE_NAME, E::descriptors())?);
        state.by_name.insert(E::TYPE_NAME, type_id);
        state.by_type.insert(type_id, Arc::clone(&schema));
        Ok(schema)
    }
}
