//! EntityMapper: CRUD and query orchestration over a `Store`
//!
//! ## Design
//!
//! The mapper is a stateless facade over an injected store handle: it owns
//! no data beyond the schema registry, and each operation is one or two
//! round trips (pre-checks, then a pipelined batch). For every write it
//! keeps three families of auxiliary structures consistent with the primary
//! hash record:
//!
//! - unique indexes: `{Type}:_X:{Field}:{value}` -> id (plain string key)
//! - set indexes:    `{Type}:_X:{Field}:{value}` -> set of ids
//! - rankings:       `{Type}:_S:{Field}` -> ids scored by field value
//!
//! ## Consistency contract
//!
//! Uniqueness is enforced by checking the target keys *before* submitting
//! the write batch. The check and the batch are separate round trips, so
//! two concurrent writers can both pass the check and both write; callers
//! observe such collisions as an `Ok(false)` on a later operation, not as a
//! guarantee. A batch itself is pipelined for efficiency but is not a
//! transaction: a mid-batch store failure can leave indexes and the primary
//! record inconsistent. Single-writer-per-entity callers get full
//! consistency.
//!
//! ## Tracking
//!
//! Operations that hand an entity to the caller (`insert`, `query`) seed
//! its before-value cache with the just-written/loaded values and enable
//! change recording unless asked not to. `update` then flushes exactly the
//! fields whose current value differs from the cache.

use objmap_core::codec;
use objmap_core::entity::{pending_changes, Entity, PendingChange};
use objmap_core::error::{Error, Result};
use objmap_core::field::FieldValue;
use objmap_core::key;
use objmap_core::schema::{FieldDescriptor, Schema, ID_FIELD};
use objmap_core::registry::SchemaRegistry;
use objmap_store::{Command, Order, Store};
use std::sync::Arc;
use tracing::{debug, warn};

/// Facade mapping typed entities onto a key-value store
///
/// Cheap to clone; clones share the store handle and the schema registry.
///
/// # Example
///
/// ```ignore
/// use objmap_mapper::EntityMapper;
/// use objmap_store::MemoryStore;
///
/// let mapper = EntityMapper::new(Arc::new(MemoryStore::new()));
/// let mut player = Player::with_id("001");
/// player.set_name("alice");
/// assert!(mapper.insert(&mut player)?);
/// let loaded: Option<Player> = mapper.query("001")?;
/// ```
pub struct EntityMapper<S> {
    store: Arc<S>,
    registry: Arc<SchemaRegistry>,
}

impl<S> Clone for EntityMapper<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S: Store> EntityMapper<S> {
    /// Create a mapper with its own schema registry
    pub fn new(store: Arc<S>) -> Self {
        Self::with_registry(store, Arc::new(SchemaRegistry::new()))
    }

    /// Create a mapper sharing an existing schema registry
    pub fn with_registry(store: Arc<S>, registry: Arc<SchemaRegistry>) -> Self {
        Self { store, registry }
    }

    /// The underlying store handle
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The schema registry this mapper resolves types through
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    // ========== Insert ==========

    /// Insert an entity, enabling change tracking on success
    ///
    /// Returns `Ok(false)` if the primary key or any unique-indexed field
    /// value is already taken; in that case nothing is written.
    pub fn insert<E: Entity + 'static>(&self, entity: &mut E) -> Result<bool> {
        self.insert_with(entity, true)
    }

    /// Insert with explicit control over change tracking
    pub fn insert_with<E: Entity + 'static>(&self, entity: &mut E, tracking: bool) -> Result<bool> {
        match self.try_insert(entity, tracking) {
            Ok(()) => Ok(true),
            Err(Error::DuplicateKey(key)) => {
                debug!(key = %key, "insert rejected: primary key exists");
                Ok(false)
            }
            Err(Error::UniqueConstraint { field, key }) => {
                debug!(field = %field, key = %key, "insert rejected: unique index occupied");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Insert, surfacing collisions as errors instead of `false`
    ///
    /// All existence pre-checks run before any write is issued. The write
    /// itself is one pipelined batch: index entries, ranking entries, and
    /// the full primary record (including the reserved `Id` field).
    pub fn try_insert<E: Entity + 'static>(&self, entity: &mut E, tracking: bool) -> Result<()> {
        let schema = self.registry.schema_for::<E>()?;
        let id = entity.id().to_string();
        let primary = key::primary_key(schema.type_name(), &id)?;

        if self.store.exists(&primary)? {
            return Err(Error::DuplicateKey(primary));
        }

        let snapshot = snapshot_fields(entity, &schema)?;

        // All uniqueness pre-checks before the first write.
        for (field, _, raw) in &snapshot {
            if !field.is_unique() {
                continue;
            }
            let index = key::index_key(schema.type_name(), field.name(), raw)?;
            if self.store.exists(&index)? {
                return Err(Error::UniqueConstraint {
                    field: field.name().to_string(),
                    key: index,
                });
            }
        }

        let mut batch = Vec::with_capacity(snapshot.len() + 1);
        let mut entries = Vec::with_capacity(snapshot.len() + 1);
        entries.push((ID_FIELD.to_string(), id.clone()));
        for (field, value, raw) in &snapshot {
            if field.is_index() {
                let index = key::index_key(schema.type_name(), field.name(), raw)?;
                if field.is_unique() {
                    batch.push(Command::Set {
                        key: index,
                        value: id.clone(),
                    });
                } else {
                    batch.push(Command::SAdd {
                        key: index,
                        member: id.clone(),
                    });
                }
            }
            if field.is_sortable() {
                batch.push(Command::ZAdd {
                    key: key::sorted_key(schema.type_name(), field.name())?,
                    score: score_of(&schema, field, value)?,
                    member: id.clone(),
                });
            }
            entries.push((field.name().to_string(), raw.clone()));
        }
        batch.push(Command::HMSet {
            key: primary,
            entries,
        });

        self.store.pipeline(&batch)?;

        let changes = entity.changes_mut();
        changes.clear();
        for (field, value, _) in snapshot {
            changes.seed(field.name(), value);
        }
        set_tracking(entity, tracking);
        debug!(type_name = schema.type_name(), id = %id, "inserted entity");
        Ok(())
    }

    // ========== Query ==========

    /// Load an entity by id, enabling change tracking
    ///
    /// `Ok(None)` if no primary record exists.
    pub fn query<E: Entity + 'static>(&self, id: &str) -> Result<Option<E>> {
        self.query_with(id, true)
    }

    /// Load with explicit control over change tracking
    ///
    /// Decoding is strict: a malformed stored field fails the whole query
    /// with `Error::Decode` rather than yielding a half-hydrated entity.
    pub fn query_with<E: Entity + 'static>(&self, id: &str, tracking: bool) -> Result<Option<E>> {
        let schema = self.registry.schema_for::<E>()?;
        let primary = key::primary_key(schema.type_name(), id)?;
        let record = self.store.hgetall(&primary)?;
        if record.is_empty() {
            return Ok(None);
        }

        let mut entity = E::with_id(id);
        for field in schema.fields() {
            // The reserved Id field and fields added after this record was
            // written simply stay at their defaults.
            let Some(raw) = record.get(field.name()) else {
                continue;
            };
            let value = codec::decode(field.kind(), raw).map_err(|e| {
                warn!(
                    type_name = schema.type_name(),
                    id = %id,
                    field = field.name(),
                    "stored value failed to decode"
                );
                e
            })?;
            entity.set_field(field.name(), value.clone())?;
            entity.changes_mut().seed(field.name(), value);
        }
        set_tracking(&mut entity, tracking);
        Ok(Some(entity))
    }

    // ========== Update ==========

    /// Flush an entity's pending field changes
    ///
    /// Computes the minimal delta from the before-value cache. Returns
    /// `Ok(false)` without writing anything if a changed unique-indexed
    /// field's new value is already taken; mutate the field again and
    /// retry. An empty delta succeeds trivially.
    pub fn update<E: Entity + 'static>(&self, entity: &mut E) -> Result<bool> {
        match self.try_update(entity) {
            Ok(()) => Ok(true),
            Err(Error::UniqueConstraint { field, key }) => {
                debug!(field = %field, key = %key, "update rejected: unique index occupied");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Flush, surfacing unique collisions as errors instead of `false`
    pub fn try_update<E: Entity + 'static>(&self, entity: &mut E) -> Result<()> {
        let schema = self.registry.schema_for::<E>()?;
        let id = entity.id().to_string();
        let primary = key::primary_key(schema.type_name(), &id)?;

        let pending = pending_changes(entity, &schema);
        if pending.is_empty() {
            return Ok(());
        }

        // Pre-check every new unique key before touching anything, so a
        // rejected flush leaves both the store and the cache untouched.
        for change in &pending {
            expect_kind(change.field, &change.after)?;
            if !change.field.is_unique() {
                continue;
            }
            let index =
                key::index_key(schema.type_name(), change.field.name(), &codec::encode(&change.after))?;
            if self.store.exists(&index)? {
                return Err(Error::UniqueConstraint {
                    field: change.field.name().to_string(),
                    key: index,
                });
            }
        }

        let mut batch = Vec::new();
        for change in &pending {
            let PendingChange { field, before, after } = change;
            let raw_after = codec::encode(after);
            if field.is_index() {
                let stale = key::index_key(schema.type_name(), field.name(), &codec::encode(before))?;
                let fresh = key::index_key(schema.type_name(), field.name(), &raw_after)?;
                if field.is_unique() {
                    batch.push(Command::Del { key: stale });
                    batch.push(Command::Set {
                        key: fresh,
                        value: id.clone(),
                    });
                } else {
                    batch.push(Command::SRem {
                        key: stale,
                        member: id.clone(),
                    });
                    batch.push(Command::SAdd {
                        key: fresh,
                        member: id.clone(),
                    });
                }
            }
            if field.is_sortable() {
                batch.push(Command::ZAdd {
                    key: key::sorted_key(schema.type_name(), field.name())?,
                    score: score_of(&schema, field, after)?,
                    member: id.clone(),
                });
            }
            batch.push(Command::HSet {
                key: primary.clone(),
                field: field.name().to_string(),
                value: raw_after,
            });
        }

        let flushed = pending.len();
        self.store.pipeline(&batch)?;

        // Success: the cache restarts from the just-written state.
        let snapshot = snapshot_fields(entity, &schema)?;
        let changes = entity.changes_mut();
        changes.clear();
        for (field, value, _) in snapshot {
            changes.seed(field.name(), value);
        }
        debug!(
            type_name = schema.type_name(),
            id = %id,
            fields = flushed,
            "flushed entity changes"
        );
        Ok(())
    }

    // ========== Delete ==========

    /// Remove an entity's primary record and every index entry it owns
    ///
    /// Idempotent: deleting an entity that is already absent is a no-op.
    /// Disables tracking and clears the before-value cache.
    pub fn delete<E: Entity + 'static>(&self, entity: &mut E) -> Result<()> {
        let schema = self.registry.schema_for::<E>()?;
        let id = entity.id().to_string();
        let primary = key::primary_key(schema.type_name(), &id)?;

        let mut batch = vec![Command::Del { key: primary }];
        for field in schema.fields() {
            let Some(value) = entity.field(field.name()) else {
                continue;
            };
            if field.is_index() {
                let index =
                    key::index_key(schema.type_name(), field.name(), &codec::encode(&value))?;
                if field.is_unique() {
                    batch.push(Command::Del { key: index });
                } else {
                    batch.push(Command::SRem {
                        key: index,
                        member: id.clone(),
                    });
                }
            }
            if field.is_sortable() {
                batch.push(Command::ZRem {
                    key: key::sorted_key(schema.type_name(), field.name())?,
                    member: id.clone(),
                });
            }
        }

        self.store.pipeline(&batch)?;
        let changes = entity.changes_mut();
        changes.disable();
        changes.clear();
        debug!(type_name = schema.type_name(), id = %id, "deleted entity");
        Ok(())
    }

    // ========== Index lookups ==========

    /// Ids of entities whose indexed field equals `value`
    ///
    /// A unique field yields at most one id; a set-indexed field yields the
    /// full membership in unspecified order.
    pub fn index_ids<E: Entity + 'static>(&self, field: &str, value: &FieldValue) -> Result<Vec<String>> {
        let schema = self.registry.schema_for::<E>()?;
        let descriptor = schema.expect_indexed(field)?;
        expect_kind(descriptor, value)?;
        let index = key::index_key(schema.type_name(), field, &codec::encode(value))?;
        if descriptor.is_unique() {
            Ok(self.store.get(&index)?.into_iter().collect())
        } else {
            Ok(self.store.smembers(&index)?)
        }
    }

    /// Entities whose indexed field equals `value`, queried lazily per id
    ///
    /// Ids that vanish between the index lookup and the per-id query are
    /// filtered out.
    pub fn index<'a, E: Entity + 'static>(
        &'a self,
        field: &str,
        value: &FieldValue,
    ) -> Result<impl Iterator<Item = Result<E>> + 'a> {
        let ids = self.index_ids::<E>(field, value)?;
        Ok(self.query_each(ids))
    }

    /// The first entity an index lookup yields, if any
    pub fn first<E: Entity + 'static>(&self, field: &str, value: &FieldValue) -> Result<Option<E>> {
        self.index::<E>(field, value)?.next().transpose()
    }

    /// The single entity owning `value` on a unique-indexed field
    ///
    /// Fails with `NotUniqueField` when the field's index is not unique;
    /// that is a usage error, not a data condition.
    pub fn unique<E: Entity + 'static>(&self, field: &str, value: &FieldValue) -> Result<Option<E>> {
        let schema = self.registry.schema_for::<E>()?;
        let descriptor = schema.expect_unique(field)?;
        expect_kind(descriptor, value)?;
        let index = key::index_key(schema.type_name(), field, &codec::encode(value))?;
        match self.store.get(&index)? {
            None => Ok(None),
            Some(id) => self.query(&id),
        }
    }

    // ========== Rankings ==========

    /// Ids in rank order over a sortable field
    ///
    /// `start`/`stop` are inclusive 0-based ranks; negative values count
    /// from the end (`0, -1` is the full range).
    pub fn range_ids<E: Entity + 'static>(
        &self,
        field: &str,
        start: i64,
        stop: i64,
        order: Order,
    ) -> Result<Vec<String>> {
        let ranking = self.ranking_key::<E>(field)?;
        Ok(self.store.zrange(&ranking, start, stop, order)?)
    }

    /// Entities in rank order over a sortable field, queried lazily per id
    pub fn range<'a, E: Entity + 'static>(
        &'a self,
        field: &str,
        start: i64,
        stop: i64,
        order: Order,
    ) -> Result<impl Iterator<Item = Result<E>> + 'a> {
        let ids = self.range_ids::<E>(field, start, stop, order)?;
        Ok(self.query_each(ids))
    }

    /// Ids whose field score lies within `[min, max]`
    pub fn range_by_score_ids<E: Entity + 'static>(
        &self,
        field: &str,
        min: f64,
        max: f64,
        order: Order,
    ) -> Result<Vec<String>> {
        let ranking = self.ranking_key::<E>(field)?;
        Ok(self.store.zrange_by_score(&ranking, min, max, order)?)
    }

    /// Entities whose field score lies within `[min, max]`
    pub fn range_by_score<'a, E: Entity + 'static>(
        &'a self,
        field: &str,
        min: f64,
        max: f64,
        order: Order,
    ) -> Result<impl Iterator<Item = Result<E>> + 'a> {
        let ids = self.range_by_score_ids::<E>(field, min, max, order)?;
        Ok(self.query_each(ids))
    }

    /// An entity's 0-based position in a field's ranking
    ///
    /// `Ok(None)` if the entity is absent from the ranking.
    pub fn rank<E: Entity + 'static>(
        &self,
        entity: &E,
        field: &str,
        order: Order,
    ) -> Result<Option<u64>> {
        let ranking = self.ranking_key::<E>(field)?;
        Ok(self.store.zrank(&ranking, entity.id(), order)?)
    }

    /// Number of entities whose field score lies within `[min, max]`
    pub fn count<E: Entity + 'static>(&self, field: &str, min: f64, max: f64) -> Result<u64> {
        let ranking = self.ranking_key::<E>(field)?;
        Ok(self.store.zcount(&ranking, min, max)?)
    }

    // ========== Internals ==========

    fn ranking_key<E: Entity + 'static>(&self, field: &str) -> Result<String> {
        let schema = self.registry.schema_for::<E>()?;
        schema.expect_sortable(field)?;
        Ok(key::sorted_key(schema.type_name(), field)?)
    }

    fn query_each<'a, E: Entity + 'static>(
        &'a self,
        ids: Vec<String>,
    ) -> impl Iterator<Item = Result<E>> + 'a {
        ids.into_iter()
            .filter_map(move |id| self.query::<E>(&id).transpose())
    }
}

/// Current value and encoding of every declared field, in schema order
fn snapshot_fields<'a, E: Entity>(
    entity: &E,
    schema: &'a Schema,
) -> Result<Vec<(&'a FieldDescriptor, FieldValue, String)>> {
    let mut snapshot = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let value = entity.field(field.name()).ok_or_else(|| Error::UnknownField {
            type_name: schema.type_name().to_string(),
            field: field.name().to_string(),
        })?;
        expect_kind(field, &value)?;
        let raw = codec::encode(&value);
        snapshot.push((field, value, raw));
    }
    Ok(snapshot)
}

fn expect_kind(field: &FieldDescriptor, value: &FieldValue) -> Result<()> {
    if value.kind() != field.kind() {
        return Err(Error::KindMismatch {
            field: field.name().to_string(),
            expected: field.kind(),
            actual: value.kind(),
        });
    }
    Ok(())
}

fn score_of(schema: &Schema, field: &FieldDescriptor, value: &FieldValue) -> Result<f64> {
    value.score().ok_or_else(|| Error::NotSortableField {
        type_name: schema.type_name().to_string(),
        field: field.name().to_string(),
    })
}

fn set_tracking<E: Entity>(entity: &mut E, tracking: bool) {
    if tracking {
        entity.changes_mut().enable();
    } else {
        entity.changes_mut().disable();
    }
}
