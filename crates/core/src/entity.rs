//! Entity trait and change tracking
//!
//! An entity is an identifiable, mutable record mapped into the store. Types
//! opt in by implementing [`Entity`]: a static type name, a descriptor table,
//! an id-only factory, and by-name field access through [`FieldValue`].
//!
//! ## Change tracking
//!
//! Each entity embeds a [`ChangeSet`]: a before-value cache recording, per
//! field, the value observed at load/insert time (via `seed`) or just before
//! the first mutation (via `record`). Only the original pre-mutation value is
//! kept; mutating a field five times still yields one original-to-final
//! delta, and mutating it back to its cached value yields none.
//!
//! Setters on implementing types are expected to call `record` before
//! assigning:
//!
//! ```ignore
//! pub fn set_star(&mut self, star: i64) {
//!     self.changes.record(Self::FIELD_STAR, FieldValue::Int(self.star));
//!     self.star = star;
//! }
//! ```
//!
//! A single entity instance is not safe for concurrent use: field mutation
//! and the before-value cache share unsynchronized state. Distinct instances
//! are independent.

use crate::error::Result;
use crate::field::FieldValue;
use crate::schema::{FieldDescriptor, Schema};
use std::collections::HashMap;

/// A typed, identifiable record mapped into the store
pub trait Entity: Sized {
    /// Type name; prefixes every key this type owns in the store
    const TYPE_NAME: &'static str;

    /// The descriptor table for this type, in stable declaration order
    fn descriptors() -> Vec<FieldDescriptor>;

    /// Factory: construct a blank instance carrying only the id
    fn with_id(id: &str) -> Self;

    /// The immutable identifier assigned at construction
    fn id(&self) -> &str;

    /// Read the current value of a declared field by name
    ///
    /// Returns `None` only for names the type does not declare.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Assign a declared field from a decoded value
    ///
    /// Fails with `KindMismatch` / `UnknownField` on values that do not fit;
    /// assignment bypasses change recording (it is used when hydrating from
    /// the store, not by callers).
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()>;

    /// The entity's before-value cache
    fn changes(&self) -> &ChangeSet;

    /// Mutable access to the before-value cache
    fn changes_mut(&mut self) -> &mut ChangeSet;
}

/// Per-instance before-value cache backing partial updates
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    tracking: bool,
    before: HashMap<&'static str, FieldValue>,
}

impl ChangeSet {
    /// A fresh, untracked cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether mutations are currently being recorded
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Start recording mutations
    pub fn enable(&mut self) {
        self.tracking = true;
    }

    /// Stop recording mutations
    pub fn disable(&mut self) {
        self.tracking = false;
    }

    /// Record the pre-mutation value of a field, first write wins
    ///
    /// No-op when tracking is disabled or a before-value is already cached
    /// for this field since the last flush.
    pub fn record(&mut self, field: &'static str, before: FieldValue) {
        if !self.tracking {
            return;
        }
        self.before.entry(field).or_insert(before);
    }

    /// Install a load/insert-time snapshot for a field, unconditionally
    pub fn seed(&mut self, field: &'static str, value: FieldValue) {
        self.before.insert(field, value);
    }

    /// The cached before-value of a field, if any
    pub fn before(&self, field: &str) -> Option<&FieldValue> {
        self.before.get(field)
    }

    /// Reset the cache after a successful flush / insert / delete
    pub fn clear(&mut self) {
        self.before.clear();
    }
}

/// One pending field delta: `(descriptor, before, after)`
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange<'a> {
    /// Descriptor of the changed field
    pub field: &'a FieldDescriptor,
    /// Value cached at load/insert time or first mutation
    pub before: FieldValue,
    /// Current value on the entity
    pub after: FieldValue,
}

/// Compute the minimal update delta for an entity
///
/// Walks the schema in declaration order and yields every field whose
/// current value differs from its cached before-value. Fields without a
/// cached before-value produce no delta (nothing to diff against).
pub fn pending_changes<'a, E: Entity>(entity: &E, schema: &'a Schema) -> Vec<PendingChange<'a>> {
    let changes = entity.changes();
    let mut pending = Vec::new();
    for field in schema.fields() {
        let Some(before) = changes.before(field.name()) else {
            continue;
        };
        let Some(after) = entity.field(field.name()) else {
            continue;
        };
        if *before != after {
            pending.push(PendingChange {
                field,
                before: before.clone(),
                after,
            });
        }
    }
    pending
}
