//! Error types for the objmap engine
//!
//! One primary `Error` enum covers the whole mapping layer. Seams with their
//! own vocabulary (key naming, the store boundary) define local error enums
//! and convert into this one via `From`.
//!
//! Two groups of variants behave differently at the call site:
//! - Usage errors (`NotIndexedField`, `NotUniqueField`, `NotSortableField`,
//!   `UnknownField`, `KindMismatch`) indicate a programming mistake and fail
//!   the call immediately.
//! - Data conditions (`DuplicateKey`, `UniqueConstraint`, `Decode`) are
//!   expected runtime outcomes; the mapper's `bool`-returning operations
//!   translate the first two into `Ok(false)`.
//!
//! A missing record is never an error: lookups return `Ok(None)` or an empty
//! collection.

use crate::field::FieldKind;
use crate::key::KeyError;
use thiserror::Error;

/// Result type alias for objmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the objmap engine
#[derive(Debug, Error)]
pub enum Error {
    /// Two distinct entity types derived the same type name
    #[error("schema conflict: type name {0:?} is already registered by a different type")]
    SchemaConflict(String),

    /// A field was declared sortable but its kind has no lossless 64-bit score
    #[error("field {type_name}.{field} cannot be sortable: kind {kind:?} does not fit a 64-bit score")]
    InvalidSortableField {
        /// Entity type name
        type_name: String,
        /// Offending field name
        field: String,
        /// Declared field kind
        kind: FieldKind,
    },

    /// A field was declared twice in one schema
    #[error("duplicate field {field:?} in schema for {type_name:?}")]
    DuplicateField {
        /// Entity type name
        type_name: String,
        /// Repeated field name
        field: String,
    },

    /// A schema declared a field with a reserved name
    #[error("field name {0:?} is reserved")]
    ReservedFieldName(String),

    /// A field name was used that the schema does not declare
    #[error("unknown field {field:?} on {type_name:?}")]
    UnknownField {
        /// Entity type name
        type_name: String,
        /// Unrecognized field name
        field: String,
    },

    /// Insert collided with an existing primary record
    #[error("duplicate primary key {0:?}")]
    DuplicateKey(String),

    /// Insert or update collided with an occupied unique index entry
    #[error("unique constraint violation on field {field:?}: index key {key:?} is occupied")]
    UniqueConstraint {
        /// Unique-indexed field name
        field: String,
        /// Occupied index key
        key: String,
    },

    /// An index operation was invoked on a field without an index
    #[error("field {type_name}.{field} is not indexed")]
    NotIndexedField {
        /// Entity type name
        type_name: String,
        /// Field name
        field: String,
    },

    /// A unique lookup was invoked on a field whose index is not unique
    #[error("field {type_name}.{field} is not a unique index")]
    NotUniqueField {
        /// Entity type name
        type_name: String,
        /// Field name
        field: String,
    },

    /// A range/rank operation was invoked on a field that is not sortable
    #[error("field {type_name}.{field} is not sortable")]
    NotSortableField {
        /// Entity type name
        type_name: String,
        /// Field name
        field: String,
    },

    /// A supplied value does not match the field's declared kind
    #[error("kind mismatch for field {field:?}: expected {expected:?}, got {actual:?}")]
    KindMismatch {
        /// Field name
        field: String,
        /// Kind declared by the schema
        expected: FieldKind,
        /// Kind of the supplied value
        actual: FieldKind,
    },

    /// A stored value could not be decoded back into its declared kind
    #[error("decode error for kind {kind:?}: input {input:?}: {reason}")]
    Decode {
        /// Kind the value was expected to decode into
        kind: FieldKind,
        /// Raw stored text (truncated by the caller if oversized)
        input: String,
        /// Human-readable cause
        reason: String,
    },

    /// Key derivation failed
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// The store collaborator failed; propagated unmodified
    #[error("store error: {0}")]
    Store(String),
}
