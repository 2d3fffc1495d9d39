//! objmap-core: the mapping layer's vocabulary
//!
//! This crate defines everything the entity mapper reasons with, with no
//! dependency on any particular store:
//!
//! - [`field`]: `FieldKind` / `FieldValue`, the closed value model
//! - [`codec`]: string encoding/decoding of field values
//! - [`key`]: deterministic key naming for primary records and indexes
//! - [`schema`]: field descriptors and per-type schemas
//! - [`registry`]: the fill-once schema cache with conflict detection
//! - [`entity`]: the `Entity` trait and before-value change tracking
//! - [`error`]: the error taxonomy shared across the workspace

pub mod codec;
pub mod entity;
pub mod error;
pub mod field;
pub mod key;
pub mod registry;
pub mod schema;

pub use entity::{pending_changes, ChangeSet, Entity, PendingChange};
pub use error::{Error, Result};
pub use field::{FieldKind, FieldValue};
pub use key::KeyError;
pub use registry::SchemaRegistry;
pub use schema::{FieldDescriptor, Schema, ID_FIELD};
