//! Schemas and field descriptors
//!
//! A `Schema` is the per-entity-type metadata the mapper works from: the
//! ordered set of field descriptors plus the type name that prefixes every
//! derived key. Schemas are built once per type (see `registry`) and are
//! immutable afterwards.
//!
//! Descriptors are declared explicitly by each entity type through a small
//! builder, instead of being reflected out of attributes at runtime:
//!
//! ```
//! use objmap_core::schema::FieldDescriptor;
//! use objmap_core::field::FieldKind;
//!
//! let fields = vec![
//!     FieldDescriptor::new("Name", FieldKind::String).unique(),
//!     FieldDescriptor::new("Faction", FieldKind::String).indexed(),
//!     FieldDescriptor::new("Star", FieldKind::Int).sortable(),
//! ];
//! ```

use crate::error::{Error, Result};
use crate::field::FieldKind;
use std::collections::HashMap;

/// Name of the reserved hash field holding the entity id
///
/// The id is written into the primary record alongside the declared fields,
/// so a stored record always has at least one field and "zero fields
/// returned" unambiguously means "record absent". Schemas may not declare a
/// field with this name.
pub const ID_FIELD: &str = "Id";

/// Per-field metadata: declared kind plus index/unique/sortable capabilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: &'static str,
    kind: FieldKind,
    index: bool,
    unique: bool,
    sortable: bool,
}

impl FieldDescriptor {
    /// A plain field with no auxiliary structures
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            index: false,
            unique: false,
            sortable: false,
        }
    }

    /// Maintain a value -> ids lookup for this field
    pub fn indexed(mut self) -> Self {
        self.index = true;
        self
    }

    /// Maintain a value -> id lookup enforcing one entity per value
    ///
    /// Implies `indexed`.
    pub fn unique(mut self) -> Self {
        self.index = true;
        self.unique = true;
        self
    }

    /// Additionally maintain this field in a score-ordered structure
    ///
    /// Only legal for kinds with a 64-bit float score projection; enforced
    /// when the schema is built.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Field name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared value kind
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether a value -> ids lookup is maintained
    pub fn is_index(&self) -> bool {
        self.index
    }

    /// Whether the index enforces one entity per value
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Whether the field is mirrored into a score-ordered structure
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }
}

/// Immutable per-type metadata: type name + ordered field descriptors
#[derive(Debug)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
    by_name: HashMap<&'static str, usize>,
}

impl Schema {
    /// Build a schema, validating the descriptor set
    ///
    /// Rejects duplicate field names, the reserved `Id` name, and sortable
    /// fields whose kind has no 64-bit score projection.
    pub fn build(type_name: &'static str, fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(fields.len());
        for (pos, field) in fields.iter().enumerate() {
            if field.name == ID_FIELD {
                return Err(Error::ReservedFieldName(field.name.to_string()));
            }
            if field.sortable && !field.kind.fits_score() {
                return Err(Error::InvalidSortableField {
                    type_name: type_name.to_string(),
                    field: field.name.to_string(),
                    kind: field.kind,
                });
            }
            if by_name.insert(field.name, pos).is_some() {
                return Err(Error::DuplicateField {
                    type_name: type_name.to_string(),
                    field: field.name.to_string(),
                });
            }
        }
        Ok(Self {
            type_name,
            fields,
            by_name,
        })
    }

    /// Entity type name (prefixes every derived key)
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared fields, in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&pos| &self.fields[pos])
    }

    /// Look up a field, failing with `UnknownField` if absent
    pub fn expect_field(&self, name: &str) -> Result<&FieldDescriptor> {
        self.field(name).ok_or_else(|| Error::UnknownField {
            type_name: self.type_name.to_string(),
            field: name.to_string(),
        })
    }

    /// Look up an indexed field, failing fast on misuse
    pub fn expect_indexed(&self, name: &str) -> Result<&FieldDescriptor> {
        let field = self.expect_field(name)?;
        if !field.index {
            return Err(Error::NotIndexedField {
                type_name: self.type_name.to_string(),
                field: name.to_string(),
            });
        }
        Ok(field)
    }

    /// Look up a unique-indexed field, failing fast on misuse
    pub fn expect_unique(&self, name: &str) -> Result<&FieldDescriptor> {
        let field = self.expect_indexed(name)?;
        if !field.unique {
            return Err(Error::NotUniqueField {
                type_name: self.type_name.to_string(),
                field: name.to_string(),
            });
        }
        Ok(field)
    }

    /// Look up a sortable field, failing fast on misuse
    pub fn expect_sortable(&self, name: &str) -> Result<&FieldDescriptor> {
        let field = self.expect_field(name)?;
        if !field.sortable {
            return Err(Error::NotSortableField {
                type_name: self.type_name.to_string(),
                field: name.to_string(),
            });
        }
        Ok(field)
    }
}
