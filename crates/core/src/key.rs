//! Key naming for objmap
//!
//! Deterministic derivation of the store keys behind an entity type:
//!
//! - primary record:      `{Type}:_T:{id}`
//! - unique/set index:    `{Type}:_X:{Field}:{value}`
//! - score-ordered index: `{Type}:_S:{Field}`
//!
//! Pure functions, no side effects. The only failure mode is an empty type
//! or field name, which would collapse distinct keyspaces into one.

use thiserror::Error;

/// Segment tag for primary record keys
pub const PRIMARY_TAG: &str = "_T";
/// Segment tag for index keys (unique and set-valued)
pub const INDEX_TAG: &str = "_X";
/// Segment tag for score-ordered index keys
pub const SORTED_TAG: &str = "_S";

/// Key derivation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// Entity type name is empty
    #[error("entity type name cannot be empty")]
    EmptyTypeName,

    /// Field name is empty
    #[error("field name cannot be empty")]
    EmptyFieldName,
}

/// Key of an entity's primary hash record
pub fn primary_key(type_name: &str, id: &str) -> Result<String, KeyError> {
    require_type(type_name)?;
    Ok(format!("{type_name}:{PRIMARY_TAG}:{id}"))
}

/// Key of a field's index entry for one encoded value
///
/// Unique and non-unique indexes share this naming scheme; they differ in
/// the structure stored at the key (plain string vs set of ids).
pub fn index_key(type_name: &str, field: &str, encoded_value: &str) -> Result<String, KeyError> {
    require_type(type_name)?;
    require_field(field)?;
    Ok(format!("{type_name}:{INDEX_TAG}:{field}:{encoded_value}"))
}

/// Key of a field's score-ordered index
pub fn sorted_key(type_name: &str, field: &str) -> Result<String, KeyError> {
    require_type(type_name)?;
    require_field(field)?;
    Ok(format!("{type_name}:{SORTED_TAG}:{field}"))
}

fn require_type(type_name: &str) -> Result<(), KeyError> {
    if type_name.is_empty() {
        return Err(KeyError::EmptyTypeName);
    }
    Ok(())
}

fn require_field(field: &str) -> Result<(), KeyError> {
    if field.is_empty() {
        return Err(KeyError::EmptyFieldName);
    }
    Ok(())
}
