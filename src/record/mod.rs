// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Domain records as seen by the index.
//!
//! A domain type opts into index synchronization by implementing
//! [`IndexedRecord`] (identity, attributes, visibility) and [`FieldAccessor`]
//! (how a configured field name turns into text).
//!
//! # Field resolution order
//!
//! ```text
//! field_value("title")
//!       │
//!       ├─→ stored_attribute("title")   persisted column
//!       ├─→ cached_value("title")       instance-local value
//!       └─→ computed_field("title")     zero-argument derived value
//!                │
//!                └─→ none of the above → FieldError::Unknown
//! ```

mod field_record;
mod serializer;

pub use field_record::{primary_key_from_payload, FieldRecord, PayloadError, IDENTITY_FIELD};
pub(crate) use field_record::is_xml_name;
pub use serializer::RecordSerializer;

use std::fmt;

use thiserror::Error;

/// Primary key of a record in the relational store.
pub type RecordId = i64;

/// A field value could not be obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("no attribute, cached value or computed field named '{field}'")]
    Unknown { field: String },
    #[error("computing field '{field}' failed: {reason}")]
    Computation { field: String, reason: String },
}

/// Resolves a configured field name to its text value.
///
/// Implementors provide up to three sources; [`FieldAccessor::field_value`]
/// tries them in a fixed order and the first one that yields a value wins.
pub trait FieldAccessor {
    /// A persisted attribute of this name, if present and non-null.
    fn stored_attribute(&self, name: &str) -> Option<String>;

    /// A value held on the instance but not persisted.
    fn cached_value(&self, _name: &str) -> Option<String> {
        None
    }

    /// A derived value. `None` means no such computed field exists.
    fn computed_field(&self, _name: &str) -> Option<Result<String, String>> {
        None
    }

    fn field_value(&self, name: &str) -> Result<String, FieldError> {
        if let Some(value) = self.stored_attribute(name) {
            return Ok(value);
        }
        if let Some(value) = self.cached_value(name) {
            return Ok(value);
        }
        match self.computed_field(name) {
            Some(Ok(value)) => Ok(value),
            Some(Err(reason)) => Err(FieldError::Computation {
                field: name.to_string(),
                reason,
            }),
            None => Err(FieldError::Unknown {
                field: name.to_string(),
            }),
        }
    }
}

/// A domain record that is mirrored into the search index.
pub trait IndexedRecord: FieldAccessor + Send + Sync {
    /// Domain type name, embedded in the index identity and used for query scoping.
    fn type_name(&self) -> &str;

    fn primary_key(&self) -> RecordId;

    /// Name of the primary-key attribute, excluded when indexing all attributes.
    fn primary_key_attribute(&self) -> &str {
        "id"
    }

    /// Every attribute in natural order, converted to text. Includes the primary key.
    fn attributes(&self) -> Vec<(String, String)>;

    /// Whether this record belongs in the private index, when the type has one.
    fn is_private(&self) -> bool;
}

/// `"<TypeName>:<primaryKey>"`, unique across every type sharing an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexIdentity {
    type_name: String,
    primary_key: RecordId,
}

impl IndexIdentity {
    pub fn new(type_name: impl Into<String>, primary_key: RecordId) -> Self {
        Self {
            type_name: type_name.into(),
            primary_key,
        }
    }

    pub fn of<R: IndexedRecord + ?Sized>(record: &R) -> Self {
        Self::new(record.type_name(), record.primary_key())
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn primary_key(&self) -> RecordId {
        self.primary_key
    }

    /// Primary key from an identity string: the text after the last `:`.
    ///
    /// The type name is not checked; hits are already scoped by type.
    pub fn parse_primary_key(identity: &str) -> Result<RecordId, PayloadError> {
        let tail = identity.rsplit(':').next().unwrap_or(identity).trim();
        tail.parse().map_err(|_| PayloadError::InvalidIdentity {
            identity: identity.to_string(),
        })
    }
}

impl fmt::Display for IndexIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name, self.primary_key)
    }
}
