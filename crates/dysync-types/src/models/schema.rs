//! Table key schema models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SchemaError;

/// Role an attribute plays in the table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyType {
    /// Partition key
    Hash,
    /// Sort key
    Range,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyType::Hash => write!(f, "HASH"),
            KeyType::Range => write!(f, "RANGE"),
        }
    }
}

/// One entry of a described key schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyElement {
    pub attribute_name: String,
    pub key_type: KeyType,
}

impl KeyElement {
    pub fn hash(attribute_name: impl Into<String>) -> Self {
        Self { attribute_name: attribute_name.into(), key_type: KeyType::Hash }
    }

    pub fn range(attribute_name: impl Into<String>) -> Self {
        Self { attribute_name: attribute_name.into(), key_type: KeyType::Range }
    }
}

/// Resolved key attribute names of a table.
///
/// The hash attribute is always present. Without a range attribute the
/// identity of an item is single-component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchema {
    pub hash_attribute: String,
    pub range_attribute: Option<String>,
}

impl KeySchema {
    /// Create a hash-only schema.
    pub fn hash_only(hash_attribute: impl Into<String>) -> Self {
        Self { hash_attribute: hash_attribute.into(), range_attribute: None }
    }

    /// Create a composite (hash + range) schema.
    pub fn composite(hash_attribute: impl Into<String>, range_attribute: impl Into<String>) -> Self {
        Self { hash_attribute: hash_attribute.into(), range_attribute: Some(range_attribute.into()) }
    }

    /// Resolve which attribute plays which role from a described key schema.
    ///
    /// Exactly one HASH entry must exist; at most one RANGE entry may exist.
    pub fn resolve(table: &str, elements: &[KeyElement]) -> Result<Self, SchemaError> {
        let mut hash_attribute = None;
        let mut range_attribute = None;

        for element in elements {
            let slot = match element.key_type {
                KeyType::Hash => &mut hash_attribute,
                KeyType::Range => &mut range_attribute,
            };
            if slot.is_some() {
                return Err(SchemaError::DuplicateKey {
                    table: table.to_string(),
                    key_type: element.key_type,
                });
            }
            *slot = Some(element.attribute_name.clone());
        }

        let hash_attribute =
            hash_attribute.ok_or_else(|| SchemaError::MissingHashKey { table: table.to_string() })?;

        Ok(Self { hash_attribute, range_attribute })
    }

    /// Whether items are identified by two components.
    pub fn is_composite(&self) -> bool {
        self.range_attribute.is_some()
    }
}

impl fmt::Display for KeySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.range_attribute {
            Some(range) => write!(f, "{} (HASH), {} (RANGE)", self.hash_attribute, range),
            None => write!(f, "{} (HASH)", self.hash_attribute),
        }
    }
}
