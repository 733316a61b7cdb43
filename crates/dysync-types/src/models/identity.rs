//! Item identity models.
//!
//! An identity is the item's key values, kept as separate components rather
//! than joined into a delimited string, so key values may contain any
//! character without two different keys colliding.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Canonical key of an item: hash value plus optional range value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<String>,
}

impl Identity {
    /// Identity of an item in a hash-only table.
    pub fn single(hash: impl Into<String>) -> Self {
        Self { hash: hash.into(), range: None }
    }

    /// Identity of an item in a hash + range table.
    pub fn composite(hash: impl Into<String>, range: impl Into<String>) -> Self {
        Self { hash: hash.into(), range: Some(range.into()) }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    /// Raw key component values, as needed to address the item in a delete call.
    pub fn parts(&self) -> (&str, Option<&str>) {
        (&self.hash, self.range.as_deref())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.range {
            Some(range) => write!(f, "{}, {}", self.hash, range),
            None => write!(f, "{}", self.hash),
        }
    }
}

/// Identities of every item fetched from source.
///
/// Built while copy jobs are submitted and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceIdentitySet {
    identities: HashSet<Identity>,
}

impl SourceIdentitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { identities: HashSet::with_capacity(capacity) }
    }

    /// Record an identity. Returns false when it was already present.
    pub fn insert(&mut self, identity: Identity) -> bool {
        self.identities.insert(identity)
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.identities.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.identities.iter()
    }
}

impl FromIterator<Identity> for SourceIdentitySet {
    fn from_iter<T: IntoIterator<Item = Identity>>(iter: T) -> Self {
        Self { identities: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_round_trip() {
        let identity = Identity::composite("1", "A");
        assert_eq!(identity.parts(), ("1", Some("A")));

        let identity = Identity::single("1");
        assert_eq!(identity.parts(), ("1", None));
    }

    #[test]
    fn test_display() {
        assert_eq!(Identity::composite("1", "A").to_string(), "1, A");
        assert_eq!(Identity::single("user#7").to_string(), "user#7");
    }

    #[test]
    fn test_components_never_collide() {
        // "a*****b" + "c" and "a" + "b*****c" would share a delimited key
        let left = Identity::composite("a*****b", "c");
        let right = Identity::composite("a", "b*****c");

        let set: SourceIdentitySet = vec![left.clone()].into_iter().collect();
        assert!(set.contains(&left));
        assert!(!set.contains(&right));
    }

    #[test]
    fn test_single_differs_from_composite_with_empty_range() {
        assert_ne!(Identity::single("1"), Identity::composite("1", ""));
    }

    #[test]
    fn test_set_insert_reports_duplicates() {
        let mut set = SourceIdentitySet::with_capacity(2);
        assert!(set.insert(Identity::single("1")));
        assert!(!set.insert(Identity::single("1")));
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
    }
}
