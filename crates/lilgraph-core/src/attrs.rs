//! Ordered string attributes attached to nodes and edges.

use std::collections::BTreeMap;

use crate::errors::{AttrOwner, GraphError};

/// Key reserved for item types; rejected as an attribute in any case.
pub const RESERVED_KEY: &str = "type";

/// Whether `key` collides with the reserved `type` key.
pub fn is_reserved_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(RESERVED_KEY)
}

/// Attribute list that keeps keys unique and in insertion order.
///
/// Updating an existing key keeps its slot, so serialization order is the
/// order in which keys were first set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrList {
    entries: Vec<(String, String)>,
}

impl AttrList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot keyed by attribute name. Mutating it does not touch the list.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries.iter().cloned().collect()
    }

    pub(crate) fn set(&mut self, owner: AttrOwner, key: &str, value: &str) -> Result<(), GraphError> {
        if is_reserved_key(key) {
            return Err(GraphError::ReservedAttributeKey {
                key: key.to_string(),
                owner,
                position: None,
            });
        }
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Replaces the whole set of entries with `attrs`.
    ///
    /// Keys present before and after keep their slot, keys missing from
    /// `attrs` are dropped and new keys are appended in the order given. A
    /// rejected set leaves the list untouched.
    pub(crate) fn replace<I, K, V>(&mut self, owner: AttrOwner, attrs: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut incoming: Vec<(String, String)> = Vec::new();
        for (key, value) in attrs {
            let (key, value) = (key.into(), value.into());
            if is_reserved_key(&key) {
                return Err(GraphError::ReservedAttributeKey {
                    key,
                    owner,
                    position: None,
                });
            }
            match incoming.iter_mut().find(|(k, _)| *k == key) {
                Some((_, v)) => *v = value,
                None => incoming.push((key, value)),
            }
        }

        self.entries.retain(|(k, _)| incoming.iter().any(|(key, _)| key == k));
        for (key, value) in incoming {
            match self.entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, v)) => *v = value,
                None => self.entries.push((key, value)),
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AttrList {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
