//! Request-scoped canonical record.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

use crate::schema::{FieldValue, is_recognized_alias, master_schema};

/// A patient record keyed by recognized field names
///
/// Built by overlaying a raw request onto the master defaults. The record
/// remembers which fields the caller supplied, so alias resolution can tell a
/// real value apart from a default. Equality compares values only.
#[derive(Debug, Clone, Default)]
pub struct CanonicalRecord {
    values: BTreeMap<String, FieldValue>,
    supplied: FxHashSet<String>,
}

impl PartialEq for CanonicalRecord {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl CanonicalRecord {
    /// A record holding every canonical field at its default
    #[must_use]
    pub fn from_defaults() -> Self {
        let values = master_schema()
            .defaults()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        Self {
            values,
            supplied: FxHashSet::default(),
        }
    }

    /// Overlay a raw request onto the master defaults
    ///
    /// Canonical names and known aliases are kept; any other key is dropped.
    /// Values that are not JSON scalars leave the default in place.
    #[must_use]
    pub fn overlay(raw: &Map<String, Value>) -> Self {
        let schema = master_schema();
        let mut record = Self::from_defaults();
        let mut ignored = 0usize;

        for (key, value) in raw {
            if !schema.contains(key) && !is_recognized_alias(key) {
                ignored += 1;
                continue;
            }
            match FieldValue::from_json(value) {
                Some(value) => record.supply(key, value),
                None => log::debug!("Ignoring non-scalar value for '{key}'"),
            }
        }

        if ignored > 0 {
            log::debug!("Dropped {ignored} unrecognized input keys");
        }
        record
    }

    /// Value of a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Whether the record holds a field
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether the caller supplied the field (as opposed to a default)
    #[must_use]
    pub fn is_supplied(&self, name: &str) -> bool {
        self.supplied.contains(name)
    }

    /// Set a field as caller-supplied
    pub fn supply(&mut self, name: &str, value: FieldValue) {
        self.supplied.insert(name.to_string());
        self.values.insert(name.to_string(), value);
    }

    /// Replace a field's value, keeping its provenance
    pub(crate) fn replace(&mut self, name: &str, value: FieldValue) {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
        }
    }

    /// Remove a field, returning its value
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.supplied.remove(name);
        self.values.remove(name)
    }

    /// Keep only the fields for which `keep` returns true
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.values.retain(|name, _| keep(name));
        let values = &self.values;
        self.supplied.retain(|name| values.contains_key(name));
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in name order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the record holds no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render the record as a JSON object
    #[must_use]
    pub fn to_json(&self) -> Map<String, Value> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }
}
