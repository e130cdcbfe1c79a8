use crate::{Json, Params};

use indexmap::IndexSet;

/// Attribute values of a record, plus the set of keys assigned since the
/// last checkpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeTable {
    values: Params,
    changed: IndexSet<String>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` and marks `key` as changed, even when the value is
    /// equal to the one already stored.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Json>) {
        let key = key.into();
        self.changed.insert(key.clone());
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Json> {
        self.values.get(key)
    }

    /// Drops `key` and its change mark, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Json> {
        self.changed.shift_remove(key);
        self.values.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Changed keys with their current values, in first-assignment order.
    pub fn changes(&self) -> Params {
        self.changed
            .iter()
            .filter_map(|key| Some((key.clone(), self.values.get(key)?.clone())))
            .collect()
    }

    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    pub fn is_changed(&self, key: &str) -> bool {
        self.changed.contains(key)
    }

    /// Forgets which keys changed. Values are kept.
    pub fn clear(&mut self) {
        self.changed.clear();
    }

    pub fn to_map(&self) -> &Params {
        &self.values
    }

    pub fn into_map(self) -> Params {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Json)> {
        self.values.iter()
    }
}

impl Extend<(String, Json)> for AttributeTable {
    fn extend<T: IntoIterator<Item = (String, Json)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}
