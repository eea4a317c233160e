//! Property value and property map domain model.
//!
//! # Responsibility
//! - Represent one note header as an ordered key/value mapping.
//! - Make the scalar-vs-list distinction explicit and exhaustively matchable.
//!
//! # Invariants
//! - Keys are unique and case-sensitive within one map.
//! - Insertion order is preserved; replacing a key keeps its position.
//! - Values are flat: a scalar string, or a list of scalar strings.

use serde::{Deserialize, Serialize};

/// One frontmatter property value.
///
/// Parsed numbers and booleans are carried as their canonical string
/// rendering; the writer re-emits them unquoted so they round-trip as the
/// same YAML scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Single scalar value. An empty string models "no value supplied".
    Scalar(String),
    /// Flat list of scalar values.
    List(Vec<String>),
}

impl PropertyValue {
    /// Creates a scalar value.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Creates a list value.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Returns whether this value carries no data.
    ///
    /// Empty scalars and empty lists both mean "nothing supplied"; the merge
    /// policy treats them as a clear request only when the caller opts in.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(value) => value.is_empty(),
            Self::List(values) => values.is_empty(),
        }
    }
}

/// Ordered property mapping backing one note header.
///
/// Backed by a vector of pairs so round-tripping a header never reorders
/// keys the user arranged by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMap {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertyMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the map holds no properties.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Returns whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or replaces one property.
    ///
    /// Replacing an existing key keeps its original position; new keys are
    /// appended at the end.
    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Removes one property and returns its value.
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        let index = self.entries.iter().position(|(name, _)| name == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterates properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Returns property names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyValue)> for PropertyMap {
    fn from_iter<T: IntoIterator<Item = (K, PropertyValue)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::{PropertyMap, PropertyValue};

    #[test]
    fn insert_preserves_first_seen_key_order() {
        let mut map = PropertyMap::new();
        map.insert("title", PropertyValue::scalar("a"));
        map.insert("year", PropertyValue::scalar("2020"));
        map.insert("title", PropertyValue::scalar("b"));

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["title", "year"]);
        assert_eq!(map.get("title"), Some(&PropertyValue::scalar("b")));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let mut map = PropertyMap::new();
        map.insert("Tags", PropertyValue::list(["a"]));
        assert!(map.get("tags").is_none());
        assert!(map.contains_key("Tags"));
    }

    #[test]
    fn empty_scalar_and_empty_list_report_empty() {
        assert!(PropertyValue::scalar("").is_empty());
        assert!(PropertyValue::List(Vec::new()).is_empty());
        assert!(!PropertyValue::scalar("x").is_empty());
        assert!(!PropertyValue::list(["x"]).is_empty());
    }

    #[test]
    fn remove_returns_value_and_drops_key() {
        let mut map = PropertyMap::new();
        map.insert("doi", PropertyValue::scalar("10.1/xyz"));
        assert_eq!(map.remove("doi"), Some(PropertyValue::scalar("10.1/xyz")));
        assert!(map.remove("doi").is_none());
        assert!(map.is_empty());
    }
}
