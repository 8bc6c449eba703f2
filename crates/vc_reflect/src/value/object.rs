use alloc::string::String;
use alloc::vec::{self, Vec};
use core::fmt;

use vc_utils::hash::HashMap;

use crate::Value;

/// A string-keyed map that keeps insertion order.
///
/// Inserting an existing key replaces its value in place, so the last write
/// wins while the key keeps its first position.
///
/// ```
/// use vc_reflect::{Object, Value};
///
/// let mut object = Object::new();
/// object.insert("a", Value::Int(1));
/// object.insert("b", Value::Int(2));
/// assert_eq!(object.insert("a", Value::Int(3)), Some(Value::Int(1)));
///
/// let keys: Vec<&str> = object.keys().collect();
/// assert_eq!(keys, ["a", "b"]);
/// assert_eq!(object.get("a"), Some(&Value::Int(3)));
/// ```
#[derive(Clone, Default)]
pub struct Object {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Object {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        if let Some(&index) = self.index.get(&key) {
            return Some(core::mem::replace(&mut self.entries[index].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&index| &self.entries[index].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.index.get(key).map(|&index| &mut self.entries[index].1)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut object = Self::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::Object;
    use crate::Value;

    #[test]
    fn duplicate_keys_keep_first_position() {
        let object: Object = [("x", Value::Int(1)), ("y", Value::Null), ("x", Value::Int(2))]
            .into_iter()
            .collect();
        assert_eq!(object.len(), 2);
        let entries: Vec<_> = object.iter().collect();
        assert_eq!(entries, [("x", &Value::Int(2)), ("y", &Value::Null)]);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a: Object = [("a", Value::Null), ("b", Value::Null)].into_iter().collect();
        let b: Object = [("b", Value::Null), ("a", Value::Null)].into_iter().collect();
        assert_ne!(a, b);
    }
}
