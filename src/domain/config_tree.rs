// SPDX-License-Identifier: MIT OR Apache-2.0

//! The nested configuration container.
//!
//! A [`ConfigTree`] is one level of configuration: an ordered mapping from
//! [`ConfigKey`] to [`ConfigValue`], where nested levels are child trees owned
//! exclusively by their parent. Every tree is either mutable or read-only.
//! Freezing is one-directional and applies to all descendants that exist at
//! the moment of freezing.

use crate::domain::config_key::ConfigKey;
use crate::domain::config_value::{ConfigData, ConfigValue};
use crate::domain::errors::{ConfigError, Result};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// An ordered, nested, optionally read-only configuration container.
///
/// # Examples
///
/// ```
/// use nestcfg::domain::{ConfigTree, ConfigValue};
/// use serde_json::json;
///
/// # fn main() -> nestcfg::domain::Result<()> {
/// let mut config = ConfigTree::from_json(json!({"db": {"host": "localhost"}}), true)?;
/// config.set("name", "app")?;
/// assert_eq!(config.get_path("db.host"), Some(&ConfigValue::from("localhost")));
///
/// config.set_read_only();
/// assert!(config.set("name", "other").is_err());
/// assert!(config.get_tree("db").unwrap().is_read_only());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ConfigTree {
    entries: IndexMap<ConfigKey, ConfigValue>,
    read_only: bool,
    /// Next integer key handed out by `push` and merge appends; `None` once
    /// `u64::MAX` is taken.
    next_index: Option<u64>,
}

impl ConfigTree {
    /// Creates an empty tree.
    pub fn new(allow_modification: bool) -> Self {
        Self {
            entries: IndexMap::new(),
            read_only: !allow_modification,
            next_index: Some(0),
        }
    }

    /// Builds a tree from plain nested data.
    ///
    /// Every nested map becomes a child tree with the same mutability; scalars
    /// and opaque objects are stored as they are.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `data` is not a map.
    pub fn from_data(data: ConfigData, allow_modification: bool) -> Result<Self> {
        match data {
            ConfigData::Map(map) => Ok(Self::from_map(map, allow_modification)),
            other => Err(ConfigError::invalid_input(format!(
                "configuration data must be a map or list at the top level, found {}",
                other.type_name()
            ))),
        }
    }

    /// Builds a tree from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `value` is neither an object nor an array.
    pub fn from_json(value: serde_json::Value, allow_modification: bool) -> Result<Self> {
        Self::from_data(ConfigData::from(value), allow_modification)
    }

    /// Builds a tree from key/value pairs, keeping their order.
    pub fn from_pairs<I, K, V>(pairs: I, allow_modification: bool) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ConfigKey>,
        V: Into<ConfigValue>,
    {
        let mut tree = Self::new(true);
        for (key, value) in pairs {
            let value: ConfigValue = value.into();
            let value = value.with_mode(true);
            tree.insert_entry(key.into(), value);
        }
        if !allow_modification {
            tree.set_read_only();
        }
        tree
    }

    fn from_map(map: IndexMap<ConfigKey, ConfigData>, allow_modification: bool) -> Self {
        let mut tree = Self::new(allow_modification);
        for (key, value) in map {
            let value = wrap_data(value, allow_modification);
            tree.insert_entry(key, value);
        }
        tree
    }

    /// Returns the value at `key`, or `None` if absent.
    pub fn get(&self, key: impl Into<ConfigKey>) -> Option<&ConfigValue> {
        self.entries.get(&key.into())
    }

    /// Returns a copy of the value at `key`, or `default` if absent.
    pub fn get_or(&self, key: impl Into<ConfigKey>, default: impl Into<ConfigValue>) -> ConfigValue {
        match self.get(key) {
            Some(value) => value.clone(),
            None => default.into(),
        }
    }

    /// Returns the child tree at `key`, if the slot holds one.
    pub fn get_tree(&self, key: impl Into<ConfigKey>) -> Option<&ConfigTree> {
        self.get(key).and_then(ConfigValue::as_tree)
    }

    /// Returns the child tree at `key` mutably, if the slot holds one.
    ///
    /// The child keeps its own read-only state; writes through it are checked
    /// against the child, not against `self`.
    pub fn get_tree_mut(&mut self, key: impl Into<ConfigKey>) -> Option<&mut ConfigTree> {
        self.entries
            .get_mut(&key.into())
            .and_then(ConfigValue::as_tree_mut)
    }

    /// Looks up a dotted path such as `"db.replicas.0.host"`.
    ///
    /// Each segment is converted with [`ConfigKey::from`], so numeric segments
    /// address list entries.
    pub fn get_path(&self, path: &str) -> Option<&ConfigValue> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.get(first)?;
        for segment in segments {
            current = current.as_tree()?.get(segment)?;
        }
        Some(current)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: impl Into<ConfigKey>) -> bool {
        self.entries.contains_key(&key.into())
    }

    /// Sets `key` to `value`.
    ///
    /// An existing key keeps its position; a new key is appended. A tree
    /// value is adopted as a child with this tree's mutability.
    ///
    /// # Errors
    ///
    /// Returns `ReadOnly` if this tree is read-only.
    pub fn set(&mut self, key: impl Into<ConfigKey>, value: impl Into<ConfigValue>) -> Result<()> {
        let key = key.into();
        self.ensure_writable(|| format!("set key '{}'", key))?;
        let value: ConfigValue = value.into();
        let value = value.with_mode(!self.read_only);
        self.insert_entry(key, value);
        Ok(())
    }

    /// Appends `value` under the next free integer key and returns that key.
    ///
    /// # Errors
    ///
    /// Returns `ReadOnly` if this tree is read-only, or `InvalidInput` if
    /// the integer key `u64::MAX` is already taken.
    pub fn push(&mut self, value: impl Into<ConfigValue>) -> Result<ConfigKey> {
        self.ensure_writable(|| "append a value".to_string())?;
        let key = ConfigKey::Index(self.next_index().ok_or_else(index_space_exhausted)?);
        let value: ConfigValue = value.into();
        let value = value.with_mode(!self.read_only);
        self.insert_entry(key.clone(), value);
        Ok(key)
    }

    /// Removes `key` and returns its value. Absent keys are a no-op.
    ///
    /// The remaining keys keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns `ReadOnly` if this tree is read-only.
    pub fn unset(&mut self, key: impl Into<ConfigKey>) -> Result<Option<ConfigValue>> {
        let key = key.into();
        self.ensure_writable(|| format!("unset key '{}'", key))?;
        Ok(self.entries.shift_remove(&key))
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &ConfigKey> {
        self.entries.keys()
    }

    /// Iterates over the entries in insertion order, starting from the first.
    pub fn iter(&self) -> indexmap::map::Iter<'_, ConfigKey, ConfigValue> {
        self.entries.iter()
    }

    /// Returns a detached cursor positioned on the first key.
    ///
    /// Unlike [`ConfigTree::iter`], the cursor does not borrow the tree, so the
    /// tree may be modified between steps.
    pub fn cursor(&self) -> Cursor {
        Cursor {
            keys: self.entries.keys().cloned().collect(),
            position: 0,
        }
    }

    /// Converts the tree and all its descendants into plain data.
    pub fn to_mapping(&self) -> ConfigData {
        ConfigData::Map(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value_to_data(value)))
                .collect(),
        )
    }

    /// Marks this tree and every current descendant read-only.
    pub fn set_read_only(&mut self) {
        self.read_only = true;
        for value in self.entries.values_mut() {
            if let ConfigValue::Tree(child) = value {
                child.set_read_only();
            }
        }
    }

    /// Returns `true` if this tree refuses modification.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Fails with `ReadOnly` unless this tree is mutable.
    pub(crate) fn ensure_writable(&self, operation: impl FnOnce() -> String) -> Result<()> {
        if self.read_only {
            return Err(ConfigError::read_only(operation()));
        }
        Ok(())
    }

    /// Fails with `ReadOnly` unless this tree and every descendant are mutable.
    pub(crate) fn ensure_writable_deep(&self, operation: &str) -> Result<()> {
        self.ensure_writable(|| operation.to_string())?;
        for value in self.entries.values() {
            if let ConfigValue::Tree(child) = value {
                child.ensure_writable_deep(operation)?;
            }
        }
        Ok(())
    }

    /// Inserts without the read-only check, tracking the next free index.
    pub(crate) fn insert_entry(&mut self, key: ConfigKey, value: ConfigValue) {
        if let ConfigKey::Index(index) = key {
            self.next_index = advance_index(self.next_index, index);
        }
        self.entries.insert(key, value);
    }

    pub(crate) fn next_index(&self) -> Option<u64> {
        self.next_index
    }

    pub(crate) fn entry_mut(&mut self, key: &ConfigKey) -> Option<&mut ConfigValue> {
        self.entries.get_mut(key)
    }

    /// Rebuilds the mode of this tree and its descendants.
    ///
    /// Only used when a tree is moved or copied into a new parent, which
    /// makes it a new child of that parent.
    fn into_mode(mut self, allow_modification: bool) -> Self {
        self.read_only = !allow_modification;
        self.entries = self
            .entries
            .into_iter()
            .map(|(key, value)| (key, value.with_mode(allow_modification)))
            .collect();
        self
    }
}

impl ConfigValue {
    /// Re-homes a tree value under a parent with the given mutability.
    pub(crate) fn with_mode(self, allow_modification: bool) -> ConfigValue {
        match self {
            ConfigValue::Tree(tree) => ConfigValue::Tree(tree.into_mode(allow_modification)),
            other => other,
        }
    }
}

/// Next free integer key once `taken` is in use.
pub(crate) fn advance_index(next: Option<u64>, taken: u64) -> Option<u64> {
    next.and_then(|next| taken.checked_add(1).map(|after| next.max(after)))
}

pub(crate) fn index_space_exhausted() -> ConfigError {
    ConfigError::invalid_input("no integer key left to append under; u64::MAX is taken")
}

fn wrap_data(data: ConfigData, allow_modification: bool) -> ConfigValue {
    match data {
        ConfigData::Null => ConfigValue::Null,
        ConfigData::Bool(b) => ConfigValue::Bool(b),
        ConfigData::Integer(i) => ConfigValue::Integer(i),
        ConfigData::Float(f) => ConfigValue::Float(f),
        ConfigData::String(s) => ConfigValue::String(s),
        ConfigData::Opaque(handle) => ConfigValue::Opaque(handle),
        ConfigData::Map(map) => ConfigValue::Tree(ConfigTree::from_map(map, allow_modification)),
    }
}

fn value_to_data(value: &ConfigValue) -> ConfigData {
    match value {
        ConfigValue::Null => ConfigData::Null,
        ConfigValue::Bool(b) => ConfigData::Bool(*b),
        ConfigValue::Integer(i) => ConfigData::Integer(*i),
        ConfigValue::Float(f) => ConfigData::Float(*f),
        ConfigValue::String(s) => ConfigData::String(s.clone()),
        ConfigValue::Opaque(handle) => ConfigData::Opaque(handle.clone()),
        ConfigValue::Tree(tree) => tree.to_mapping(),
    }
}

/// Trees compare equal when they hold equal entries in the same order.
/// The read-only state is not compared.
impl PartialEq for ConfigTree {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl<'a> IntoIterator for &'a ConfigTree {
    type Item = (&'a ConfigKey, &'a ConfigValue);
    type IntoIter = indexmap::map::Iter<'a, ConfigKey, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for ConfigTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_mapping().serialize(serializer)
    }
}

/// A traversal position over a snapshot of a tree's keys.
///
/// The key order is captured when the cursor is created or rewound. Keys
/// removed from the tree after that are skipped when reached; removing the
/// key just visited never causes another key to be skipped or repeated.
///
/// # Examples
///
/// ```
/// use nestcfg::domain::{ConfigKey, ConfigTree};
///
/// # fn main() -> nestcfg::domain::Result<()> {
/// let mut tree = ConfigTree::from_pairs([("a", 1), ("b", 2), ("c", 3)], true);
/// let mut cursor = tree.cursor();
/// let mut seen = Vec::new();
/// while let Some(key) = cursor.next_key(&tree) {
///     if key == ConfigKey::from("a") {
///         tree.unset(&key)?;
///     }
///     seen.push(key.to_string());
/// }
/// assert_eq!(seen, vec!["a", "b", "c"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Cursor {
    keys: Vec<ConfigKey>,
    position: usize,
}

impl Cursor {
    /// Re-snapshots `tree` and moves back to its first key.
    pub fn rewind(&mut self, tree: &ConfigTree) {
        self.keys = tree.entries.keys().cloned().collect();
        self.position = 0;
    }

    /// Returns the entry the cursor is on without advancing.
    pub fn current<'a>(&self, tree: &'a ConfigTree) -> Option<(ConfigKey, &'a ConfigValue)> {
        self.keys[self.position.min(self.keys.len())..]
            .iter()
            .find_map(|key| tree.entries.get(key).map(|value| (key.clone(), value)))
    }

    /// Returns the entry the cursor is on and advances past it.
    pub fn next<'a>(&mut self, tree: &'a ConfigTree) -> Option<(ConfigKey, &'a ConfigValue)> {
        while self.position < self.keys.len() {
            let key = &self.keys[self.position];
            self.position += 1;
            if let Some(value) = tree.entries.get(key) {
                return Some((key.clone(), value));
            }
        }
        None
    }

    /// Like [`Cursor::next`] but yields only the key, leaving `tree` unborrowed.
    pub fn next_key(&mut self, tree: &ConfigTree) -> Option<ConfigKey> {
        self.next(tree).map(|(key, _)| key)
    }
}
