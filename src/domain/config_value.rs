// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value types.
//!
//! This module provides two closely related value types:
//!
//! - [`ConfigValue`] is what a [`ConfigTree`] stores in each slot. Nested levels
//!   are themselves `ConfigTree`s, carrying their own read-only state.
//! - [`ConfigData`] is the plain nested form exchanged with codecs: scalars and
//!   ordered maps, with no read-only state attached.

use crate::domain::config_key::ConfigKey;
use crate::domain::config_tree::ConfigTree;
use indexmap::IndexMap;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A shared handle to an application object stored inside a tree.
///
/// Opaque values pass through construction, merging, processing and export
/// unchanged. Two handles are equal only when they point at the same object.
///
/// # Examples
///
/// ```
/// use nestcfg::domain::OpaqueValue;
///
/// let handle = OpaqueValue::new(vec![1u8, 2, 3]);
/// assert_eq!(handle.downcast_ref::<Vec<u8>>(), Some(&vec![1u8, 2, 3]));
/// assert_eq!(handle, handle.clone());
/// assert_ne!(handle, OpaqueValue::new(vec![1u8, 2, 3]));
/// ```
#[derive(Clone)]
pub struct OpaqueValue(Arc<dyn Any + Send + Sync>);

impl OpaqueValue {
    /// Wraps an object in a new shared handle.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        OpaqueValue(Arc::new(value))
    }

    /// Returns a reference to the object if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Returns `true` if both handles refer to the same object.
    pub fn ptr_eq(&self, other: &OpaqueValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for OpaqueValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaqueValue(..)")
    }
}

/// A value stored in one slot of a [`ConfigTree`].
///
/// # Examples
///
/// ```
/// use nestcfg::domain::ConfigValue;
///
/// let value = ConfigValue::from(42);
/// assert_eq!(value.as_i64(), Some(42));
/// assert_eq!(value.as_f64(), Some(42.0));
/// assert_eq!(value.as_str(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum ConfigValue {
    /// An explicit null.
    #[default]
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Integer(i64),
    /// A floating point scalar.
    Float(f64),
    /// A string scalar.
    String(String),
    /// An application object, never recursed into.
    Opaque(OpaqueValue),
    /// A nested level, exclusively owned by the enclosing tree.
    Tree(ConfigTree),
}

impl ConfigValue {
    /// Returns a short name for the kind of value held, for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Integer(_) => "integer",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::Opaque(_) => "object",
            ConfigValue::Tree(_) => "tree",
        }
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Returns `true` for nested trees.
    pub fn is_tree(&self) -> bool {
        matches!(self, ConfigValue::Tree(_))
    }

    /// Returns the string slice for string scalars.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean for boolean scalars.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer for integer scalars.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number for integer and float scalars.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Integer(i) => Some(*i as f64),
            ConfigValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the nested tree, if any.
    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            ConfigValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns the nested tree mutably, if any.
    pub fn as_tree_mut(&mut self) -> Option<&mut ConfigTree> {
        match self {
            ConfigValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns the opaque handle, if any.
    pub fn as_opaque(&self) -> Option<&OpaqueValue> {
        match self {
            ConfigValue::Opaque(handle) => Some(handle),
            _ => None,
        }
    }

    /// Renders boolean, integer, float and string scalars as text.
    ///
    /// Returns `None` for null, opaque values and trees.
    pub fn scalar_to_string(&self) -> Option<String> {
        match self {
            ConfigValue::Bool(b) => Some(b.to_string()),
            ConfigValue::Integer(i) => Some(i.to_string()),
            ConfigValue::Float(f) => Some(f.to_string()),
            ConfigValue::String(s) => Some(s.clone()),
            ConfigValue::Null | ConfigValue::Opaque(_) | ConfigValue::Tree(_) => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl From<i32> for ConfigValue {
    fn from(i: i32) -> Self {
        ConfigValue::Integer(i64::from(i))
    }
}

impl From<u32> for ConfigValue {
    fn from(i: u32) -> Self {
        ConfigValue::Integer(i64::from(i))
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        ConfigValue::Float(f)
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<OpaqueValue> for ConfigValue {
    fn from(handle: OpaqueValue) -> Self {
        ConfigValue::Opaque(handle)
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(tree: ConfigTree) -> Self {
        ConfigValue::Tree(tree)
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}

/// Plain nested configuration data, as produced and consumed by codecs.
///
/// A sequence is a map whose keys are `0..n` in order; [`ConfigData::list`]
/// builds one and serialization writes one back out as a sequence.
///
/// # Examples
///
/// ```
/// use nestcfg::domain::ConfigData;
///
/// let data = ConfigData::from(serde_json::json!({"hosts": ["a", "b"]}));
/// let hosts = data.get("hosts").unwrap();
/// assert!(hosts.is_list());
/// assert_eq!(hosts.get(1), Some(&ConfigData::from("b")));
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum ConfigData {
    /// An explicit null.
    #[default]
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// An integer scalar.
    Integer(i64),
    /// A floating point scalar.
    Float(f64),
    /// A string scalar.
    String(String),
    /// An application object.
    Opaque(OpaqueValue),
    /// An ordered mapping.
    Map(IndexMap<ConfigKey, ConfigData>),
}

impl ConfigData {
    /// Creates an empty map.
    pub fn map() -> Self {
        ConfigData::Map(IndexMap::new())
    }

    /// Creates a map keyed `0..n` from the given items.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ConfigData>,
    {
        ConfigData::Map(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (ConfigKey::from(i), v.into()))
                .collect(),
        )
    }

    /// Creates a map from key/value pairs, keeping their order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ConfigKey>,
        V: Into<ConfigData>,
    {
        ConfigData::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the entries of a map.
    pub fn as_map(&self) -> Option<&IndexMap<ConfigKey, ConfigData>> {
        match self {
            ConfigData::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` in a map. Returns `None` for scalars.
    pub fn get(&self, key: impl Into<ConfigKey>) -> Option<&ConfigData> {
        self.as_map().and_then(|map| map.get(&key.into()))
    }

    /// Returns `true` for maps keyed exactly `0..n` in insertion order.
    pub fn is_list(&self) -> bool {
        match self {
            ConfigData::Map(map) => map
                .keys()
                .enumerate()
                .all(|(i, key)| key.as_index() == Some(i as u64)),
            _ => false,
        }
    }

    /// Returns a short name for the kind of value held, for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigData::Null => "null",
            ConfigData::Bool(_) => "boolean",
            ConfigData::Integer(_) => "integer",
            ConfigData::Float(_) => "float",
            ConfigData::String(_) => "string",
            ConfigData::Opaque(_) => "object",
            ConfigData::Map(_) => "map",
        }
    }
}

impl From<bool> for ConfigData {
    fn from(b: bool) -> Self {
        ConfigData::Bool(b)
    }
}

impl From<i64> for ConfigData {
    fn from(i: i64) -> Self {
        ConfigData::Integer(i)
    }
}

impl From<i32> for ConfigData {
    fn from(i: i32) -> Self {
        ConfigData::Integer(i64::from(i))
    }
}

impl From<f64> for ConfigData {
    fn from(f: f64) -> Self {
        ConfigData::Float(f)
    }
}

impl From<String> for ConfigData {
    fn from(s: String) -> Self {
        ConfigData::String(s)
    }
}

impl From<&str> for ConfigData {
    fn from(s: &str) -> Self {
        ConfigData::String(s.to_string())
    }
}

impl From<OpaqueValue> for ConfigData {
    fn from(handle: OpaqueValue) -> Self {
        ConfigData::Opaque(handle)
    }
}

impl From<serde_json::Value> for ConfigData {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ConfigData::Null,
            Value::Bool(b) => ConfigData::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigData::Integer(i),
                None => ConfigData::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ConfigData::String(s),
            Value::Array(items) => ConfigData::list(items),
            Value::Object(map) => ConfigData::Map(
                map.into_iter()
                    .map(|(k, v)| (ConfigKey::from(k), ConfigData::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ConfigData {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ConfigData::Null => serializer.serialize_unit(),
            ConfigData::Bool(b) => serializer.serialize_bool(*b),
            ConfigData::Integer(i) => serializer.serialize_i64(*i),
            ConfigData::Float(f) => serializer.serialize_f64(*f),
            ConfigData::String(s) => serializer.serialize_str(s),
            ConfigData::Opaque(_) => Err(S::Error::custom(
                "opaque application objects cannot be serialized",
            )),
            ConfigData::Map(map) if self.is_list() => {
                let mut seq = serializer.serialize_seq(Some(map.len()))?;
                for value in map.values() {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            ConfigData::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}
