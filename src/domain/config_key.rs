// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key type for type-safe key handling.
//!
//! A key in a configuration tree is either a non-negative integer index (list
//! style entries) or a name (associative entries). The distinction matters for
//! merging: indexed entries are appended, named entries are merged or replaced.

use serde::{Serialize, Serializer};
use std::fmt;

/// A key within one level of a configuration tree.
///
/// Strings that are the canonical decimal form of a non-negative integer are
/// normalized to [`ConfigKey::Index`], so `"3"` and `3` address the same slot.
///
/// # Examples
///
/// ```
/// use nestcfg::domain::config_key::ConfigKey;
///
/// assert_eq!(ConfigKey::from("3"), ConfigKey::Index(3));
/// assert_eq!(ConfigKey::from("03"), ConfigKey::Name("03".to_string()));
/// assert!(ConfigKey::from(0usize).is_index());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigKey {
    /// A list-style integer key.
    Index(u64),
    /// An associative string key.
    Name(String),
}

impl ConfigKey {
    /// Creates a key from a string, normalizing canonical integers to `Index`.
    pub fn new(key: String) -> Self {
        match parse_index(&key) {
            Some(index) => ConfigKey::Index(index),
            None => ConfigKey::Name(key),
        }
    }

    /// Returns `true` for integer keys.
    pub fn is_index(&self) -> bool {
        matches!(self, ConfigKey::Index(_))
    }

    /// Returns the integer index, if this is an integer key.
    pub fn as_index(&self) -> Option<u64> {
        match self {
            ConfigKey::Index(index) => Some(*index),
            ConfigKey::Name(_) => None,
        }
    }

    /// Returns the name, if this is a string key.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            ConfigKey::Index(_) => None,
            ConfigKey::Name(name) => Some(name),
        }
    }
}

/// Parses `s` as a canonical non-negative integer: digits only, no leading zero.
fn parse_index(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    s.parse().ok()
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey::new(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey::new(s.to_string())
    }
}

impl From<&String> for ConfigKey {
    fn from(s: &String) -> Self {
        ConfigKey::new(s.clone())
    }
}

impl From<&ConfigKey> for ConfigKey {
    fn from(key: &ConfigKey) -> Self {
        key.clone()
    }
}

impl From<u64> for ConfigKey {
    fn from(index: u64) -> Self {
        ConfigKey::Index(index)
    }
}

impl From<u32> for ConfigKey {
    fn from(index: u32) -> Self {
        ConfigKey::Index(u64::from(index))
    }
}

impl From<usize> for ConfigKey {
    fn from(index: usize) -> Self {
        ConfigKey::Index(index as u64)
    }
}

/// Negative integers are not list positions; they become named keys.
impl From<i64> for ConfigKey {
    fn from(index: i64) -> Self {
        match u64::try_from(index) {
            Ok(index) => ConfigKey::Index(index),
            Err(_) => ConfigKey::Name(index.to_string()),
        }
    }
}

impl From<i32> for ConfigKey {
    fn from(index: i32) -> Self {
        ConfigKey::from(i64::from(index))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigKey::Index(index) => write!(f, "{}", index),
            ConfigKey::Name(name) => write!(f, "{}", name),
        }
    }
}

impl Serialize for ConfigKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ConfigKey::Index(index) => serializer.serialize_u64(*index),
            ConfigKey::Name(name) => serializer.serialize_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_key_from_str() {
        let key = ConfigKey::from("test.key");
        assert_eq!(key.as_name(), Some("test.key"));
        assert!(!key.is_index());
    }

    #[test]
    fn test_numeric_string_normalizes_to_index() {
        assert_eq!(ConfigKey::from("0"), ConfigKey::Index(0));
        assert_eq!(ConfigKey::from("42".to_string()), ConfigKey::Index(42));
    }

    #[test]
    fn test_non_canonical_numbers_stay_names() {
        assert_eq!(ConfigKey::from("007"), ConfigKey::Name("007".to_string()));
        assert_eq!(ConfigKey::from("-1"), ConfigKey::Name("-1".to_string()));
        assert_eq!(ConfigKey::from("1.5"), ConfigKey::Name("1.5".to_string()));
        assert_eq!(ConfigKey::from(" 1"), ConfigKey::Name(" 1".to_string()));
        assert_eq!(ConfigKey::from(""), ConfigKey::Name(String::new()));
    }

    #[test]
    fn test_overflowing_number_stays_name() {
        let key = ConfigKey::from("99999999999999999999999");
        assert!(!key.is_index());
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(ConfigKey::from(3usize), ConfigKey::Index(3));
        assert_eq!(ConfigKey::from(3u32), ConfigKey::Index(3));
        assert_eq!(ConfigKey::from(3i32), ConfigKey::Index(3));
        assert_eq!(ConfigKey::from(-3i64), ConfigKey::Name("-3".to_string()));
    }

    #[test]
    fn test_config_key_display() {
        assert_eq!(format!("{}", ConfigKey::from("db.host")), "db.host");
        assert_eq!(format!("{}", ConfigKey::Index(7)), "7");
    }

    #[test]
    fn test_config_key_hash() {
        let mut map = HashMap::new();
        map.insert(ConfigKey::from("1"), "one");

        assert_eq!(map.get(&ConfigKey::Index(1)), Some(&"one"));
        assert_eq!(map.get(&ConfigKey::from("name")), None);
    }

    #[test]
    fn test_as_index() {
        assert_eq!(ConfigKey::Index(5).as_index(), Some(5));
        assert_eq!(ConfigKey::from("five").as_index(), None);
    }
}
