// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value processor trait definition.
//!
//! This module defines the `Processor` trait, which rewrites the values of a
//! configuration tree, and the tree walk every processor shares.

use crate::domain::{ConfigKey, ConfigTree, ConfigValue, Result};

/// A stage that rewrites configuration values.
///
/// Implementors provide [`Processor::process_value`]; the provided
/// [`Processor::process`] applies it to every leaf of a tree, descending into
/// nested trees and leaving the structure itself alone.
///
/// Processing is all-or-nothing: the tree and all its descendants must be
/// mutable, and if any value fails to process the tree is left unchanged.
///
/// # Examples
///
/// ```rust
/// use nestcfg::ports::Processor;
/// use nestcfg::domain::{ConfigTree, ConfigValue, Result};
///
/// struct Shout;
///
/// impl Processor for Shout {
///     fn process_value(&self, value: ConfigValue) -> Result<ConfigValue> {
///         Ok(match value {
///             ConfigValue::String(s) => ConfigValue::String(s.to_uppercase()),
///             other => other,
///         })
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let mut tree = ConfigTree::from_pairs([("greeting", "hi")], true);
/// Shout.process(&mut tree)?;
/// assert_eq!(tree.get("greeting"), Some(&ConfigValue::from("HI")));
/// # Ok(())
/// # }
/// ```
pub trait Processor: Send + Sync {
    /// Transforms a single value.
    ///
    /// Values the processor does not understand must be returned unchanged.
    fn process_value(&self, value: ConfigValue) -> Result<ConfigValue>;

    /// Transforms every leaf value of `tree` in place.
    ///
    /// # Errors
    ///
    /// Returns `ReadOnly` if `tree` or any descendant is read-only, or the
    /// first error raised by [`Processor::process_value`].
    fn process(&self, tree: &mut ConfigTree) -> Result<()> {
        process_atomically(tree, |work| {
            walk_tree(work, &|value| self.process_value(value), None)
        })
    }
}

/// Signature of a key rewrite used by processors that also rename keys.
pub type KeyRewrite<'a> = &'a dyn Fn(&str) -> Result<String>;

/// Runs `body` on a copy of `tree` and stores the copy only on success.
///
/// # Errors
///
/// Returns `ReadOnly` if `tree` or any descendant is read-only.
pub fn process_atomically<F>(tree: &mut ConfigTree, body: F) -> Result<()>
where
    F: FnOnce(&mut ConfigTree) -> Result<()>,
{
    tree.ensure_writable_deep("process config")?;
    let mut work = tree.clone();
    body(&mut work)?;
    *tree = work;
    Ok(())
}

/// Applies `leaf` to every non-tree value of `tree`, recursively.
///
/// When `rename` is given, named keys are passed through it as well; a key
/// that changes is removed and its value re-inserted under the new name at
/// the end of its level.
pub fn walk_tree(
    tree: &mut ConfigTree,
    leaf: &dyn Fn(ConfigValue) -> Result<ConfigValue>,
    rename: Option<KeyRewrite<'_>>,
) -> Result<()> {
    let mut cursor = tree.cursor();
    while let Some(key) = cursor.next_key(tree) {
        if let Some(child) = tree.get_tree_mut(&key) {
            walk_tree(child, leaf, rename)?;
        } else if let Some(value) = tree.get(&key).cloned() {
            tree.set(key.clone(), leaf(value)?)?;
        }

        let (Some(rename), ConfigKey::Name(name)) = (rename, &key) else {
            continue;
        };
        let renamed = ConfigKey::from(rename(name)?);
        if renamed != key {
            if let Some(value) = tree.unset(&key)? {
                tree.set(renamed, value)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigData, ConfigError};
    use serde_json::json;

    struct Doubler;

    impl Processor for Doubler {
        fn process_value(&self, value: ConfigValue) -> Result<ConfigValue> {
            Ok(match value {
                ConfigValue::Integer(i) => ConfigValue::Integer(i * 2),
                other => other,
            })
        }
    }

    struct FailOn(i64);

    impl Processor for FailOn {
        fn process_value(&self, value: ConfigValue) -> Result<ConfigValue> {
            match value {
                ConfigValue::Integer(i) if i == self.0 => {
                    Err(ConfigError::invalid_input(format!("refusing {}", i)))
                }
                other => Ok(other),
            }
        }
    }

    fn nested() -> serde_json::Value {
        json!({
            "a": 1,
            "b": 2,
            "c": {"ca": 3, "cb": 4, "cd": {"cda": 6}},
            "d": {"da": 8},
            "e": 10
        })
    }

    #[test]
    fn test_process_recurses() {
        let mut tree = ConfigTree::from_json(nested(), true).unwrap();
        Doubler.process(&mut tree).unwrap();
        assert_eq!(
            tree.to_mapping(),
            ConfigData::from(json!({
                "a": 2,
                "b": 4,
                "c": {"ca": 6, "cb": 8, "cd": {"cda": 12}},
                "d": {"da": 16},
                "e": 20
            }))
        );
    }

    #[test]
    fn test_process_read_only_fails() {
        let mut tree = ConfigTree::from_json(nested(), false).unwrap();
        let err = Doubler.process(&mut tree).unwrap_err();
        assert!(err.is_read_only());
    }

    #[test]
    fn test_process_read_only_subtree_fails_without_changes() {
        let mut tree = ConfigTree::from_json(nested(), true).unwrap();
        tree.get_tree_mut("d").unwrap().set_read_only();
        assert!(Doubler.process(&mut tree).unwrap_err().is_read_only());
        assert_eq!(tree.get("a"), Some(&ConfigValue::from(1)));
    }

    #[test]
    fn test_failed_value_leaves_tree_unchanged() {
        let mut tree = ConfigTree::from_json(nested(), true).unwrap();
        let before = tree.clone();
        let err = FailOn(8).process(&mut tree).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInput { .. }));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_walk_tree_renames_keys() {
        let mut tree = ConfigTree::from_json(json!({"OLD": 1, "keep": {"OLD": 2}}), true).unwrap();
        let rename = |key: &str| -> Result<String> { Ok(key.replace("OLD", "new")) };
        walk_tree(&mut tree, &|value| Ok(value), Some(&rename)).unwrap();
        assert_eq!(
            tree.to_mapping(),
            ConfigData::from(json!({"keep": {"new": 2}, "new": 1}))
        );
    }

    #[test]
    fn test_processor_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn Processor>>();
    }
}
