// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deep merging of configuration trees.
//!
//! Merging walks the source tree in order and folds each entry into the
//! destination:
//!
//! - Named keys present on both sides merge recursively when both values are
//!   trees; otherwise the source value replaces the destination value.
//! - Named keys missing from the destination are copied in.
//! - Integer keys never overwrite. An integer key already taken in the
//!   destination is appended under the destination's next free index; a free
//!   one is copied in as is.
//!
//! Copied trees become new children of the destination and take its
//! mutability. The source is never modified.

use crate::domain::config_key::ConfigKey;
use crate::domain::config_tree::{advance_index, index_space_exhausted, ConfigTree};
use crate::domain::config_value::ConfigValue;
use crate::domain::errors::Result;
use std::collections::HashSet;

impl ConfigTree {
    /// Merges `source` into this tree in place.
    ///
    /// # Errors
    ///
    /// Returns `ReadOnly` if this tree, or any destination sub-tree the merge
    /// would descend into, is read-only. Returns `InvalidInput` if an
    /// integer key would have to be appended after `u64::MAX` is taken.
    /// Nothing is modified in either case.
    ///
    /// # Examples
    ///
    /// ```
    /// use nestcfg::domain::{ConfigData, ConfigTree};
    /// use serde_json::json;
    ///
    /// # fn main() -> nestcfg::domain::Result<()> {
    /// let mut a = ConfigTree::from_json(json!({"a": 1, "nested": {"x": 1}, "list": ["p"]}), true)?;
    /// let b = ConfigTree::from_json(json!({"a": 2, "nested": {"y": 2}, "list": ["q"]}), false)?;
    /// a.merge(&b)?;
    /// assert_eq!(
    ///     a.to_mapping(),
    ///     ConfigData::from(json!({"a": 2, "nested": {"x": 1, "y": 2}, "list": ["p", "q"]}))
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn merge(&mut self, source: &ConfigTree) -> Result<&mut Self> {
        check_mergeable(self, source)?;
        tracing::debug!(
            destination_len = self.len(),
            source_len = source.len(),
            "Merging configuration trees"
        );
        merge_into(self, source)?;
        Ok(self)
    }
}

/// Merges `source` into `destination`; see [`ConfigTree::merge`].
pub fn merge<'a>(destination: &'a mut ConfigTree, source: &ConfigTree) -> Result<&'a mut ConfigTree> {
    destination.merge(source)
}

/// Verifies every tree the merge will write to is mutable and has room for
/// its integer appends.
fn check_mergeable(destination: &ConfigTree, source: &ConfigTree) -> Result<()> {
    destination.ensure_writable(|| "merge into this tree".to_string())?;
    check_appends(destination, source)?;
    for (key, value) in source {
        if key.is_index() {
            continue;
        }
        if let (Some(ConfigValue::Tree(dest_child)), ConfigValue::Tree(source_child)) =
            (destination.get(key), value)
        {
            check_mergeable(dest_child, source_child)?;
        }
    }
    Ok(())
}

/// Replays the integer-key placement of `merge_into` without writing.
fn check_appends(destination: &ConfigTree, source: &ConfigTree) -> Result<()> {
    let mut next = destination.next_index();
    let mut placed = HashSet::new();
    for key in source.keys() {
        let ConfigKey::Index(index) = key else {
            continue;
        };
        let slot = if destination.contains_key(key) || placed.contains(index) {
            next.ok_or_else(index_space_exhausted)?
        } else {
            *index
        };
        placed.insert(slot);
        next = advance_index(next, slot);
    }
    Ok(())
}

fn merge_into(destination: &mut ConfigTree, source: &ConfigTree) -> Result<()> {
    let allow_modification = !destination.is_read_only();
    for (key, value) in source {
        match key {
            ConfigKey::Index(_) if destination.contains_key(key) => {
                let next = destination.next_index().ok_or_else(index_space_exhausted)?;
                let appended = ConfigKey::Index(next);
                destination.insert_entry(appended, value.clone().with_mode(allow_modification));
            }
            ConfigKey::Name(_) => {
                if let (Some(ConfigValue::Tree(dest_child)), ConfigValue::Tree(source_child)) =
                    (destination.entry_mut(key), value)
                {
                    merge_into(dest_child, source_child)?;
                    continue;
                }
                if let Some(existing) = destination.get(key) {
                    if existing.type_name() != value.type_name() {
                        tracing::trace!(
                            key = %key,
                            from = existing.type_name(),
                            to = value.type_name(),
                            "Replacing value of a different type during merge"
                        );
                    }
                }
                destination.insert_entry(key.clone(), value.clone().with_mode(allow_modification));
            }
            ConfigKey::Index(_) => {
                destination.insert_entry(key.clone(), value.clone().with_mode(allow_modification));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigData;
    use serde_json::json;

    fn combine_a() -> serde_json::Value {
        json!({
            "foo": 1,
            "bar": 2,
            "text": "foo",
            "numerical": ["first", "second", ["third"]],
            "misaligned": {"2": "foo", "3": "bar"},
            "mixed": {"foo": "bar"},
            "replaceAssoc": {"foo": "bar"},
            "replaceNumerical": ["foo"]
        })
    }

    fn combine_b() -> serde_json::Value {
        json!({
            "foo": 3,
            "text": "bar",
            "numerical": ["fourth", "fifth", ["sixth"]],
            "misaligned": {"3": "baz"},
            "mixed": [false],
            "replaceAssoc": null,
            "replaceNumerical": true
        })
    }

    #[test]
    fn test_merge_rules() {
        let mut a = ConfigTree::from_json(combine_a(), true).unwrap();
        let b = ConfigTree::from_json(combine_b(), false).unwrap();
        a.merge(&b).unwrap();

        assert_eq!(a.get("foo"), Some(&ConfigValue::from(3)));
        assert_eq!(a.get("bar"), Some(&ConfigValue::from(2)));
        assert_eq!(a.get("text"), Some(&ConfigValue::from("bar")));

        let numerical = a.get_tree("numerical").unwrap();
        assert_eq!(numerical.get(0), Some(&ConfigValue::from("first")));
        assert_eq!(numerical.get(1), Some(&ConfigValue::from("second")));
        assert_eq!(numerical.get_path("2.0"), Some(&ConfigValue::from("third")));
        assert_eq!(numerical.get_path("2.1"), None);
        assert_eq!(numerical.get(3), Some(&ConfigValue::from("fourth")));
        assert_eq!(numerical.get(4), Some(&ConfigValue::from("fifth")));
        assert_eq!(numerical.get_path("5.0"), Some(&ConfigValue::from("sixth")));
        assert_eq!(numerical.get_path("5.1"), None);

        let misaligned = a.get_tree("misaligned").unwrap();
        assert_eq!(misaligned.get(2), Some(&ConfigValue::from("foo")));
        assert_eq!(misaligned.get(3), Some(&ConfigValue::from("bar")));
        assert_eq!(misaligned.get(4), Some(&ConfigValue::from("baz")));
        assert_eq!(misaligned.get(0), None);

        let mixed = a.get_tree("mixed").unwrap();
        assert_eq!(mixed.get("foo"), Some(&ConfigValue::from("bar")));
        assert_eq!(mixed.get(0), Some(&ConfigValue::from(false)));
        assert_eq!(mixed.get(1), None);

        assert_eq!(a.get("replaceAssoc"), Some(&ConfigValue::Null));
        assert_eq!(a.get("replaceNumerical"), Some(&ConfigValue::from(true)));
    }

    #[test]
    fn test_count_after_merge() {
        let mut b = ConfigTree::from_json(combine_b(), true).unwrap();
        b.merge(&ConfigTree::from_json(combine_a(), false).unwrap())
            .unwrap();
        assert_eq!(b.to_mapping().as_map().unwrap().len(), b.len());
        assert_eq!(b.len(), 8);
    }

    #[test]
    fn test_merge_replaces_unnamed_lists_by_concatenation() {
        let mut a = ConfigTree::from_json(
            json!({"flag": true, "text": "foo", "list": ["a", "b", "c"], "aSpecific": 12}),
            true,
        )
        .unwrap();
        let b = ConfigTree::from_json(
            json!({"flag": false, "text": "bar", "list": ["d", "e"], "bSpecific": 100}),
            false,
        )
        .unwrap();
        a.merge(&b).unwrap();

        assert_eq!(
            a.to_mapping(),
            ConfigData::from(json!({
                "flag": false,
                "text": "bar",
                "list": ["a", "b", "c", "d", "e"],
                "aSpecific": 12,
                "bSpecific": 100
            }))
        );
    }

    #[test]
    fn test_merge_top_level_sequences_concatenate() {
        let mut a = ConfigTree::from_json(json!(["a", "b"]), true).unwrap();
        let b = ConfigTree::from_json(json!(["c", "d"]), false).unwrap();
        merge(&mut a, &b).unwrap();
        assert_eq!(a.to_mapping(), ConfigData::from(json!(["a", "b", "c", "d"])));
    }

    #[test]
    fn test_merge_scalar_replaces_tree() {
        let mut a = ConfigTree::from_json(json!({"foo": {"bar": 1}}), true).unwrap();
        let b = ConfigTree::from_json(json!({"foo": null}), false).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.get("foo"), Some(&ConfigValue::Null));
    }

    #[test]
    fn test_merge_tree_replaces_scalar() {
        let mut a = ConfigTree::from_json(json!({"foo": "bar"}), true).unwrap();
        let b = ConfigTree::from_json(json!({"foo": {"x": 1}}), false).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.get_path("foo.x"), Some(&ConfigValue::from(1)));
        assert!(!a.get_tree("foo").unwrap().is_read_only());
    }

    #[test]
    fn test_merge_into_read_only_fails_untouched() {
        let mut a = ConfigTree::from_json(json!({"a": 1}), false).unwrap();
        let b = ConfigTree::from_json(json!({"a": 2, "b": 3}), false).unwrap();
        assert!(a.merge(&b).unwrap_err().is_read_only());
        assert_eq!(a.to_mapping(), ConfigData::from(json!({"a": 1})));
    }

    #[test]
    fn test_merge_into_read_only_subtree_fails_atomically() {
        let mut a = ConfigTree::from_json(json!({"top": 1, "inner": {"x": 1}}), true).unwrap();
        a.get_tree_mut("inner").unwrap().set_read_only();
        let b = ConfigTree::from_json(json!({"top": 2, "inner": {"y": 2}}), false).unwrap();

        assert!(a.merge(&b).unwrap_err().is_read_only());
        assert_eq!(a.get("top"), Some(&ConfigValue::from(1)));
        assert_eq!(a.get_path("inner.y"), None);
    }

    #[test]
    fn test_merge_append_past_max_index_fails_atomically() {
        let mut dest = ConfigTree::from_pairs([(u64::MAX, "keep"), (0, "b")], true);
        let before = dest.clone();
        let source = ConfigTree::from_json(json!(["c"]), false).unwrap();

        let err = dest.merge(&source).unwrap_err();
        assert!(matches!(err, crate::domain::ConfigError::InvalidInput { .. }));
        assert_eq!(dest, before);
        assert_eq!(dest.get(u64::MAX), Some(&ConfigValue::from("keep")));
    }

    #[test]
    fn test_merge_free_max_index_then_append_fails() {
        let mut dest = ConfigTree::from_json(json!({"0": "a"}), true).unwrap();
        let before = dest.clone();
        let source = ConfigTree::from_pairs([(u64::MAX, "top"), (0, "again")], true);

        assert!(dest.merge(&source).is_err());
        assert_eq!(dest, before);
    }

    #[test]
    fn test_merge_honours_destination_mode_at_all_levels() {
        let source = ConfigTree::from_json(json!({"key": {"nested": "yes"}, "key2": "yes"}), false)
            .unwrap();
        let mut config = ConfigTree::new(true);
        config.merge(&source).unwrap();

        config.set("key2", "no").unwrap();
        assert_eq!(config.get("key2"), Some(&ConfigValue::from("no")));

        config
            .get_tree_mut("key")
            .unwrap()
            .set("nested", "no")
            .unwrap();
        assert_eq!(config.get_path("key.nested"), Some(&ConfigValue::from("no")));
        assert!(source.get_tree("key").unwrap().is_read_only());
    }

    #[test]
    fn test_merge_into_clone_leaves_original_untouched() {
        let parent = ConfigTree::from_json(json!({"key": {"nested": "parent"}}), true).unwrap();
        let mut copy = parent.clone();
        copy.merge(&ConfigTree::from_json(json!({"key": {"nested": "override"}}), true).unwrap())
            .unwrap();

        assert_eq!(copy.get_path("key.nested"), Some(&ConfigValue::from("override")));
        assert_eq!(parent.get_path("key.nested"), Some(&ConfigValue::from("parent")));
    }

    #[test]
    fn test_merge_does_not_alias_source() {
        let mut a = ConfigTree::new(true);
        let b = ConfigTree::from_json(json!({"inner": {"x": 1}}), true).unwrap();
        a.merge(&b).unwrap();
        a.get_tree_mut("inner").unwrap().set("x", 2).unwrap();
        assert_eq!(b.get_path("inner.x"), Some(&ConfigValue::from(1)));
    }

    #[test]
    fn test_merge_is_not_commutative() {
        let x = ConfigTree::from_json(json!({"k": "x"}), false).unwrap();
        let y = ConfigTree::from_json(json!({"k": "y"}), false).unwrap();

        let mut xy = ConfigTree::new(true);
        xy.merge(&x).unwrap().merge(&y).unwrap();
        let mut yx = ConfigTree::new(true);
        yx.merge(&y).unwrap().merge(&x).unwrap();

        assert_eq!(xy.get("k"), Some(&ConfigValue::from("y")));
        assert_eq!(yx.get("k"), Some(&ConfigValue::from("x")));
    }

    #[test]
    fn test_end_to_end_nested_merge() {
        let mut a = ConfigTree::from_json(json!({"a": 1, "nested": {"x": 1}}), true).unwrap();
        let b = ConfigTree::from_json(json!({"a": 2, "nested": {"y": 2}}), true).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(
            a.to_mapping(),
            ConfigData::from(json!({"a": 2, "nested": {"x": 1, "y": 2}}))
        );
    }
}
