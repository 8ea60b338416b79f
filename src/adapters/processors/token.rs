// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token substitution processor.

use crate::domain::{ConfigError, ConfigTree, ConfigValue, Result};
use crate::ports::processor::{process_atomically, walk_tree};
use crate::ports::Processor;
use indexmap::IndexMap;

/// Replaces `prefix + NAME + suffix` occurrences in values with token values.
///
/// Substitution is a single left-to-right pass that prefers the longest
/// matching pattern; replaced text is not scanned again. Patterns are built
/// from the current prefix and suffix on every call, so changing them takes
/// effect on the next run. Tokens whose pattern or replacement is empty are
/// ignored.
///
/// Booleans and numbers are matched against their text form and only become
/// strings when a token actually matched. `true` reads as `"1"` and `false`
/// as the empty string, so `false` never matches.
///
/// # Examples
///
/// ```rust
/// use nestcfg::adapters::TokenProcessor;
/// use nestcfg::domain::ConfigValue;
/// use nestcfg::ports::Processor;
///
/// let processor = TokenProcessor::with_tokens([("TOKEN", "value")]).with_prefix("##").with_suffix("##");
/// let out = processor.process_value(ConfigValue::from("a ##TOKEN## b")).unwrap();
/// assert_eq!(out, ConfigValue::from("a value b"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenProcessor {
    tokens: IndexMap<String, String>,
    prefix: String,
    suffix: String,
    process_keys: bool,
}

impl TokenProcessor {
    /// Creates a processor with no tokens and empty prefix and suffix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a processor with the given tokens.
    pub fn with_tokens<I, K, V>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut processor = Self::new();
        processor.set_tokens(tokens);
        processor
    }

    /// Creates a processor whose tokens are the entries of `tree`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if any entry is not a scalar.
    pub fn from_tree(tree: &ConfigTree) -> Result<Self> {
        let mut processor = Self::new();
        for (key, value) in tree {
            processor.add_token_value(key.to_string(), value)?;
        }
        Ok(processor)
    }

    /// Sets the prefix, returning the processor.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the suffix, returning the processor.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Enables or disables renaming of keys, returning the processor.
    pub fn with_key_processing(mut self, enabled: bool) -> Self {
        self.process_keys = enabled;
        self
    }

    /// Adds or replaces a token.
    pub fn add_token(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tokens.insert(name.into(), value.into());
    }

    /// Adds or replaces a token from a configuration value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `value` is a tree or an opaque object.
    pub fn add_token_value(&mut self, name: impl Into<String>, value: &ConfigValue) -> Result<()> {
        let name = name.into();
        let text = match value {
            ConfigValue::Null => String::new(),
            other => token_text(other).ok_or_else(|| {
                ConfigError::invalid_input(format!(
                    "Cannot use {} as value for token '{}'",
                    other.type_name(),
                    name
                ))
            })?,
        };
        self.tokens.insert(name, text);
        Ok(())
    }

    /// Replaces all tokens.
    pub fn set_tokens<I, K, V>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tokens = tokens
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    /// Returns the registered tokens.
    pub fn tokens(&self) -> &IndexMap<String, String> {
        &self.tokens
    }

    /// Sets the text expected before each token name.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Returns the token prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Sets the text expected after each token name.
    pub fn set_suffix(&mut self, suffix: impl Into<String>) {
        self.suffix = suffix.into();
    }

    /// Returns the token suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Turns on substitution inside keys as well as values.
    pub fn enable_key_processing(&mut self) {
        self.process_keys = true;
    }

    /// Returns `true` if keys are processed as well as values.
    pub fn key_processing(&self) -> bool {
        self.process_keys
    }

    /// Builds the pattern table for the current prefix and suffix.
    fn patterns(&self) -> Vec<(String, &str)> {
        self.tokens
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| (format!("{}{}{}", self.prefix, name, self.suffix), value.as_str()))
            .filter(|(pattern, _)| !pattern.is_empty())
            .collect()
    }

    fn substitute_value(value: ConfigValue, patterns: &[(String, &str)]) -> ConfigValue {
        match value {
            ConfigValue::String(s) => ConfigValue::String(substitute(&s, patterns)),
            scalar @ (ConfigValue::Bool(_) | ConfigValue::Integer(_) | ConfigValue::Float(_)) => {
                let Some(text) = token_text(&scalar) else {
                    return scalar;
                };
                let changed = substitute(&text, patterns);
                if changed == text {
                    scalar
                } else {
                    ConfigValue::String(changed)
                }
            }
            other => other,
        }
    }
}

/// Text form of a scalar as seen by token matching.
fn token_text(value: &ConfigValue) -> Option<String> {
    match value {
        ConfigValue::Bool(true) => Some("1".to_string()),
        ConfigValue::Bool(false) => Some(String::new()),
        other => other.scalar_to_string(),
    }
}

/// Replaces every pattern occurrence in one pass, longest match first.
fn substitute(text: &str, patterns: &[(String, &str)]) -> String {
    if patterns.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        let best = patterns
            .iter()
            .filter(|(pattern, _)| rest.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len());
        if let Some((pattern, replacement)) = best {
            out.push_str(replacement);
            rest = &rest[pattern.len()..];
            continue;
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

impl Processor for TokenProcessor {
    fn process_value(&self, value: ConfigValue) -> Result<ConfigValue> {
        Ok(Self::substitute_value(value, &self.patterns()))
    }

    fn process(&self, tree: &mut ConfigTree) -> Result<()> {
        let patterns = self.patterns();
        tracing::debug!(
            tokens = patterns.len(),
            process_keys = self.process_keys,
            "Running token substitution"
        );
        let leaf = |value: ConfigValue| -> Result<ConfigValue> {
            Ok(Self::substitute_value(value, &patterns))
        };
        let rename = |key: &str| -> Result<String> { Ok(substitute(key, &patterns)) };
        process_atomically(tree, |work| {
            if self.process_keys {
                walk_tree(work, &leaf, Some(&rename))
            } else {
                walk_tree(work, &leaf, None)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigData;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ConfigTree {
        ConfigTree::from_json(value, true).unwrap()
    }

    fn token_data(token: &str, outer: &str) -> serde_json::Value {
        json!({
            "simple": token,
            "inside": format!("{o} some text with {t} inside {o}", o = outer, t = token),
            "nested": {
                "simple": token,
                "inside": format!("{o} some text with {t} inside {o}", o = outer, t = token),
            }
        })
    }

    fn assert_replaced(config: &ConfigTree, outer: &str) {
        let inside = format!("{o} some text with some replaced value inside {o}", o = outer);
        assert_eq!(config.get("simple"), Some(&ConfigValue::from("some replaced value")));
        assert_eq!(config.get("inside"), Some(&ConfigValue::from(inside.as_str())));
        assert_eq!(
            config.get_path("nested.simple"),
            Some(&ConfigValue::from("some replaced value"))
        );
        assert_eq!(config.get_path("nested.inside"), Some(&ConfigValue::from(inside.as_str())));
    }

    #[test]
    fn test_bare_token() {
        let mut config = tree(json!({
            "simple": "BARETOKEN",
            "inside": "some text with BARETOKEN inside",
            "nested": {"simple": "BARETOKEN", "inside": "some text with BARETOKEN inside"}
        }));
        let mut processor = TokenProcessor::new();
        processor.add_token("BARETOKEN", "some replaced value");
        processor.process(&mut config).unwrap();

        assert_eq!(processor.tokens().get("BARETOKEN").unwrap(), "some replaced value");
        assert_eq!(config.get("simple"), Some(&ConfigValue::from("some replaced value")));
        assert_eq!(
            config.get("inside"),
            Some(&ConfigValue::from("some text with some replaced value inside"))
        );
        assert_eq!(
            config.get_path("nested.inside"),
            Some(&ConfigValue::from("some text with some replaced value inside"))
        );
    }

    #[test]
    fn test_single_value() {
        let mut processor = TokenProcessor::new();
        processor.add_token("BARETOKEN", "test");
        let out = processor.process_value(ConfigValue::from("BARETOKEN")).unwrap();
        assert_eq!(out, ConfigValue::from("test"));
    }

    #[test]
    fn test_read_only_tree_rejected() {
        let mut config = ConfigTree::from_json(json!({"simple": "BARETOKEN"}), false).unwrap();
        let processor = TokenProcessor::with_tokens([("BARETOKEN", "x")]);
        let err = processor.process(&mut config).unwrap_err();
        assert!(err.is_read_only());
        assert_eq!(config.get("simple"), Some(&ConfigValue::from("BARETOKEN")));
    }

    #[test]
    fn test_prefix() {
        let mut config = tree(token_data("::TOKEN", "::"));
        TokenProcessor::with_tokens([("TOKEN", "some replaced value")])
            .with_prefix("::")
            .process(&mut config)
            .unwrap();
        assert_replaced(&config, "::");
    }

    #[test]
    fn test_suffix() {
        let mut config = tree(token_data("TOKEN::", "::"));
        TokenProcessor::with_tokens([("TOKEN", "some replaced value")])
            .with_suffix("::")
            .process(&mut config)
            .unwrap();
        assert_replaced(&config, "::");
    }

    #[test]
    fn test_surround() {
        let mut config = tree(token_data("##TOKEN##", "##"));
        TokenProcessor::with_tokens([("TOKEN", "some replaced value")])
            .with_prefix("##")
            .with_suffix("##")
            .process(&mut config)
            .unwrap();
        assert_replaced(&config, "##");
    }

    #[test]
    fn test_change_params_between_runs() {
        let mut config = tree(json!({
            "simple": "##TOKEN##",
            "inside": "## some text with ##TOKEN## inside ##",
            "nested": {
                "simple": "@@TOKEN@@",
                "inside": "@@ some text with @@TOKEN@@ inside @@"
            }
        }));
        let mut processor = TokenProcessor::with_tokens([("TOKEN", "some replaced value")])
            .with_prefix("##")
            .with_suffix("##");
        processor.process(&mut config).unwrap();
        assert_eq!(config.get("simple"), Some(&ConfigValue::from("some replaced value")));
        assert_eq!(config.get_path("nested.simple"), Some(&ConfigValue::from("@@TOKEN@@")));

        processor.set_prefix("@@");
        processor.set_suffix("@@");
        assert_eq!(processor.prefix(), "@@");
        assert_eq!(processor.suffix(), "@@");
        processor.process(&mut config).unwrap();

        assert_eq!(
            config.get("inside"),
            Some(&ConfigValue::from("## some text with some replaced value inside ##"))
        );
        assert_eq!(
            config.get_path("nested.simple"),
            Some(&ConfigValue::from("some replaced value"))
        );
        assert_eq!(
            config.get_path("nested.inside"),
            Some(&ConfigValue::from("@@ some text with some replaced value inside @@"))
        );
    }

    #[test]
    fn test_retains_type_without_match() {
        let mut config = tree(json!({
            "trueBoolKey": true,
            "falseBoolKey": false,
            "intKey": 123,
            "floatKey": 123.456,
            "nullKey": null
        }));
        TokenProcessor::new().process(&mut config).unwrap();

        assert_eq!(config.get("trueBoolKey"), Some(&ConfigValue::from(true)));
        assert_eq!(config.get("falseBoolKey"), Some(&ConfigValue::from(false)));
        assert_eq!(config.get("intKey"), Some(&ConfigValue::from(123)));
        assert_eq!(config.get("floatKey"), Some(&ConfigValue::from(123.456)));
        assert_eq!(config.get("nullKey"), Some(&ConfigValue::Null));
    }

    #[test]
    fn test_replaces_in_numerics() {
        let mut config = tree(json!({
            "foo": "bar1",
            "trueBoolKey": true,
            "falseBoolKey": false,
            "intKey": 123,
            "floatKey": 123.456,
            "doubleKey": 456.789
        }));
        TokenProcessor::with_tokens([("1", "R"), ("9", "R")])
            .process(&mut config)
            .unwrap();

        assert_eq!(config.get("foo"), Some(&ConfigValue::from("barR")));
        assert_eq!(config.get("trueBoolKey"), Some(&ConfigValue::from("R")));
        assert_eq!(config.get("falseBoolKey"), Some(&ConfigValue::from(false)));
        assert_eq!(config.get("intKey"), Some(&ConfigValue::from("R23")));
        assert_eq!(config.get("floatKey"), Some(&ConfigValue::from("R23.456")));
        assert_eq!(config.get("doubleKey"), Some(&ConfigValue::from("456.78R")));
    }

    #[test]
    fn test_false_is_not_matched_by_its_spelling() {
        let mut config = tree(json!({"trueBoolKey": true, "falseBoolKey": false}));
        TokenProcessor::with_tokens([("1", "R"), ("a", "X"), ("true", "Y")])
            .process(&mut config)
            .unwrap();

        assert_eq!(config.get("trueBoolKey"), Some(&ConfigValue::from("R")));
        assert_eq!(config.get("falseBoolKey"), Some(&ConfigValue::from(false)));
    }

    #[test]
    fn test_ignores_empty_pattern() {
        let mut config = tree(json!({"foo": "bar"}));
        TokenProcessor::with_tokens([("", "invalid")])
            .process(&mut config)
            .unwrap();
        assert_eq!(config.get("foo"), Some(&ConfigValue::from("bar")));
    }

    #[test]
    fn test_ignores_empty_replacement() {
        let mut config = tree(json!({"text": "some text with BARETOKEN inside"}));
        let mut processor = TokenProcessor::with_tokens([("BARETOKEN", "X")]);
        processor.add_token("BARETOKEN", "");
        processor.process(&mut config).unwrap();
        assert_eq!(
            config.get("text"),
            Some(&ConfigValue::from("some text with BARETOKEN inside"))
        );
    }

    #[test]
    fn test_longest_match_and_no_rescan() {
        let processor = TokenProcessor::with_tokens([("A", "AB"), ("AB", "x"), ("B", "y")]);
        let out = processor.process_value(ConfigValue::from("AB A B")).unwrap();
        assert_eq!(out, ConfigValue::from("x AB y"));
    }

    #[test]
    fn test_keys_untouched_by_default() {
        let mut config = tree(json!({"TOKEN": "TOKEN"}));
        let processor = TokenProcessor::with_tokens([("TOKEN", "v")]);
        assert!(!processor.key_processing());
        processor.process(&mut config).unwrap();
        assert_eq!(config.to_mapping(), ConfigData::from(json!({"TOKEN": "v"})));
    }

    #[test]
    fn test_key_processing_renames_keys() {
        let mut config = tree(json!({"TOKEN": "value", "other": {"TOKEN_x": 1}}));
        let mut processor = TokenProcessor::with_tokens([("TOKEN", "renamed")]);
        processor.enable_key_processing();
        processor.process(&mut config).unwrap();

        assert_eq!(config.get("renamed"), Some(&ConfigValue::from("value")));
        assert!(!config.contains_key("TOKEN"));
        assert_eq!(config.get_path("other.renamed_x"), Some(&ConfigValue::from(1)));
    }

    #[test]
    fn test_from_tree() {
        let source = ConfigTree::from_json(json!({"HOST": "localhost", "PORT": 80}), false).unwrap();
        let processor = TokenProcessor::from_tree(&source).unwrap();
        assert_eq!(processor.tokens().get("PORT").unwrap(), "80");

        let invalid = ConfigTree::from_json(json!({"NESTED": {"a": 1}}), false).unwrap();
        let err = TokenProcessor::from_tree(&invalid).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInput { .. }));
    }

    #[test]
    fn test_leaves_objects_untouched() {
        let handle = crate::domain::OpaqueValue::new("TOKEN".to_string());
        let processor = TokenProcessor::with_tokens([("TOKEN", "v")]);
        let out = processor
            .process_value(ConfigValue::from(handle.clone()))
            .unwrap();
        assert_eq!(out, ConfigValue::from(handle));
    }
}
