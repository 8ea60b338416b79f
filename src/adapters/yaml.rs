// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML codec adapter.
//!
//! This module provides a codec that reads and writes YAML documents.

use crate::domain::{ConfigData, ConfigError, ConfigKey, Result};
use crate::ports::ConfigCodec;

/// YAML codec implementation.
///
/// Mappings become maps, sequences become maps keyed `0..n`. Tagged values are
/// read as their untagged content. An empty document parses as an empty map.
///
/// # Examples
///
/// ```rust
/// use nestcfg::adapters::YamlCodec;
/// use nestcfg::domain::ConfigData;
/// use nestcfg::ports::ConfigCodec;
///
/// let codec = YamlCodec::new();
/// let yaml_content = "database:\n  host: localhost\n  port: 5432";
/// let data = codec.parse(yaml_content).unwrap();
/// let database = data.get("database").unwrap();
/// assert_eq!(database.get("host"), Some(&ConfigData::from("localhost")));
/// assert_eq!(database.get("port"), Some(&ConfigData::from(5432)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlCodec;

impl YamlCodec {
    /// Creates a new YAML codec.
    pub fn new() -> Self {
        YamlCodec
    }

    /// Converts a YAML value into nested configuration data.
    fn convert(value: serde_yaml::Value) -> ConfigData {
        match value {
            serde_yaml::Value::Null => ConfigData::Null,
            serde_yaml::Value::Bool(b) => ConfigData::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigData::Integer(i),
                None => ConfigData::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => ConfigData::String(s),
            serde_yaml::Value::Sequence(seq) => {
                ConfigData::list(seq.into_iter().map(Self::convert))
            }
            serde_yaml::Value::Mapping(map) => ConfigData::Map(
                map.into_iter()
                    .map(|(key, val)| (Self::convert_key(key), Self::convert(val)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Self::convert(tagged.value),
        }
    }

    /// Converts a YAML mapping key; non-string scalars use their text form.
    fn convert_key(key: serde_yaml::Value) -> ConfigKey {
        match key {
            serde_yaml::Value::String(s) => ConfigKey::from(s),
            serde_yaml::Value::Number(n) => ConfigKey::from(n.to_string()),
            serde_yaml::Value::Bool(b) => ConfigKey::from(b.to_string()),
            serde_yaml::Value::Null => ConfigKey::from(""),
            other => ConfigKey::from(
                serde_yaml::to_string(&other)
                    .unwrap_or_default()
                    .trim_end()
                    .to_string(),
            ),
        }
    }
}

impl ConfigCodec for YamlCodec {
    fn name(&self) -> &str {
        "yaml"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }

    fn parse(&self, content: &str) -> Result<ConfigData> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(match value {
            serde_yaml::Value::Null => ConfigData::map(),
            other => Self::convert(other),
        })
    }

    fn serialize(&self, data: &ConfigData) -> Result<String> {
        serde_yaml::to_string(data).map_err(|e| ConfigError::SerializeError {
            message: format!("Failed to write YAML: {}", e),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigTree, ConfigValue, OpaqueValue};

    #[test]
    fn test_yaml_parser_simple() {
        let codec = YamlCodec::new();
        let yaml = "key: value\nnumber: 42";
        let data = codec.parse(yaml).unwrap();

        assert_eq!(data.get("key"), Some(&ConfigData::from("value")));
        assert_eq!(data.get("number"), Some(&ConfigData::from(42)));
    }

    #[test]
    fn test_yaml_parser_nested() {
        let codec = YamlCodec::new();
        let yaml = r#"
database:
  host: localhost
  port: 5432
  credentials:
    username: admin
    password: secret
"#;
        let tree = ConfigTree::from_data(codec.parse(yaml).unwrap(), false).unwrap();

        assert_eq!(
            tree.get_path("database.host"),
            Some(&ConfigValue::from("localhost"))
        );
        assert_eq!(tree.get_path("database.port"), Some(&ConfigValue::from(5432)));
        assert_eq!(
            tree.get_path("database.credentials.password"),
            Some(&ConfigValue::from("secret"))
        );
    }

    #[test]
    fn test_yaml_parser_arrays() {
        let codec = YamlCodec::new();
        let yaml = r#"
servers:
  - host1
  - host2
  - host3
"#;
        let data = codec.parse(yaml).unwrap();
        let servers = data.get("servers").unwrap();

        assert!(servers.is_list());
        assert_eq!(servers.get(0), Some(&ConfigData::from("host1")));
        assert_eq!(servers.get(2), Some(&ConfigData::from("host3")));
    }

    #[test]
    fn test_yaml_parser_scalar_types() {
        let codec = YamlCodec::new();
        let yaml = "bool_true: true\nfloat_val: 3.5\nnull_val: null\nempty_val:";
        let data = codec.parse(yaml).unwrap();

        assert_eq!(data.get("bool_true"), Some(&ConfigData::from(true)));
        assert_eq!(data.get("float_val"), Some(&ConfigData::from(3.5)));
        assert_eq!(data.get("null_val"), Some(&ConfigData::Null));
        assert_eq!(data.get("empty_val"), Some(&ConfigData::Null));
    }

    #[test]
    fn test_yaml_numeric_keys_become_indexes() {
        let codec = YamlCodec::new();
        let data = codec.parse("1: one\n2: two\nname: x").unwrap();
        assert_eq!(data.get(1), Some(&ConfigData::from("one")));
        assert_eq!(data.get("name"), Some(&ConfigData::from("x")));
    }

    #[test]
    fn test_yaml_parser_empty_document() {
        let codec = YamlCodec::new();
        assert_eq!(codec.parse("").unwrap(), ConfigData::map());
    }

    #[test]
    fn test_yaml_parser_invalid() {
        let codec = YamlCodec::new();
        let result = codec.parse("invalid: yaml: content: [");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_write_and_read() {
        let codec = YamlCodec::new();
        let data = ConfigData::from_pairs([
            ("name", ConfigData::from("app")),
            ("ports", ConfigData::list([80, 443])),
            (
                "db",
                ConfigData::from_pairs([("host", ConfigData::from("h")), ("debug", ConfigData::from(false))]),
            ),
        ]);
        let text = codec.serialize(&data).unwrap();
        assert!(text.contains("- 80"));
        assert_eq!(codec.parse(&text).unwrap(), data);
    }

    #[test]
    fn test_yaml_write_rejects_objects() {
        let codec = YamlCodec::new();
        let data = ConfigData::from_pairs([("obj", OpaqueValue::new(1u8))]);
        assert!(matches!(
            codec.serialize(&data),
            Err(ConfigError::SerializeError { .. })
        ));
    }

    #[test]
    fn test_supported_extensions() {
        assert_eq!(YamlCodec::new().supported_extensions(), &["yaml", "yml"]);
    }
}
