// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON codec adapter.

use crate::domain::{ConfigData, ConfigError, Result};
use crate::ports::ConfigCodec;

/// JSON codec implementation.
///
/// Objects keep their member order. Arrays become maps keyed `0..n` and are
/// written back as arrays. Output is pretty-printed.
///
/// # Examples
///
/// ```rust
/// use nestcfg::adapters::JsonCodec;
/// use nestcfg::domain::ConfigData;
/// use nestcfg::ports::ConfigCodec;
///
/// let codec = JsonCodec::new();
/// let data = codec.parse(r#"{"url": "http://example.com/a", "ids": [1, 2]}"#).unwrap();
/// let text = codec.serialize(&data).unwrap();
/// assert!(text.contains("http://example.com/a"));
/// assert_eq!(codec.parse(&text).unwrap(), data);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Creates a new JSON codec.
    pub fn new() -> Self {
        JsonCodec
    }
}

impl ConfigCodec for JsonCodec {
    fn name(&self) -> &str {
        "json"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse(&self, content: &str) -> Result<ConfigData> {
        if content.trim().is_empty() {
            return Ok(ConfigData::map());
        }
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse JSON: {}", e),
                source: Some(Box::new(e)),
            })?;
        Ok(ConfigData::from(value))
    }

    fn serialize(&self, data: &ConfigData) -> Result<String> {
        serde_json::to_string_pretty(data).map_err(|e| ConfigError::SerializeError {
            message: format!("Failed to write JSON: {}", e),
            source: Some(Box::new(e)),
        })
    }
}
