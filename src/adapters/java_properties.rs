// SPDX-License-Identifier: MIT OR Apache-2.0

//! Java properties codec adapter.
//!
//! Properties documents are flat: every line is a `key<delimiter>value` pair
//! and dotted keys such as `single.line` stay single keys.

use crate::domain::{ConfigData, ConfigError, ConfigKey, Result};
use crate::ports::ConfigCodec;

/// The delimiter used when none is configured.
pub const DEFAULT_DELIMITER: &str = ":";

/// Java properties codec implementation.
///
/// # Examples
///
/// ```rust
/// use nestcfg::adapters::JavaPropertiesCodec;
/// use nestcfg::domain::ConfigData;
/// use nestcfg::ports::ConfigCodec;
///
/// let codec = JavaPropertiesCodec::new();
/// let data = codec.parse("#comment\nsingle.line:test\nmultiple:line \\\ntest").unwrap();
/// assert_eq!(data.get("single.line"), Some(&ConfigData::from("test")));
/// assert_eq!(data.get("multiple"), Some(&ConfigData::from("line test")));
/// ```
#[derive(Debug, Clone)]
pub struct JavaPropertiesCodec {
    delimiter: String,
    trim_whitespace: bool,
}

impl JavaPropertiesCodec {
    /// Creates a codec using `:` as delimiter, without whitespace trimming.
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            trim_whitespace: false,
        }
    }

    /// Creates a codec with a custom key/value delimiter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `delimiter` is empty.
    pub fn with_delimiter(delimiter: impl Into<String>) -> Result<Self> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(ConfigError::invalid_input(
                "Java properties delimiter must be a non-empty string",
            ));
        }
        Ok(Self {
            delimiter,
            trim_whitespace: false,
        })
    }

    /// Enables or disables trimming of whitespace around keys and values.
    pub fn trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }

    /// Returns the key/value delimiter.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Joins physical lines ending in a backslash into logical lines.
    fn logical_lines(content: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let mut pending: Option<String> = None;
        for raw in content.lines() {
            let mut line = pending.take().unwrap_or_default();
            match raw.strip_suffix('\\') {
                Some(continued) => {
                    line.push_str(continued);
                    pending = Some(line);
                }
                None => {
                    line.push_str(raw);
                    lines.push(line);
                }
            }
        }
        if let Some(line) = pending {
            lines.push(line);
        }
        lines
    }
}

impl Default for JavaPropertiesCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigCodec for JavaPropertiesCodec {
    fn name(&self) -> &str {
        "java-properties"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["properties"]
    }

    fn parse(&self, content: &str) -> Result<ConfigData> {
        let mut pairs = Vec::new();
        for (number, line) in Self::logical_lines(content).into_iter().enumerate() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            let (key, value) =
                trimmed
                    .split_once(self.delimiter.as_str())
                    .ok_or_else(|| ConfigError::ParseError {
                        message: format!(
                            "Line {} has no '{}' delimiter: {}",
                            number + 1,
                            self.delimiter,
                            trimmed
                        ),
                        source: None,
                    })?;
            let (key, value) = if self.trim_whitespace {
                (key.trim(), value.trim())
            } else {
                (key, value)
            };
            pairs.push((ConfigKey::from(key), ConfigData::from(value)));
        }
        Ok(ConfigData::from_pairs(pairs))
    }

    fn serialize(&self, data: &ConfigData) -> Result<String> {
        let map = data.as_map().ok_or_else(|| {
            ConfigError::invalid_input(format!(
                "Java properties can only be written from a map, found {}",
                data.type_name()
            ))
        })?;

        let mut out = String::new();
        for (key, value) in map {
            let text = match value {
                ConfigData::Null => String::new(),
                ConfigData::Bool(b) => b.to_string(),
                ConfigData::Integer(i) => i.to_string(),
                ConfigData::Float(f) => f.to_string(),
                ConfigData::String(s) => s.clone(),
                ConfigData::Opaque(_) | ConfigData::Map(_) => {
                    return Err(ConfigError::invalid_input(format!(
                        "Java properties can only hold scalar values; received {} for key '{}'",
                        value.type_name(),
                        key
                    )));
                }
            };
            out.push_str(&format!("{}{}{}\n", key, self.delimiter, text));
        }
        Ok(out)
    }
}
