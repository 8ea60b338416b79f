// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration codec trait definition.
//!
//! This module defines the `ConfigCodec` trait, which provides an interface for
//! reading and writing configuration documents in different formats (YAML,
//! JSON, Java properties, etc.).

use crate::domain::{ConfigData, Result};

/// A trait for parsing and serializing configuration documents.
///
/// A codec turns document text into plain nested [`ConfigData`] and back. It
/// knows nothing about read-only state or merging; callers wrap the parsed
/// data in a [`ConfigTree`](crate::domain::ConfigTree).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a registry can be shared.
///
/// # Examples
///
/// ```rust
/// use nestcfg::ports::ConfigCodec;
/// use nestcfg::domain::{ConfigData, Result};
///
/// struct LinesCodec;
///
/// impl ConfigCodec for LinesCodec {
///     fn name(&self) -> &str {
///         "lines"
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["lines"]
///     }
///
///     fn parse(&self, content: &str) -> Result<ConfigData> {
///         Ok(ConfigData::list(content.lines()))
///     }
///
///     fn serialize(&self, _data: &ConfigData) -> Result<String> {
///         Ok(String::new())
///     }
/// }
///
/// let data = LinesCodec.parse("a\nb").unwrap();
/// assert_eq!(data.get(1), Some(&ConfigData::from("b")));
/// ```
pub trait ConfigCodec: Send + Sync {
    /// Returns the name of this codec, used in logs and error messages.
    fn name(&self) -> &str;

    /// Returns the file extensions (without the leading dot) this codec handles.
    fn supported_extensions(&self) -> &[&str];

    /// Parses document text into nested data.
    ///
    /// # Returns
    ///
    /// * `Ok(ConfigData)` - The parsed document; a map for any non-empty document
    /// * `Err(ConfigError::ParseError)` - The document is malformed
    fn parse(&self, content: &str) -> Result<ConfigData>;

    /// Serializes nested data into document text.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The rendered document
    /// * `Err(ConfigError)` - The data cannot be represented in this format
    fn serialize(&self, data: &ConfigData) -> Result<String>;
}
