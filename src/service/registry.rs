// SPDX-License-Identifier: MIT OR Apache-2.0

//! Codec lookup by file extension.

use crate::domain::{ConfigError, Result};
use crate::ports::ConfigCodec;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Maps file extensions to codecs.
///
/// Extensions are matched case-insensitively. Registering a codec replaces
/// any codec previously registered for the same extensions.
///
/// # Examples
///
/// ```rust
/// use nestcfg::service::CodecRegistry;
///
/// # fn main() -> nestcfg::domain::Result<()> {
/// let registry = CodecRegistry::with_defaults();
/// let codec = registry.for_path("settings.JSON")?;
/// assert_eq!(codec.name(), "json");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct CodecRegistry {
    codecs: BTreeMap<String, Arc<dyn ConfigCodec>>,
}

impl CodecRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every codec enabled by cargo features.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "yaml")]
        registry.register(Arc::new(crate::adapters::YamlCodec::new()));

        #[cfg(feature = "json")]
        registry.register(Arc::new(crate::adapters::JsonCodec::new()));

        #[cfg(feature = "properties")]
        registry.register(Arc::new(crate::adapters::JavaPropertiesCodec::new()));

        registry
    }

    /// Adds a codec for each of its supported extensions.
    pub fn register(&mut self, codec: Arc<dyn ConfigCodec>) {
        for extension in codec.supported_extensions() {
            tracing::debug!(codec = codec.name(), extension, "Registering codec");
            self.codecs
                .insert(extension.to_ascii_lowercase(), Arc::clone(&codec));
        }
    }

    /// Adds a codec, returning the registry.
    pub fn with_codec(mut self, codec: Arc<dyn ConfigCodec>) -> Self {
        self.register(codec);
        self
    }

    /// Returns the codec registered for `extension`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` if no codec handles the extension.
    pub fn for_extension(&self, extension: &str) -> Result<Arc<dyn ConfigCodec>> {
        let key = extension.trim_start_matches('.').to_ascii_lowercase();
        let codec = self
            .codecs
            .get(&key)
            .cloned()
            .ok_or_else(|| ConfigError::UnsupportedFormat {
                extension: extension.to_string(),
            })?;
        tracing::trace!(extension = key.as_str(), codec = codec.name(), "Resolved codec");
        Ok(codec)
    }

    /// Returns the codec for the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` if the path has no extension or no codec
    /// handles it.
    pub fn for_path(&self, path: impl AsRef<Path>) -> Result<Arc<dyn ConfigCodec>> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat {
                extension: path.display().to_string(),
            })?;
        self.for_extension(extension)
    }

    /// Returns `true` if a codec handles `extension`.
    pub fn supports(&self, extension: &str) -> bool {
        self.codecs.contains_key(&extension.to_ascii_lowercase())
    }

    /// Returns the registered extensions in sorted order.
    pub fn extensions(&self) -> Vec<&str> {
        self.codecs.keys().map(String::as_str).collect()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codecs: BTreeMap<&str, &str> = self
            .codecs
            .iter()
            .map(|(ext, codec)| (ext.as_str(), codec.name()))
            .collect();
        f.debug_struct("CodecRegistry").field("codecs", &codecs).finish()
    }
}
