// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading and writing configuration files.
//!
//! The loader picks a codec from the file extension, reads the file with a
//! size limit and turns the parsed mapping into a [`ConfigTree`].

use super::registry::CodecRegistry;
use crate::domain::{ConfigData, ConfigError, ConfigTree, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed size for a configuration file (10MB)
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SOURCE_NAME: &str = "file";

fn file_label(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

fn source_error(message: String, source: Option<std::io::Error>) -> ConfigError {
    ConfigError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message,
        source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
    }
}

/// Loads configuration trees from files and writes them back.
///
/// # Examples
///
/// ```rust,no_run
/// use nestcfg::service::ConfigLoader;
///
/// # fn main() -> nestcfg::domain::Result<()> {
/// let loader = ConfigLoader::with_defaults();
/// let config = loader.load_files(["base.yaml", "local.json"], false)?;
/// println!("{:?}", config.get_path("database.host"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    registry: CodecRegistry,
}

impl ConfigLoader {
    /// Creates a loader using the given codecs.
    pub fn new(registry: CodecRegistry) -> Self {
        Self { registry }
    }

    /// Creates a loader with every codec enabled by cargo features.
    pub fn with_defaults() -> Self {
        Self::new(CodecRegistry::with_defaults())
    }

    /// Returns the codec registry.
    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Returns the codec registry for registering more codecs.
    pub fn registry_mut(&mut self) -> &mut CodecRegistry {
        &mut self.registry
    }

    /// Reads and parses a file into plain nested data.
    ///
    /// # Errors
    ///
    /// * `UnsupportedFormat` if no codec handles the file extension
    /// * `SourceError` if the file is missing, unreadable or larger than
    ///   [`MAX_FILE_SIZE`]
    /// * `ParseError` if the content is not valid for the format
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<ConfigData> {
        let path = path.as_ref();
        let codec = self.registry.for_path(path)?;
        let content = Self::read_source(path)?;
        tracing::debug!(
            file = file_label(path),
            codec = codec.name(),
            bytes = content.len(),
            "Parsing configuration file"
        );
        codec.parse(&content)
    }

    /// Reads a file into a tree with the given mutability.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::read_file`]. Fails with `InvalidInput` if the
    /// document is a bare scalar rather than a mapping.
    pub fn load_file(&self, path: impl AsRef<Path>, allow_modification: bool) -> Result<ConfigTree> {
        ConfigTree::from_data(self.read_file(path)?, allow_modification)
    }

    /// Reads several files and merges them in order; later files win.
    ///
    /// An empty list yields an empty tree.
    pub fn load_files<I, P>(&self, paths: I, allow_modification: bool) -> Result<ConfigTree>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut merged = ConfigTree::new(true);
        for path in paths {
            let next = self.load_file(path, true)?;
            merged.merge(&next)?;
        }
        if !allow_modification {
            merged.set_read_only();
        }
        Ok(merged)
    }

    /// Loads `filename` from the per-user configuration directory of an
    /// application, as reported by the operating system.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if no home directory can be determined, plus
    /// everything [`ConfigLoader::load_file`] can return.
    pub fn load_default_location(
        &self,
        app_name: &str,
        qualifier: &str,
        filename: &str,
        allow_modification: bool,
    ) -> Result<ConfigTree> {
        let path = Self::default_location(app_name, qualifier, filename)?;
        self.load_file(path, allow_modification)
    }

    /// Returns the path [`ConfigLoader::load_default_location`] reads from.
    pub fn default_location(app_name: &str, qualifier: &str, filename: &str) -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            source_error("Failed to determine project directories".to_string(), None)
        })?;
        Ok(proj_dirs.config_dir().join(filename))
    }

    /// Renders a tree in the format registered for `extension`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for unknown extensions and the codec's
    /// error if the tree cannot be written in that format.
    pub fn to_string(&self, tree: &ConfigTree, extension: &str) -> Result<String> {
        let codec = self.registry.for_extension(extension)?;
        codec.serialize(&tree.to_mapping())
    }

    /// Writes a tree to `path` in the format implied by its extension.
    pub fn write_file(&self, path: impl AsRef<Path>, tree: &ConfigTree) -> Result<()> {
        let path = path.as_ref();
        let codec = self.registry.for_path(path)?;
        let content = codec.serialize(&tree.to_mapping())?;
        tracing::debug!(file = file_label(path), codec = codec.name(), "Writing configuration file");
        fs::write(path, content).map_err(|e| {
            source_error(
                format!("Failed to write configuration file: {}", file_label(path)),
                Some(e),
            )
        })
    }

    fn read_source(path: &Path) -> Result<String> {
        let canonical_path = path.canonicalize().map_err(|e| {
            source_error(
                format!("Invalid or inaccessible path: {}", file_label(path)),
                Some(e),
            )
        })?;

        let metadata = fs::metadata(&canonical_path).map_err(|e| {
            source_error(
                format!("Failed to read file metadata: {}", file_label(&canonical_path)),
                Some(e),
            )
        })?;

        if metadata.len() > MAX_FILE_SIZE {
            return Err(source_error(
                format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_FILE_SIZE
                ),
                None,
            ));
        }

        fs::read_to_string(&canonical_path).map_err(|e| {
            source_error(
                format!("Failed to read configuration file: {}", file_label(&canonical_path)),
                Some(e),
            )
        })
    }
}
