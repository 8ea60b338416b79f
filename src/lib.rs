// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nested, mergeable configuration trees.
//!
//! This crate provides an ordered, hierarchical configuration container that
//! is read-only unless modification is allowed at construction, can be merged
//! with another tree using list-append and recursive-override rules, and can
//! have its values rewritten by a pipeline of processors.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and logic (`ConfigTree`, `ConfigValue`, merge, errors)
//! - **Ports**: Trait definitions that define interfaces (`ConfigCodec`, `Processor`)
//! - **Adapters**: Codecs for specific formats and the built-in processors
//! - **Service**: Codec lookup by extension and file loading
//!
//! # Features
//!
//! - **Ordered Trees**: Keys keep insertion order, integer and string keys mix freely
//! - **Read-Only Gate**: Mutation fails unless the tree was built mutable; freezing is one-way
//! - **Merge**: Integer keys append, named sub-trees merge recursively, everything else is replaced
//! - **Processors**: Token, constant, filter and translation stages, chained by priority
//! - **Codecs**: YAML, JSON and Java properties readers and writers
//!
//! # Feature Flags
//!
//! - `yaml`: Enable the YAML codec (default)
//! - `json`: Enable the JSON codec (default)
//! - `properties`: Enable the Java properties codec (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use nestcfg::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<()> {
//! let mut config = ConfigTree::from_json(json!({
//!     "db": {"host": "localhost", "port": 5432},
//!     "plugins": ["auth"]
//! }), true)?;
//!
//! let local = ConfigTree::from_json(json!({
//!     "db": {"host": "##DB_HOST##"},
//!     "plugins": ["cache"]
//! }), false)?;
//!
//! config.merge(&local)?;
//! TokenProcessor::with_tokens([("DB_HOST", "db.internal")])
//!     .with_prefix("##")
//!     .with_suffix("##")
//!     .process(&mut config)?;
//! config.set_read_only();
//!
//! assert_eq!(config.get_path("db.host"), Some(&ConfigValue::from("db.internal")));
//! assert_eq!(config.get_path("plugins.1"), Some(&ConfigValue::from("cache")));
//! assert!(config.set("db", "other").unwrap_err().is_read_only());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        merge, ConfigData, ConfigError, ConfigKey, ConfigTree, ConfigValue, Cursor, OpaqueValue,
        Result,
    };
    pub use crate::ports::{ConfigCodec, Processor};

    pub use crate::adapters::{
        ConstantProcessor, ConstantRegistry, FilterProcessor, MessageCatalog, ProcessorQueue,
        TokenProcessor, Translator, TranslatorProcessor, ValueFilter,
    };
    pub use crate::service::{CodecRegistry, ConfigLoader};

    // Re-export codecs based on feature flags
    #[cfg(feature = "properties")]
    pub use crate::adapters::JavaPropertiesCodec;
    #[cfg(feature = "json")]
    pub use crate::adapters::JsonCodec;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlCodec;
}
