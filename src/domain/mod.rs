// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the configuration tree, its keys and values, the merge
//! algorithm and the error types. It is independent of any file format and
//! defines the fundamental concepts used throughout the library.

pub mod config_key;
pub mod config_tree;
pub mod config_value;
pub mod errors;
pub mod merge;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_tree::{ConfigTree, Cursor};
pub use config_value::{ConfigData, ConfigValue, OpaqueValue};
pub use errors::{ConfigError, Result};
pub use merge::merge;
