// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! This module defines the error types that can occur when building, mutating,
//! merging, processing, reading or writing configuration trees. All errors use
//! `thiserror` for proper error handling and conversion.

use thiserror::Error;

/// The main error type for configuration operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use nestcfg::domain::errors::ConfigError;
///
/// fn freeze_then_write() -> Result<(), ConfigError> {
///     Err(ConfigError::ReadOnly {
///         operation: "set key 'database'".to_string(),
///     })
/// }
///
/// assert!(freeze_then_write().unwrap_err().is_read_only());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A mutating operation was attempted on a read-only tree.
    #[error("Config is read only; cannot {operation}")]
    ReadOnly {
        /// The operation that was refused
        operation: String,
    },

    /// A value did not have the shape an operation required.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// The error message
        message: String,
    },

    /// A processor backend is not available in this runtime.
    #[error("Extension '{extension}' is unavailable: {message}")]
    ExtensionUnavailable {
        /// The name of the missing capability
        extension: String,
        /// The error message
        message: String,
    },

    /// Failed to parse a configuration document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to serialize a configuration tree.
    #[error("Failed to serialize configuration: {message}")]
    SerializeError {
        /// The error message
        message: String,
        /// The underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No codec is registered for the requested format.
    #[error("Unsupported configuration format: {extension}")]
    UnsupportedFormat {
        /// The file extension or format name that was requested
        extension: String,
    },

    /// An error occurred while reading or writing a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ConfigError {
    /// Creates a `ReadOnly` error for the named operation.
    pub fn read_only(operation: impl Into<String>) -> Self {
        ConfigError::ReadOnly {
            operation: operation.into(),
        }
    }

    /// Creates an `InvalidInput` error with the given message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ConfigError::InvalidInput {
            message: message.into(),
        }
    }

    /// Returns `true` if this error reports a read-only violation.
    pub fn is_read_only(&self) -> bool {
        matches!(self, ConfigError::ReadOnly { .. })
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
