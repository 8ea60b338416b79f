// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer tying codecs to the file system.
//!
//! This module contains the codec registry, which resolves a codec from a file
//! extension, and the loader, which reads, merges and writes configuration
//! files through it.

pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use loader::{ConfigLoader, MAX_FILE_SIZE};
pub use registry::CodecRegistry;
