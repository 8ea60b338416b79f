// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! between the configuration tree and its collaborators: codecs that read and
//! write documents, and processors that rewrite values. These traits are
//! implemented by adapters in the adapters layer.

pub mod codec;
pub mod processor;

// Re-export commonly used types
pub use codec::ConfigCodec;
pub use processor::{process_atomically, walk_tree, KeyRewrite, Processor};
