// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing codec and processor implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer. Codecs implement `ConfigCodec` for one document format each
//! and are enabled by cargo features; processors implement `Processor`.

#[cfg(feature = "properties")]
pub mod java_properties;
#[cfg(feature = "json")]
pub mod json;
#[cfg(feature = "yaml")]
pub mod yaml;

pub mod processors;

// Re-export adapters based on feature flags
#[cfg(feature = "properties")]
pub use java_properties::JavaPropertiesCodec;
#[cfg(feature = "json")]
pub use json::JsonCodec;
#[cfg(feature = "yaml")]
pub use yaml::YamlCodec;

pub use processors::{
    ConstantProcessor, ConstantRegistry, FilterProcessor, MessageCatalog, ProcessorQueue,
    TokenProcessor, Translator, TranslatorProcessor, ValueFilter,
};
