// SPDX-License-Identifier: MIT OR Apache-2.0

//! Processor implementations.
//!
//! This module contains implementations of the `Processor` trait that rewrite
//! the values of a configuration tree, plus a queue that chains them.

pub mod constant;
pub mod filter;
pub mod queue;
pub mod token;
pub mod translator;

pub use constant::{system_constants, ConstantProcessor, ConstantRegistry};
pub use filter::{FilterProcessor, ValueFilter};
pub use queue::{ProcessorQueue, DEFAULT_PRIORITY};
pub use token::TokenProcessor;
pub use translator::{MessageCatalog, Translator, TranslatorProcessor, DEFAULT_TEXT_DOMAIN};
