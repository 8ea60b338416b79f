// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filter processor.

use crate::domain::{ConfigValue, Result};
use crate::ports::Processor;
use std::fmt;
use std::sync::Arc;

/// A value-to-value transformation applied by a [`FilterProcessor`].
///
/// Implemented for every `Fn(ConfigValue) -> Result<ConfigValue>` closure
/// that is `Send + Sync`.
pub trait ValueFilter: Send + Sync {
    /// Transforms one value.
    fn filter(&self, value: ConfigValue) -> Result<ConfigValue>;
}

impl<F> ValueFilter for F
where
    F: Fn(ConfigValue) -> Result<ConfigValue> + Send + Sync,
{
    fn filter(&self, value: ConfigValue) -> Result<ConfigValue> {
        self(value)
    }
}

/// Applies a [`ValueFilter`] to every leaf of a tree.
///
/// # Examples
///
/// ```rust
/// use nestcfg::adapters::FilterProcessor;
/// use nestcfg::domain::{ConfigTree, ConfigValue};
/// use nestcfg::ports::Processor;
///
/// let mut tree = ConfigTree::from_pairs([("name", "Some Value")], true);
/// FilterProcessor::for_strings(|s| s.to_lowercase()).process(&mut tree).unwrap();
/// assert_eq!(tree.get("name"), Some(&ConfigValue::from("some value")));
/// ```
#[derive(Clone)]
pub struct FilterProcessor {
    filter: Arc<dyn ValueFilter>,
}

impl FilterProcessor {
    /// Creates a processor applying `filter` to every leaf.
    pub fn new(filter: impl ValueFilter + 'static) -> Self {
        Self {
            filter: Arc::new(filter),
        }
    }

    /// Creates a processor that rewrites string leaves and leaves others alone.
    pub fn for_strings<F>(rewrite: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::new(move |value: ConfigValue| -> Result<ConfigValue> {
            Ok(match value {
                ConfigValue::String(s) => ConfigValue::String(rewrite(&s)),
                other => other,
            })
        })
    }

    /// Returns the wrapped filter.
    pub fn filter(&self) -> &dyn ValueFilter {
        self.filter.as_ref()
    }

    /// Replaces the wrapped filter.
    pub fn set_filter(&mut self, filter: impl ValueFilter + 'static) {
        self.filter = Arc::new(filter);
    }
}

impl fmt::Debug for FilterProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterProcessor").finish_non_exhaustive()
    }
}

impl Processor for FilterProcessor {
    fn process_value(&self, value: ConfigValue) -> Result<ConfigValue> {
        self.filter.filter(value)
    }
}
