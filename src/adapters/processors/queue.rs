// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered processor pipeline.

use crate::domain::{ConfigTree, ConfigValue, Result};
use crate::ports::processor::process_atomically;
use crate::ports::Processor;
use std::cmp::Reverse;
use std::fmt;
use std::sync::Arc;

/// Priority given to processors inserted without one.
pub const DEFAULT_PRIORITY: i32 = 1;

/// Runs a sequence of processors over a tree.
///
/// Higher priorities run first; processors with equal priority run in
/// insertion order. A queue is itself a [`Processor`], so queues nest.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use nestcfg::adapters::{FilterProcessor, ProcessorQueue, TokenProcessor};
/// use nestcfg::domain::{ConfigTree, ConfigValue};
/// use nestcfg::ports::Processor;
///
/// let mut queue = ProcessorQueue::new();
/// queue.insert(Arc::new(TokenProcessor::with_tokens([("NAME", "world")])));
/// queue.insert_with_priority(Arc::new(FilterProcessor::for_strings(|s| s.to_uppercase())), 0);
///
/// let mut tree = ConfigTree::from_pairs([("greeting", "hello NAME")], true);
/// queue.process(&mut tree).unwrap();
/// assert_eq!(tree.get("greeting"), Some(&ConfigValue::from("HELLO WORLD")));
/// ```
#[derive(Clone, Default)]
pub struct ProcessorQueue {
    entries: Vec<(i32, Arc<dyn Processor>)>,
}

impl ProcessorQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a processor with [`DEFAULT_PRIORITY`].
    pub fn insert(&mut self, processor: Arc<dyn Processor>) {
        self.insert_with_priority(processor, DEFAULT_PRIORITY);
    }

    /// Adds a processor with an explicit priority.
    pub fn insert_with_priority(&mut self, processor: Arc<dyn Processor>, priority: i32) {
        self.entries.push((priority, processor));
        // Stable sort keeps insertion order among equal priorities.
        self.entries.sort_by_key(|(priority, _)| Reverse(*priority));
    }

    /// Returns `true` if this exact processor instance is queued.
    pub fn contains(&self, processor: &Arc<dyn Processor>) -> bool {
        let target = Arc::as_ptr(processor) as *const ();
        self.entries
            .iter()
            .any(|(_, queued)| Arc::as_ptr(queued) as *const () == target)
    }

    /// Returns the number of queued processors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over processors in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Processor>> {
        self.entries.iter().map(|(_, processor)| processor)
    }
}

impl fmt::Debug for ProcessorQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let priorities: Vec<i32> = self.entries.iter().map(|(p, _)| *p).collect();
        f.debug_struct("ProcessorQueue")
            .field("priorities", &priorities)
            .finish()
    }
}

impl Processor for ProcessorQueue {
    /// Feeds the value through every processor in order.
    fn process_value(&self, value: ConfigValue) -> Result<ConfigValue> {
        self.entries
            .iter()
            .try_fold(value, |value, (_, processor)| processor.process_value(value))
    }

    /// Runs each processor over the whole tree in order.
    ///
    /// If any processor fails, none of the changes are kept.
    fn process(&self, tree: &mut ConfigTree) -> Result<()> {
        tracing::debug!(processors = self.entries.len(), "Running processor queue");
        process_atomically(tree, |work| {
            for (priority, processor) in &self.entries {
                tracing::trace!(priority = *priority, "Running queued processor");
                processor.process(work)?;
            }
            Ok(())
        })
    }
}
