#![forbid(unsafe_code)]

//! FIFO queue of work scheduled for the next event-loop turn.

use std::collections::VecDeque;

/// First-in, first-out queue of deferred items.
///
/// Items scheduled while a batch is being drained belong to the next batch:
/// [`take_batch`](Self::take_batch) hands out only what was queued before
/// the call.
#[derive(Debug, Clone)]
pub struct DeferredQueue<T> {
    items: VecDeque<T>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DeferredQueue<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Queue an item behind everything already scheduled.
    pub fn schedule(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Remove every queued item, oldest first.
    pub fn take_batch(&mut self) -> VecDeque<T> {
        std::mem::take(&mut self.items)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
