//! Completion-tick construction queues.
//!
//! Buildings, defenses and ships all wait in a [`ConstructionQueue`] until
//! their completion tick arrives. Items are not processed head-first: every
//! item whose tick has arrived completes, regardless of position.

use serde::{Deserialize, Serialize};

use crate::clock::Tick;

/// An item waiting for its completion tick.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueueItem<T> {
    /// The pending item.
    pub item: T,
    /// Tick at which the item completes.
    pub completion_tick: Tick,
}

impl<T> QueueItem<T> {
    /// Check whether the item is due at `tick`.
    #[must_use]
    pub const fn is_due(&self, tick: Tick) -> bool {
        tick >= self.completion_tick
    }

    /// Ticks left until completion (0 when already due).
    #[must_use]
    pub const fn time_remaining(&self, now: Tick) -> Tick {
        self.completion_tick.saturating_sub(now)
    }
}

/// Ordered list of pending items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructionQueue<T> {
    items: Vec<QueueItem<T>>,
}

impl<T> ConstructionQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item that completes at `completion_tick`.
    pub fn enqueue(&mut self, item: T, completion_tick: Tick) {
        self.items.push(QueueItem {
            item,
            completion_tick,
        });
    }

    /// Remove and return every item due at `tick`.
    ///
    /// Completed items come back in insertion order; remaining items keep
    /// their relative order. A second call with the same tick returns
    /// nothing.
    pub fn drain_completed(&mut self, tick: Tick) -> Vec<T> {
        if !self.items.iter().any(|entry| entry.is_due(tick)) {
            return Vec::new();
        }

        let (done, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|entry| entry.is_due(tick));
        self.items = pending;

        done.into_iter().map(|entry| entry.item).collect()
    }

    /// Check whether any pending item matches `pred`.
    pub fn contains(&self, mut pred: impl FnMut(&T) -> bool) -> bool {
        self.items.iter().any(|entry| pred(&entry.item))
    }

    /// Count pending items matching `pred`.
    pub fn count(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.items.iter().filter(|entry| pred(&entry.item)).count()
    }

    /// Completion tick of the first pending item matching `pred`.
    pub fn completion_of(&self, mut pred: impl FnMut(&T) -> bool) -> Option<Tick> {
        self.items
            .iter()
            .find(|entry| pred(&entry.item))
            .map(|entry| entry.completion_tick)
    }

    /// Ticks until the first item matching `pred` completes.
    pub fn time_remaining(&self, pred: impl FnMut(&T) -> bool, now: Tick) -> Option<Tick> {
        self.completion_of(pred)
            .map(|completion| completion.saturating_sub(now))
    }

    /// Number of pending items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over pending items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &QueueItem<T>> {
        self.items.iter()
    }
}

impl<T> Default for ConstructionQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
