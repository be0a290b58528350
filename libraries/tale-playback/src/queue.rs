//! Linear playback queue
//!
//! Insertion order is playback order. The queue keeps the position of the
//! current item and repairs it whenever entries are removed.
//!
//! ```text
//!   0: Story A
//!   1: Story B   <- index (current item)
//!   2: Story C
//! ```

use crate::types::QueueItem;

/// Where a removed entry sat relative to the current item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Before the current item; the index moved back by one
    BeforeCurrent,

    /// The current item itself
    Current,

    /// After the current item (or nothing was current)
    AfterCurrent,
}

/// Ordered items plus the current position
#[derive(Debug, Clone, Default)]
pub struct Queue {
    items: Vec<QueueItem>,
    index: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item unless one with the same id is already queued
    ///
    /// Returns the position of the new entry, or `None` for a duplicate.
    pub fn push(&mut self, item: QueueItem) -> Option<usize> {
        if self.contains(&item.id) {
            return None;
        }

        self.items.push(item);
        Some(self.items.len() - 1)
    }

    /// Remove the entry with the given id
    ///
    /// When the current item is removed, the entry that slides into its
    /// position becomes current; if there is none the queue has no current
    /// item afterwards.
    pub fn remove(&mut self, id: &str) -> Option<(QueueItem, Removal)> {
        let position = self.position_of(id)?;
        let item = self.items.remove(position);

        let removal = match self.index {
            Some(current) if position < current => {
                self.index = Some(current - 1);
                Removal::BeforeCurrent
            }
            Some(current) if position == current => {
                self.index = (position < self.items.len()).then_some(position);
                Removal::Current
            }
            _ => Removal::AfterCurrent,
        };

        Some((item, removal))
    }

    /// Clear entire queue
    pub fn clear(&mut self) {
        self.items.clear();
        self.index = None;
    }

    /// Make the entry at `index` current
    ///
    /// Out-of-range indices leave the queue untouched.
    pub fn select(&mut self, index: usize) -> Option<&QueueItem> {
        if index >= self.items.len() {
            return None;
        }

        self.index = Some(index);
        self.items.get(index)
    }

    /// Position after the current one, if any
    pub fn next_index(&self) -> Option<usize> {
        let next = self.index? + 1;
        (next < self.items.len()).then_some(next)
    }

    /// Position before the current one, if any
    pub fn previous_index(&self) -> Option<usize> {
        self.index?.checked_sub(1)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position_of(id).is_some()
    }

    pub fn current(&self) -> Option<&QueueItem> {
        self.index.and_then(|i| self.items.get(i))
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn get(&self, index: usize) -> Option<&QueueItem> {
        self.items.get(index)
    }

    /// All items in playback order
    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
