//! Append-and-claim staging buffer for evicted entries.
//!
//! Evictions append at the tail; drain workers claim the whole unclaimed
//! range `[head, tail)` in one step by moving the entries out and advancing
//! `head`. Consumed slots linger as vacant storage until `reclaim()`
//! compacts the prefix and rebases both cursors.
//!
//! ```text
//!   slots: [ -- | -- | e2 | e3 | e4 ]
//!                       ^              ^
//!                     head           tail
//!   claim() => [e2, e3, e4], head = tail
//! ```
//!
//! The split between claiming and compaction lets several workers be
//! mid-drain at once: each owns the entries it claimed, appends that land
//! during a drain stay untouched for the next claim, and the last worker
//! to leave compacts on behalf of everyone.
//!
//! `debug_validate_invariants()` is available in debug/test builds.

#[derive(Debug)]
/// FIFO staging buffer with claim-by-snapshot semantics.
pub struct PurgeQueue<T> {
    slots: Vec<Option<T>>,
    head: usize,
    tail: usize,
}

impl<T> PurgeQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: 0,
            tail: 0,
        }
    }

    /// Number of unclaimed entries (`tail - head`).
    #[inline]
    pub fn len(&self) -> usize {
        self.tail - self.head
    }

    /// Returns `true` if no entries are awaiting a claim.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Cursor of the first unclaimed slot.
    #[inline]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Cursor one past the last appended slot.
    #[inline]
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Appends an entry at the tail.
    pub fn append(&mut self, entry: T) {
        self.slots.push(Some(entry));
        self.tail += 1;
    }

    /// Claims every unclaimed entry, advancing `head` to the current tail.
    ///
    /// Entries are returned in append order. The vacated slots stay in the
    /// buffer until [`reclaim`](Self::reclaim).
    pub fn claim(&mut self) -> Vec<T> {
        let batch: Vec<T> = self.slots[self.head..self.tail]
            .iter_mut()
            .filter_map(Option::take)
            .collect();
        self.head = self.tail;
        batch
    }

    /// Compacts the consumed prefix `[0, head)` and rebases the cursors.
    ///
    /// Returns the number of slots reclaimed.
    pub fn reclaim(&mut self) -> usize {
        let consumed = self.head;
        self.slots.drain(..consumed);
        self.head -= consumed;
        self.tail -= consumed;
        consumed
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.head <= self.tail);
        assert_eq!(self.tail, self.slots.len());
        for (idx, slot) in self.slots.iter().enumerate() {
            if idx < self.head {
                assert!(slot.is_none(), "consumed slot {idx} still holds an entry");
            } else {
                assert!(slot.is_some(), "unclaimed slot {idx} is vacant");
            }
        }
    }
}

impl<T> Default for PurgeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
