//! Expiry Index Module
//!
//! Array-backed binary min-heap ordered by deadline, paired with a key map
//! that records each entry's heap slot.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Expiry Index ==
/// Orders entries by deadline, earliest at the root.
///
/// `positions[key]` is always the slot in `heap` holding that key's entry.
/// The index has no notion of "now": it only orders by time, and callers
/// decide what counts as expired.
///
/// Entries with equal deadlines leave the heap in no particular order.
#[derive(Debug)]
pub struct ExpiryIndex<V> {
    /// Heap array, `heap[parent(i)].expires_at <= heap[i].expires_at`
    heap: Vec<CacheEntry<V>>,
    /// Key to heap slot
    positions: HashMap<String, usize>,
}

impl<V> Default for ExpiryIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ExpiryIndex<V> {
    // == Constructor ==
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            positions: HashMap::new(),
        }
    }

    // == Upsert ==
    /// Inserts `key`, or overwrites its value and deadline in place.
    ///
    /// The deadline may move either way, so an existing entry is re-fixed
    /// in both directions. Returns the previous value if the key was present.
    pub fn upsert(&mut self, key: String, value: V, expires_at: Instant) -> Option<V> {
        if let Some(pos) = self.positions.get(&key).copied() {
            let entry = &mut self.heap[pos];
            let previous = std::mem::replace(&mut entry.value, value);
            entry.expires_at = expires_at;
            self.fix(pos);
            return Some(previous);
        }

        self.push(key, value, expires_at);
        None
    }

    // == Peek Min ==
    /// Returns the entry with the earliest deadline without removing it.
    pub fn peek_min(&self) -> Option<&CacheEntry<V>> {
        self.heap.first()
    }

    // == Pop Min ==
    /// Removes and returns the entry with the earliest deadline.
    pub fn pop_min(&mut self) -> Option<CacheEntry<V>> {
        if self.heap.is_empty() {
            return None;
        }
        Some(self.remove_at(0))
    }

    // == Lookup ==
    /// Returns the entry stored under `key`, expired or not.
    pub fn lookup(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.positions.get(key).map(|&pos| &self.heap[pos])
    }

    // == Remove ==
    /// Removes the entry stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let pos = self.positions.get(key).copied()?;
        Some(self.remove_at(pos))
    }

    // == Sweep Expired ==
    /// Pops every entry whose deadline is at or before `now`.
    ///
    /// Stops at the first live minimum. Returns the number of entries removed.
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        while self
            .peek_min()
            .is_some_and(|entry| entry.is_expired_at(now))
        {
            if self.pop_min().is_none() {
                break;
            }
            removed += 1;
        }
        removed
    }

    // == Length ==
    /// Returns the number of indexed entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    // == Validate ==
    /// Checks the heap order, key uniqueness and slot bookkeeping.
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.heap.len() != self.positions.len() {
            return Err(CacheError::IndexCorrupted(format!(
                "heap holds {} entries but key map holds {}",
                self.heap.len(),
                self.positions.len()
            )));
        }

        for (pos, entry) in self.heap.iter().enumerate() {
            if pos > 0 {
                let parent = (pos - 1) / 2;
                if self.heap[parent].expires_at > entry.expires_at {
                    return Err(CacheError::IndexCorrupted(format!(
                        "slot {} expires before its parent slot {}",
                        pos, parent
                    )));
                }
            }

            match self.positions.get(&entry.key) {
                Some(&slot) if slot == pos => {}
                Some(&slot) => {
                    return Err(CacheError::IndexCorrupted(format!(
                        "key '{}' sits in slot {} but is recorded at slot {}",
                        entry.key, pos, slot
                    )));
                }
                None => {
                    return Err(CacheError::IndexCorrupted(format!(
                        "key '{}' in slot {} is missing from the key map",
                        entry.key, pos
                    )));
                }
            }
        }

        Ok(())
    }

    // == Internal Heap Operations ==

    /// Appends a new entry and sifts it up. `key` must not be present.
    fn push(&mut self, key: String, value: V, expires_at: Instant) {
        debug_assert!(!self.positions.contains_key(&key));

        let pos = self.heap.len();
        self.positions.insert(key.clone(), pos);
        self.heap.push(CacheEntry::new(key, value, expires_at));
        self.sift_up(pos);
    }

    /// Moves the last entry into `pos`, drops the old occupant and re-fixes.
    fn remove_at(&mut self, pos: usize) -> CacheEntry<V> {
        let entry = self.heap.swap_remove(pos);
        self.positions.remove(&entry.key);

        if pos < self.heap.len() {
            self.record_position(pos);
            self.fix(pos);
        }

        entry
    }

    /// Restores heap order around `pos` after its deadline changed.
    fn fix(&mut self, pos: usize) {
        if self.sift_up(pos) == pos {
            self.sift_down(pos);
        }
    }

    /// Returns the slot the entry ended up in.
    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.heap[parent].expires_at <= self.heap[pos].expires_at {
                break;
            }
            self.swap(parent, pos);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }

            let right = left + 1;
            let mut smallest = left;
            if right < len && self.heap[right].expires_at < self.heap[left].expires_at {
                smallest = right;
            }

            if self.heap[pos].expires_at <= self.heap[smallest].expires_at {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.record_position(a);
        self.record_position(b);
    }

    fn record_position(&mut self, pos: usize) {
        if let Some(slot) = self.positions.get_mut(&self.heap[pos].key) {
            *slot = pos;
        }
    }
}
