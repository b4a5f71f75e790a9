//! Standard library compatibility layer
//!
//! Provides a `BinaryHeap`-shaped soft heap where the key *is* the element.
//!
//! # Differences from BinaryHeap
//!
//! - **Orientation**: min-first by default; use [`MaxOrder`](crate::order::MaxOrder)
//!   for `BinaryHeap`'s max-first behavior.
//! - **Approximation**: `pop` may return an element out of order if it was
//!   corrupted, see [`SoftHeap`].
//!
//! # Example
//!
//! ```rust
//! use rust_soft_heap::stdlib_compat::StdSoftHeap;
//!
//! let mut heap: StdSoftHeap<i32> = StdSoftHeap::new();
//! heap.push(5);
//! heap.push(3);
//! heap.push(7);
//! assert_eq!(heap.peek(), Some(&3));
//! assert_eq!(heap.pop(), Some(3));
//! ```

use crate::config::SoftHeapConfig;
use crate::order::{KeyOrder, MinOrder};
use crate::soft_heap::SoftHeap;
use crate::traits::Heap;

/// A soft heap of bare keys
///
/// # Type Parameters
/// - `K`: The element type, ordered by `O`
/// - `O`: The orientation, [`MinOrder`] by default
#[derive(Debug)]
pub struct StdSoftHeap<K, O = MinOrder> {
    heap: SoftHeap<(), K, O>,
}

impl<K: Clone, O: KeyOrder<K> + Default> StdSoftHeap<K, O> {
    /// Creates a new empty heap with the default configuration
    pub fn new() -> Self {
        Self {
            heap: SoftHeap::new(),
        }
    }

    pub fn with_config(config: SoftHeapConfig) -> Self {
        Self {
            heap: SoftHeap::with_config(config),
        }
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Pushes an element onto the heap
    pub fn push(&mut self, key: K) {
        self.heap.insert(key, ())
    }

    /// Returns the element the next `pop` will remove
    pub fn peek(&self) -> Option<&K> {
        Heap::peek(&self.heap).map(|(key, _)| key)
    }

    /// Removes and returns the element at the top
    pub fn pop(&mut self) -> Option<K> {
        self.heap.delete_top().map(|extracted| extracted.priority)
    }

    /// Moves every element of `other` into this heap
    pub fn merge(&mut self, other: Self) {
        self.heap.meld(other.heap)
    }

    /// Borrows the underlying soft heap, e.g. for [`stats`](SoftHeap::stats)
    pub fn as_soft_heap(&self) -> &SoftHeap<(), K, O> {
        &self.heap
    }
}

impl<K: Clone, O: KeyOrder<K> + Default> Default for StdSoftHeap<K, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, O: KeyOrder<K> + Default> Extend<K> for StdSoftHeap<K, O> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.push(key);
        }
    }
}

impl<K: Clone, O: KeyOrder<K> + Default> FromIterator<K> for StdSoftHeap<K, O> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}
