//! Common traits and errors for soft heaps
//!
//! [`Heap`] is the simple, `BinaryHeap`-shaped interface that
//! [`SoftHeap`](crate::soft_heap::SoftHeap) implements. Soft heaps are
//! *approximate*: `pop` returns an item held by the best root, and a corrupted
//! item can come out after items whose keys are worse than its own. The per-item corruption status is available from the inherent
//! `delete_top` family on [`SoftHeap`](crate::soft_heap::SoftHeap).

use std::fmt;

/// Error type for soft heap construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The error rate must lie in `(0, 1]`
    EpsilonOutOfRange(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EpsilonOutOfRange(epsilon) => {
                write!(f, "epsilon must lie in (0, 1], got {}", epsilon)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Base trait for heap/priority queue data structures
///
/// This trait provides a simple API similar to Rust's `BinaryHeap`:
/// - `push` inserts an element
/// - `pop` removes and returns the element at the top
/// - `peek` returns the element at the top without removing it
///
/// Unlike `BinaryHeap` which stores values directly (using `Ord`), these heaps
/// store (priority, item) pairs to separate the ordering key from the data.
///
/// # Example
///
/// ```rust
/// use rust_soft_heap::Heap;
/// use rust_soft_heap::soft_heap::MinSoftHeap;
///
/// let mut heap: MinSoftHeap<&str, i32> = MinSoftHeap::new();
/// heap.push(3, "three");
/// heap.push(1, "one");
/// heap.push(2, "two");
///
/// assert_eq!(heap.peek(), Some((&1, &"one")));
/// assert_eq!(heap.pop(), Some((1, "one")));
/// ```
pub trait Heap<T, P> {
    /// Creates a new empty heap with the default configuration
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of items in the heap
    fn len(&self) -> usize;

    /// Inserts an item with the given priority
    ///
    /// # Time Complexity
    /// O(1) amortized for soft heaps.
    fn push(&mut self, priority: P, item: T);

    /// Returns the item that the next `pop` will remove, with its own priority
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<(&P, &T)>;

    /// Removes and returns the item at the top of the heap
    ///
    /// # Time Complexity
    /// O(log 1/ε) amortized for soft heaps.
    fn pop(&mut self) -> Option<(P, T)>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}
