//! Soft Heaps for Rust
//!
//! This crate provides a soft heap: an approximate, meldable priority queue
//! that lets a bounded fraction of items be *corrupted* (held under a key
//! worse than their own) in exchange for better amortized bounds than any
//! exact comparison-based heap.
//!
//! # Features
//!
//! - **Soft Heap**: O(1) amortized insert and meld; O(log 1/ε) amortized delete;
//!   at most `ε·n` corrupted items at any time
//! - **Orientations**: min-first ([`MinSoftHeap`]), max-first ([`MaxSoftHeap`]),
//!   or any comparator through [`order::KeyOrder`]
//! - **Observers**: structural notifications for visualizers and tracing
//!
//! # Example
//!
//! ```rust
//! use rust_soft_heap::{MinSoftHeap, SoftHeapConfig};
//!
//! let config = SoftHeapConfig::new(3.0 / 1024.0).unwrap();
//! let mut heap: MinSoftHeap<&str, i32> = MinSoftHeap::with_config(config);
//! heap.insert(5, "five");
//! heap.insert(1, "one");
//! heap.insert(3, "three");
//!
//! assert_eq!(heap.find_min().map(|(key, _)| *key), Some(1));
//! assert_eq!(heap.delete_min().map(|e| e.item), Some("one"));
//! ```

pub mod config;
pub mod observer;
pub mod order;
pub mod rank;
mod ring;
pub mod soft_heap;
pub mod stdlib_compat;
mod storage;
pub mod traits;

// Re-export the main types for convenience
pub use config::SoftHeapConfig;
pub use soft_heap::{MaxSoftHeap, MinSoftHeap, SoftHeap};
pub use traits::{ConfigError, Heap};
