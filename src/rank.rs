//! Rank type and utilities for soft heap vertices.
//!
//! # Why u8?
//!
//! A vertex of rank `r` is the result of `r` successive links, so it was built
//! from `2^r` insertions. The largest rank in a heap of `n` items is therefore
//! bounded by `log₂(n)`, and `u8` is more than enough for anything that fits
//! in memory.
//!
//! The top value of the range is reserved: [`SENTINEL_RANK`] is the rank of
//! the `nil` sentinel and compares greater than every real rank, which is what
//! the root-list operations rely on when they reach the end of the list.

/// Type alias for vertex rank.
pub type Rank = u8;

/// Rank reported for the `nil` sentinel.
///
/// Acts as +∞: every real vertex has a strictly smaller rank.
pub const SENTINEL_RANK: Rank = u8::MAX;

/// Safely increment a rank value, panicking before it would collide with the
/// sentinel rank.
///
/// # Panics
///
/// Panics if `rank + 1 >= SENTINEL_RANK`. This would require a heap with more
/// than 2²⁵⁴ insertions.
///
/// # Example
///
/// ```rust
/// use rust_soft_heap::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    match rank.checked_add(1) {
        Some(next) if next < SENTINEL_RANK => next,
        _ => panic!(
            "rank overflow: rank {} cannot be linked further without reaching the sentinel rank",
            rank
        ),
    }
}

/// Returns true for even ranks. `defill` only corrupts at even ranks.
#[inline]
pub fn is_even(rank: Rank) -> bool {
    rank % 2 == 0
}
