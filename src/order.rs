//! Key orderings
//!
//! A soft heap is oriented by a three-way comparator. The algorithm only ever
//! asks whether one key *strictly precedes* another, so the same code serves
//! min-heaps ([`MinOrder`]), max-heaps ([`MaxOrder`]) and arbitrary orders
//! supplied as closures ([`FnOrder`]).

use std::cmp::Ordering;
use std::fmt;

/// A total order over heap keys.
///
/// `compare(a, b) == Ordering::Less` means `a` belongs closer to the top of
/// the heap than `b`.
pub trait KeyOrder<P> {
    /// Three-way comparison of two keys
    fn compare(&self, a: &P, b: &P) -> Ordering;

    /// Returns true if `a` strictly precedes `b`
    #[inline]
    fn precedes(&self, a: &P, b: &P) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Smallest key first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinOrder;

impl<P: Ord> KeyOrder<P> for MinOrder {
    #[inline]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        a.cmp(b)
    }
}

/// Largest key first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxOrder;

impl<P: Ord> KeyOrder<P> for MaxOrder {
    #[inline]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        b.cmp(a)
    }
}

/// Order given by a comparison closure.
///
/// Useful for keys that are not `Ord` themselves but admit a total order,
/// e.g. `f64` values known not to be NaN:
///
/// ```rust
/// use rust_soft_heap::order::{FnOrder, KeyOrder};
///
/// let order = FnOrder::new(|a: &f64, b: &f64| a.total_cmp(b));
/// assert!(order.precedes(&1.5, &2.5));
/// ```
#[derive(Clone, Copy)]
pub struct FnOrder<F> {
    cmp: F,
}

impl<F> FnOrder<F> {
    pub fn new(cmp: F) -> Self {
        Self { cmp }
    }
}

impl<F> fmt::Debug for FnOrder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOrder").finish_non_exhaustive()
    }
}

impl<P, F> KeyOrder<P> for FnOrder<F>
where
    F: Fn(&P, &P) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &P, b: &P) -> Ordering {
        (self.cmp)(a, b)
    }
}
