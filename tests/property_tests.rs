//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and verify that the
//! soft heap invariants are always maintained: nothing is lost, corruption
//! stays within its budget, and uncorrupted items come out in order.

use proptest::prelude::*;
use rust_soft_heap::order::MaxOrder;
use rust_soft_heap::{Heap, MinSoftHeap, SoftHeap, SoftHeapConfig};

/// With epsilon = 3/1024 no vertex below rank 11 is ever corrupted
const EXACT_EPSILON: f64 = 3.0 / 1024.0;

fn epsilons() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![1.0, 0.5, 0.25, 0.1, EXACT_EPSILON])
}

fn ops_strategy(len: usize) -> impl Strategy<Value = Vec<(bool, i32)>> {
    prop::collection::vec((prop::bool::ANY, -100i32..100), 0..len)
}

fn sorted(mut values: Vec<i32>) -> Vec<i32> {
    values.sort_unstable();
    values
}

/// In the exact regime the top is always the true minimum
fn test_push_pop_invariant<H: Heap<i32, i32>>(ops: Vec<(bool, i32)>) -> Result<(), TestCaseError> {
    let mut heap = H::new();
    let mut inserted = Vec::new();

    for (should_pop, value) in ops {
        if should_pop && !heap.is_empty() {
            if let Some((priority, item)) = heap.pop() {
                prop_assert_eq!(priority, item);
                let pos = inserted.iter().position(|&p| p == priority);
                prop_assert!(pos.is_some(), "popped {} was never inserted", priority);
                inserted.swap_remove(pos.unwrap());
            }
        } else {
            heap.push(value, value);
            inserted.push(value);
        }

        if let Some((min_priority, _)) = heap.peek() {
            prop_assert_eq!(Some(min_priority), inserted.iter().min());
        }
    }

    Ok(())
}

/// Test len() is always correct
fn test_len_invariant<H: Heap<i32, i32>>(ops: Vec<(bool, i32)>) -> Result<(), TestCaseError> {
    let mut heap = H::new();
    let mut expected_len = 0;

    for (should_pop, value) in ops {
        if should_pop && !heap.is_empty() {
            heap.pop();
            expected_len -= 1;
        } else {
            heap.push(value, value);
            expected_len += 1;
        }

        prop_assert_eq!(heap.len(), expected_len);
        prop_assert_eq!(heap.is_empty(), expected_len == 0);
    }

    Ok(())
}

/// Every inserted item comes out exactly once, whatever the corruption
fn test_count_preservation(epsilon: f64, ops: Vec<(bool, i32)>) -> Result<(), TestCaseError> {
    let mut heap: MinSoftHeap<i32, i32> = MinSoftHeap::with_epsilon(epsilon).unwrap();
    let mut inserted = Vec::new();
    let mut popped = Vec::new();

    for (should_pop, value) in ops {
        if should_pop {
            if let Some(extracted) = heap.delete_min() {
                prop_assert_eq!(extracted.priority, extracted.item);
                popped.push(extracted.priority);
            }
        } else {
            heap.insert(value, value);
            inserted.push(value);
        }
        heap.check_invariants();
        prop_assert_eq!(heap.len(), inserted.len() - popped.len());
    }

    while let Some(extracted) = heap.delete_min() {
        popped.push(extracted.priority);
    }
    prop_assert_eq!(sorted(popped), sorted(inserted));
    prop_assert_eq!(heap.stats().vertices, 0);

    Ok(())
}

/// At most epsilon times the insertion count is ever corrupted
fn test_corruption_budget(epsilon: f64, ops: Vec<(bool, i32)>) -> Result<(), TestCaseError> {
    let mut heap: MinSoftHeap<(), i32> = MinSoftHeap::with_epsilon(epsilon).unwrap();

    for (should_pop, value) in ops {
        if should_pop {
            heap.delete_min();
        } else {
            heap.insert(value, ());
        }
        let stats = heap.stats();
        prop_assert!(
            stats.corrupted_items as f64 <= epsilon * stats.insertions as f64,
            "{} corrupted items after {} insertions at epsilon {}",
            stats.corrupted_items,
            stats.insertions,
            epsilon
        );
        prop_assert_eq!(stats.items, heap.len());
    }

    Ok(())
}

/// Draining a heap, only corrupted extractions can go backwards
fn test_inversions_are_corrupted(epsilon: f64, values: Vec<i32>) -> Result<(), TestCaseError> {
    let mut heap: MinSoftHeap<(), i32> = MinSoftHeap::with_epsilon(epsilon).unwrap();
    for &value in &values {
        heap.insert(value, ());
    }

    let mut last = i32::MIN;
    let mut inversions = 0usize;
    let mut corrupted = 0usize;
    while let Some(extracted) = heap.delete_min() {
        if extracted.corrupted {
            corrupted += 1;
        } else {
            prop_assert!(
                extracted.priority >= last,
                "uncorrupted {} popped after {}",
                extracted.priority,
                last
            );
        }
        if extracted.priority < last {
            inversions += 1;
        }
        last = last.max(extracted.priority);
    }
    prop_assert!(inversions <= corrupted);
    prop_assert!(corrupted as f64 <= epsilon * values.len() as f64);

    Ok(())
}

/// Melding yields the union of both heaps
fn test_meld_union(epsilon: f64, left: Vec<i32>, right: Vec<i32>) -> Result<(), TestCaseError> {
    let config = SoftHeapConfig::new(epsilon).unwrap();
    let mut heap1: MinSoftHeap<(), i32> = MinSoftHeap::with_config(config);
    let mut heap2: MinSoftHeap<(), i32> = MinSoftHeap::with_config(config);
    for &value in &left {
        heap1.insert(value, ());
    }
    for &value in &right {
        heap2.insert(value, ());
    }

    heap1.meld(heap2);
    heap1.check_invariants();
    prop_assert_eq!(heap1.len(), left.len() + right.len());
    prop_assert_eq!(heap1.stats().insertions, left.len() + right.len());

    let drained: Vec<i32> = std::iter::from_fn(|| heap1.delete_min())
        .map(|extracted| extracted.priority)
        .collect();
    let mut expected = left;
    expected.extend(right);
    prop_assert_eq!(sorted(drained), sorted(expected));

    Ok(())
}

/// The max orientation mirrors the min orientation on negated keys
fn test_max_mirrors_min(epsilon: f64, values: Vec<i32>) -> Result<(), TestCaseError> {
    let config = SoftHeapConfig::new(epsilon).unwrap();
    let mut min_heap: MinSoftHeap<(), i32> = MinSoftHeap::with_config(config);
    let mut max_heap: SoftHeap<(), i32, MaxOrder> = SoftHeap::with_config(config);
    for &value in &values {
        min_heap.insert(value, ());
        max_heap.insert(-value, ());
    }
    prop_assert_eq!(min_heap.stats(), max_heap.stats());

    while let Some(min) = min_heap.delete_min() {
        let max = max_heap.delete_max();
        prop_assert!(max.is_some());
        let max = max.unwrap();
        prop_assert_eq!(min.priority, -max.priority);
        prop_assert_eq!(min.corrupted, max.corrupted);
    }
    prop_assert!(max_heap.is_empty());

    Ok(())
}

fn exact_heap() -> MinSoftHeap<i32, i32> {
    MinSoftHeap::with_config(SoftHeapConfig::new(EXACT_EPSILON).unwrap())
}

/// Wraps an exactly-ordered soft heap for the generic `Heap` properties
#[derive(Debug)]
struct ExactSoftHeap(MinSoftHeap<i32, i32>);

impl Heap<i32, i32> for ExactSoftHeap {
    fn new() -> Self {
        ExactSoftHeap(exact_heap())
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn push(&mut self, priority: i32, item: i32) {
        self.0.push(priority, item)
    }

    fn peek(&self) -> Option<(&i32, &i32)> {
        self.0.peek()
    }

    fn pop(&mut self) -> Option<(i32, i32)> {
        self.0.pop()
    }

    fn merge(&mut self, other: Self) {
        self.0.merge(other.0)
    }
}

proptest! {
    #[test]
    fn test_exact_push_pop_invariant(ops in ops_strategy(200)) {
        test_push_pop_invariant::<ExactSoftHeap>(ops)?;
    }

    #[test]
    fn test_exact_len_invariant(ops in ops_strategy(200)) {
        test_len_invariant::<ExactSoftHeap>(ops)?;
    }

    #[test]
    fn test_default_len_invariant(ops in ops_strategy(200)) {
        test_len_invariant::<MinSoftHeap<i32, i32>>(ops)?;
    }

    #[test]
    fn test_soft_count_preservation(epsilon in epsilons(), ops in ops_strategy(300)) {
        test_count_preservation(epsilon, ops)?;
    }

    #[test]
    fn test_soft_corruption_budget(epsilon in epsilons(), ops in ops_strategy(300)) {
        test_corruption_budget(epsilon, ops)?;
    }

    #[test]
    fn test_soft_inversions_are_corrupted(
        epsilon in epsilons(),
        values in prop::collection::vec(-1000i32..1000, 0..400)
    ) {
        test_inversions_are_corrupted(epsilon, values)?;
    }

    #[test]
    fn test_soft_meld_union(
        epsilon in epsilons(),
        left in prop::collection::vec(-100i32..100, 0..100),
        right in prop::collection::vec(-100i32..100, 0..100)
    ) {
        test_meld_union(epsilon, left, right)?;
    }

    #[test]
    fn test_soft_max_mirrors_min(
        epsilon in epsilons(),
        values in prop::collection::vec(-1000i32..1000, 0..200)
    ) {
        test_max_mirrors_min(epsilon, values)?;
    }
}
