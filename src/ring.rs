//! Item rings
//!
//! The items grouped under one vertex form a circular singly-linked list
//! threaded through the item arena. Members of a ring are interchangeable:
//! there is no order inside a ring and no search, only O(1) splicing and
//! O(1) removal of the successor of the entry point.

use crate::storage::{Item, ItemKey};
use slotmap::SlotMap;

/// Allocates a one-item ring that links to itself.
pub fn singleton<T, P>(
    items: &mut SlotMap<ItemKey, Item<T, P>>,
    priority: P,
    item: T,
) -> ItemKey {
    items.insert_with_key(|key| Item {
        priority,
        item,
        next: key,
    })
}

/// Splices two rings into one by exchanging the successors of their entry
/// points. `a` stays a valid entry point of the result.
pub fn merge<T, P>(items: &mut SlotMap<ItemKey, Item<T, P>>, a: ItemKey, b: ItemKey) {
    let a_next = items[a].next;
    let b_next = items[b].next;
    items[a].next = b_next;
    items[b].next = a_next;
}

/// Unlinks the successor of `head` and returns it.
///
/// Returns `None` if `head` is alone in its ring; the caller then owns the
/// last item through `head` itself.
pub fn pop_next<T, P>(items: &mut SlotMap<ItemKey, Item<T, P>>, head: ItemKey) -> Option<ItemKey> {
    let next = items[head].next;
    if next == head {
        return None;
    }
    items[head].next = items[next].next;
    Some(next)
}

/// Iterates over a ring, starting after `head` and ending with `head`,
/// which is the order `pop_next` would hand the items out.
pub fn iter<T, P>(items: &SlotMap<ItemKey, Item<T, P>>, head: ItemKey) -> Iter<'_, T, P> {
    Iter {
        items,
        head,
        cursor: Some(items[head].next),
    }
}

/// Number of items in a ring.
pub fn len<T, P>(items: &SlotMap<ItemKey, Item<T, P>>, head: ItemKey) -> usize {
    iter(items, head).count()
}

/// Iterator over the items of one ring.
pub struct Iter<'a, T, P> {
    items: &'a SlotMap<ItemKey, Item<T, P>>,
    head: ItemKey,
    cursor: Option<ItemKey>,
}

impl<'a, T, P> Iterator for Iter<'a, T, P> {
    type Item = &'a Item<T, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        let item = &self.items[current];
        self.cursor = if current == self.head {
            None
        } else {
            Some(item.next)
        };
        Some(item)
    }
}
