//! Soft Heap implementation
//!
//! A soft heap is an approximate meldable priority queue. In exchange for
//! allowing a bounded fraction of items to be *corrupted* (to carry a key
//! worse than their own while inside the heap) it achieves:
//!
//! | Operation    | Complexity          |
//! |--------------|---------------------|
//! | `insert`     | O(1) amortized      |
//! | `meld`       | O(1) amortized      |
//! | `find_top`   | O(1) worst-case     |
//! | `delete_top` | O(log 1/ε) amortized|
//!
//! At any time at most `ε·n` items are corrupted, where `n` is the number of
//! insertions performed so far (including those into melded heaps).
//!
//! # Structure
//!
//! The heap is a list of roots of binary trees. Every vertex carries a rank,
//! a representative key and a ring of items whose keys are no worse than that
//! key. Trees are heap-ordered on representative keys. Rings only move
//! upwards: `fill` hands the better child's key and ring to its parent, and
//! `defill` runs `fill` a second time on even ranks above the threshold while
//! inserting, which lumps two rings under the worse key and is the only source
//! of corruption.
//!
//! The root list is kept so that:
//! - the first root carries the best representative key,
//! - of the first two roots, the lower-ranked one has a rank strictly below
//!   every other root, and removing it leaves a list with the same property.
//!
//! Ranks of roots are therefore pairwise distinct and the list behaves like a
//! binary counter: inserting a rank-`r` root next to another rank-`r` root
//! links them and carries a rank-`r+1` root forward.
//!
//! # Orientation
//!
//! The algorithm is generic over a [`KeyOrder`]; [`MinSoftHeap`] and
//! [`MaxSoftHeap`] are the two common instantiations.
//!
//! # References
//!
//! - Chazelle, B. (2000). "The soft heap: an approximate priority queue with
//!   optimal error rate." *Journal of the ACM*, 47(6), 1012-1027.
//! - Kaplan, H., Tarjan, R.E., Zwick, U. (2013). "Soft heaps simplified."
//!   *SIAM Journal on Computing*, 42(4), 1660-1673.

use crate::config::SoftHeapConfig;
use crate::observer::{StructureObserver, VertexId};
use crate::order::{KeyOrder, MaxOrder, MinOrder};
use crate::rank::{checked_increment, is_even, Rank};
use crate::ring;
use crate::storage::{nil, ItemKey, Storage, Vertex, VertexKey};
use crate::traits::{ConfigError, Heap};
use slotmap::Key;
use std::fmt;
use tracing::debug;

/// Soft heap with smallest keys on top.
pub type MinSoftHeap<T, P> = SoftHeap<T, P, MinOrder>;

/// Soft heap with largest keys on top.
pub type MaxSoftHeap<T, P> = SoftHeap<T, P, MaxOrder>;

/// An item removed from a soft heap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<T, P> {
    /// The key the item was inserted with
    pub priority: P,
    pub item: T,
    /// True if the item was held under a strictly worse key when removed
    pub corrupted: bool,
}

/// Read-only view of one root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootView<'a, P> {
    pub rank: Rank,
    pub key: Option<&'a P>,
    pub corrupted: bool,
    pub ring_len: usize,
}

/// Counters describing the current shape of a heap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftHeapStats {
    pub items: usize,
    pub roots: usize,
    pub vertices: usize,
    /// Vertices whose corruption flag is set
    pub corrupted_vertices: usize,
    /// Items whose key strictly precedes the key of the vertex holding them
    pub corrupted_items: usize,
    /// Insertions into this heap and every heap melded into it
    pub insertions: usize,
}

/// Iterator over the ring of the top vertex, yielding `(priority, item)` in
/// the order `delete_top` would remove them.
pub struct RingIter<'a, T, P> {
    inner: Option<ring::Iter<'a, T, P>>,
}

impl<'a, T, P> Iterator for RingIter<'a, T, P> {
    type Item = (&'a P, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .as_mut()?
            .next()
            .map(|entry| (&entry.priority, &entry.item))
    }
}

/// Soft heap over items `T` keyed by `P` and oriented by `O`.
pub struct SoftHeap<T, P, O = MinOrder> {
    storage: Storage<T, P>,
    root: VertexKey,
    len: usize,
    insertions: usize,
    config: SoftHeapConfig,
    order: O,
    observer: Option<Box<dyn StructureObserver>>,
}

impl<T, P, O> fmt::Debug for SoftHeap<T, P, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftHeap")
            .field("len", &self.len)
            .field("vertices", &self.storage.vertices.len())
            .field("epsilon", &self.config.epsilon())
            .field("threshold", &self.config.threshold())
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

impl<T, P: Clone, O: KeyOrder<P> + Default> SoftHeap<T, P, O> {
    /// Creates an empty heap with the default configuration
    pub fn new() -> Self {
        Self::with_config(SoftHeapConfig::default())
    }

    pub fn with_config(config: SoftHeapConfig) -> Self {
        Self::with_order(config, O::default())
    }

    /// Creates an empty heap with error rate `epsilon`
    ///
    /// # Errors
    /// Returns [`ConfigError::EpsilonOutOfRange`] unless `0 < epsilon <= 1`.
    pub fn with_epsilon(epsilon: f64) -> Result<Self, ConfigError> {
        Ok(Self::with_config(SoftHeapConfig::new(epsilon)?))
    }
}

impl<T, P: Clone, O: KeyOrder<P>> SoftHeap<T, P, O> {
    /// Creates an empty heap ordered by `order`
    pub fn with_order(config: SoftHeapConfig, order: O) -> Self {
        debug!(
            epsilon = config.epsilon(),
            threshold = config.threshold(),
            "soft heap created"
        );
        Self {
            storage: Storage::default(),
            root: nil(),
            len: 0,
            insertions: 0,
            config,
            order,
            observer: None,
        }
    }

    /// Attaches an observer that is notified of every structural edit
    pub fn set_observer(&mut self, observer: Box<dyn StructureObserver>) {
        self.observer = Some(observer);
    }

    /// Detaches and returns the current observer
    pub fn take_observer(&mut self) -> Option<Box<dyn StructureObserver>> {
        self.observer.take()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    pub fn epsilon(&self) -> f64 {
        self.config.epsilon()
    }

    pub fn threshold(&self) -> u32 {
        self.config.threshold()
    }

    /// Inserts an item
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn insert(&mut self, priority: P, item: T) {
        let x = self.make_root(priority, item);
        let heap = self.rank_swap(self.root);
        let heap = self.meldable_insert(x, heap);
        self.root = self.key_swap(heap);
        self.len += 1;
        self.insertions += 1;

        #[cfg(debug_assertions)]
        self.debug_check_root_list();
    }

    /// Returns the representative key of the top vertex and its ring
    ///
    /// The key is the one the heap orders the vertex by; items in the ring
    /// whose own key strictly precedes it are corrupted.
    pub fn find_top(&self) -> Option<(&P, RingIter<'_, T, P>)> {
        let vertex = self.storage.vertices.get(self.root)?;
        let key = vertex.key.as_ref()?;
        let inner = vertex
            .ring
            .map(|head| ring::iter(&self.storage.items, head));
        Some((key, RingIter { inner }))
    }

    /// Removes one item of the top vertex
    ///
    /// Returns `None` on an empty heap; repeated calls stay harmless.
    ///
    /// # Time Complexity
    /// O(log 1/ε) amortized
    pub fn delete_top(&mut self) -> Option<Extracted<T, P>> {
        let top = self.root;
        let vertex = self.storage.vertices.get(top)?;
        let head = match vertex.ring {
            Some(head) => head,
            None => unreachable!("root vertex {:?} has no ring", top),
        };

        let extracted = match ring::pop_next(&mut self.storage.items, head) {
            Some(taken) => {
                self.notify(top, |observer, id| observer.on_key_or_ring_changed(id));
                self.extract(top, taken)
            }
            None => {
                let rank = self.storage.vertices[top].rank;
                let extracted = self.extract(top, head);
                self.storage.vertices[top].ring = None;

                let heap = if self.storage.vertices[top].is_leaf() {
                    let next = self.storage.vertices[top].next;
                    self.remove_vertex(top);
                    next
                } else {
                    self.defill(top, false);
                    top
                };
                self.root = self.reorder(heap, rank);
                extracted
            }
        };
        self.len -= 1;

        #[cfg(debug_assertions)]
        self.debug_check_root_list();

        extracted
    }

    /// Moves every item of `other` into this heap
    ///
    /// The arena of `other` is absorbed into this one; when no observer is
    /// attached the smaller arena is the one that gets re-keyed. The result
    /// keeps this heap's configuration and observer.
    ///
    /// # Time Complexity
    /// O(1) amortized for the root-list meld, plus re-keying the absorbed arena
    pub fn meld(&mut self, other: Self) {
        let SoftHeap {
            mut storage,
            mut root,
            len,
            insertions,
            ..
        } = other;
        self.insertions += insertions;
        if root.is_null() {
            return;
        }

        if self.observer.is_none() && storage.vertices.len() > self.storage.vertices.len() {
            std::mem::swap(&mut self.storage, &mut storage);
            std::mem::swap(&mut self.root, &mut root);
        }

        let (other_root, absorbed) = self.storage.absorb(storage, root);
        if self.observer.is_some() {
            for &v in &absorbed {
                let rank = self.storage.vertices[v].rank;
                self.notify(v, |observer, id| observer.on_vertex_created(id, rank));
            }
        }

        let a = self.rank_swap(self.root);
        let b = self.rank_swap(other_root);
        let melded = self.meldable_meld(a, b);
        self.root = self.key_swap(melded);
        self.len += len;

        debug!(
            absorbed = absorbed.len(),
            len = self.len,
            "soft heaps melded"
        );

        #[cfg(debug_assertions)]
        self.debug_check_root_list();
    }

    /// Iterates over the roots, head first
    pub fn roots(&self) -> impl Iterator<Item = RootView<'_, P>> + '_ {
        let first = Some(self.root).filter(|v| !v.is_null());
        std::iter::successors(first, move |&v| {
            Some(self.storage.next_of(v)).filter(|next| !next.is_null())
        })
        .map(move |v| {
            let vertex = &self.storage.vertices[v];
            RootView {
                rank: vertex.rank,
                key: vertex.key.as_ref(),
                corrupted: vertex.corrupted,
                ring_len: vertex
                    .ring
                    .map_or(0, |head| ring::len(&self.storage.items, head)),
            }
        })
    }

    /// Computes counters describing the heap. O(n).
    pub fn stats(&self) -> SoftHeapStats {
        let mut corrupted_vertices = 0;
        let mut corrupted_items = 0;
        for vertex in self.storage.vertices.values() {
            if vertex.corrupted {
                corrupted_vertices += 1;
            }
            if let (Some(key), Some(head)) = (vertex.key.as_ref(), vertex.ring) {
                corrupted_items += ring::iter(&self.storage.items, head)
                    .filter(|entry| self.order.precedes(&entry.priority, key))
                    .count();
            }
        }
        SoftHeapStats {
            items: self.len,
            roots: self.roots().count(),
            vertices: self.storage.vertices.len(),
            corrupted_vertices,
            corrupted_items,
            insertions: self.insertions,
        }
    }

    /// Walks the whole structure and panics on any broken invariant.
    ///
    /// O(n); meant for tests and debugging.
    pub fn check_invariants(&self) {
        self.check_root_list();

        let mut vertices = 0;
        let mut items = 0;
        let mut root = self.root;
        while !root.is_null() {
            self.check_tree(root, &mut vertices, &mut items);
            root = self.storage.next_of(root);
        }

        assert_eq!(
            vertices,
            self.storage.vertices.len(),
            "unreachable vertices left in the arena"
        );
        assert_eq!(items, self.len, "ring sizes disagree with len");
        assert_eq!(items, self.storage.items.len(), "unreachable items left in the arena");
    }

    fn check_tree(&self, v: VertexKey, vertices: &mut usize, items: &mut usize) {
        let vertex = &self.storage.vertices[v];
        *vertices += 1;

        assert!(
            !(vertex.left.is_null() && !vertex.right.is_null()),
            "vertex {:?} has a right child but no left child",
            v
        );
        let key = match vertex.key.as_ref() {
            Some(key) => key,
            None => panic!("vertex {:?} has no key", v),
        };
        let head = match vertex.ring {
            Some(head) => head,
            None => panic!("vertex {:?} has no ring", v),
        };

        for entry in ring::iter(&self.storage.items, head) {
            assert!(
                !self.order.precedes(key, &entry.priority),
                "vertex {:?} holds an item with a worse key than its own",
                v
            );
            *items += 1;
        }

        for child in [vertex.left, vertex.right] {
            if child.is_null() {
                continue;
            }
            if let Some(child_key) = self.storage.key_of(child) {
                assert!(
                    !self.order.precedes(child_key, key),
                    "child {:?} precedes its parent {:?}",
                    child,
                    v
                );
            }
            self.check_tree(child, vertices, items);
        }
    }

    /// Checks the root-list shape described in the module docs.
    fn check_root_list(&self) {
        let mut head = self.root;
        if head.is_null() {
            return;
        }
        let mut cursor = self.storage.next_of(head);
        let mut floor: Option<Rank> = None;

        while !cursor.is_null() {
            assert!(
                !self.key_precedes(cursor, head),
                "root list head does not carry the best key"
            );
            let head_rank = self.storage.rank_of(head);
            let cursor_rank = self.storage.rank_of(cursor);
            assert_ne!(head_rank, cursor_rank, "two roots share rank {}", head_rank);

            let lowest = head_rank.min(cursor_rank);
            assert!(
                floor.map_or(true, |floor| lowest > floor),
                "root list ranks out of order"
            );
            floor = Some(lowest);
            if head_rank < cursor_rank {
                head = cursor;
            }
            cursor = self.storage.next_of(cursor);
        }

        let last = self.storage.rank_of(head);
        assert!(
            floor.map_or(true, |floor| last > floor),
            "root list ranks out of order"
        );
    }

    #[cfg(debug_assertions)]
    fn debug_check_root_list(&self) {
        self.check_root_list();
    }

    // ------------------------------------------------------------------------
    // Algorithm
    // ------------------------------------------------------------------------

    /// True if `a`'s key strictly precedes `b`'s; `nil` has the worst key
    fn key_precedes(&self, a: VertexKey, b: VertexKey) -> bool {
        match (self.storage.key_of(a), self.storage.key_of(b)) {
            (Some(a), Some(b)) => self.order.precedes(a, b),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn make_root(&mut self, priority: P, item: T) -> VertexKey {
        let key = priority.clone();
        let head = ring::singleton(&mut self.storage.items, priority, item);
        let v = self.storage.vertices.insert(Vertex::leaf(key, head));
        self.notify(v, |observer, id| observer.on_vertex_created(id, 0));
        v
    }

    fn extract(&mut self, v: VertexKey, taken: ItemKey) -> Option<Extracted<T, P>> {
        let entry = self.storage.items.remove(taken)?;
        let corrupted = self
            .storage
            .key_of(v)
            .map_or(false, |key| self.order.precedes(&entry.priority, key));
        Some(Extracted {
            priority: entry.priority,
            item: entry.item,
            corrupted,
        })
    }

    fn remove_vertex(&mut self, v: VertexKey) {
        self.notify(v, |observer, id| observer.on_vertex_removed(id));
        self.storage.vertices.remove(v);
    }

    /// Swaps the first two roots if they are out of rank order
    fn rank_swap(&mut self, heap: VertexKey) -> VertexKey {
        if heap.is_null() {
            return heap;
        }
        let x = self.storage.vertices[heap].next;
        if self.storage.rank_of(heap) <= self.storage.rank_of(x) {
            return heap;
        }
        self.swap_front(heap, x)
    }

    /// Swaps the first two roots unless the first has the strictly better key
    fn key_swap(&mut self, heap: VertexKey) -> VertexKey {
        if heap.is_null() {
            return heap;
        }
        let x = self.storage.vertices[heap].next;
        if x.is_null() || self.key_precedes(heap, x) {
            return heap;
        }
        self.swap_front(heap, x)
    }

    fn swap_front(&mut self, heap: VertexKey, x: VertexKey) -> VertexKey {
        let after = self.storage.vertices[x].next;
        self.storage.vertices[heap].next = after;
        self.storage.vertices[x].next = heap;
        self.notify_relinked(heap, after);
        self.notify_relinked(x, heap);
        x
    }

    /// Re-sorts the front of the list after the head's rank slot changed
    fn reorder(&mut self, heap: VertexKey, rank: Rank) -> VertexKey {
        if self.storage.rank_of(self.storage.next_of(heap)) < rank {
            let heap = self.rank_swap(heap);
            let next = self.storage.vertices[heap].next;
            let rest = self.reorder(next, rank);
            self.storage.vertices[heap].next = rest;
            self.notify_relinked(heap, rest);
            return self.key_swap(heap);
        }
        self.key_swap(heap)
    }

    /// Puts root `x` in front of `heap`, linking on rank collisions
    ///
    /// `heap` must have its lowest-ranked root first and `x.rank` must not
    /// exceed it.
    fn meldable_insert(&mut self, x: VertexKey, heap: VertexKey) -> VertexKey {
        if self.storage.rank_of(x) < self.storage.rank_of(heap) {
            let next = self.key_swap(heap);
            self.storage.vertices[x].next = next;
            self.notify_relinked(x, next);
            return x;
        }
        let heap_next = self.storage.vertices[heap].next;
        let linked = self.link(x, heap);
        let rest = self.rank_swap(heap_next);
        self.meldable_insert(linked, rest)
    }

    fn meldable_meld(&mut self, x: VertexKey, y: VertexKey) -> VertexKey {
        let (x, y) = if self.storage.rank_of(x) > self.storage.rank_of(y) {
            (y, x)
        } else {
            (x, y)
        };
        if y.is_null() {
            return x;
        }
        let x_next = self.storage.vertices[x].next;
        let x_next = self.rank_swap(x_next);
        let rest = self.meldable_meld(x_next, y);
        self.meldable_insert(x, rest)
    }

    /// Makes two equal-rank roots the children of a new vertex
    fn link(&mut self, x: VertexKey, y: VertexKey) -> VertexKey {
        debug_assert_eq!(self.storage.rank_of(x), self.storage.rank_of(y));
        let rank = checked_increment(self.storage.rank_of(x));
        let z = self.storage.vertices.insert(Vertex::internal(rank, x, y));
        self.notify(z, |observer, id| observer.on_vertex_created(id, rank));
        self.defill(z, true);
        z
    }

    fn defill(&mut self, x: VertexKey, inserting: bool) {
        self.fill(x, inserting);

        let vertex = &self.storage.vertices[x];
        if inserting
            && u32::from(vertex.rank) > self.config.threshold()
            && is_even(vertex.rank)
            && !vertex.left.is_null()
        {
            self.fill(x, inserting);
            self.mark_corrupted(x);
        }
    }

    /// Pulls the ring of the better child up into `x`
    fn fill(&mut self, x: VertexKey, inserting: bool) {
        let (mut left, mut right) = {
            let vertex = &self.storage.vertices[x];
            (vertex.left, vertex.right)
        };
        if !left.is_null() && !right.is_null() && self.key_precedes(right, left) {
            std::mem::swap(&mut left, &mut right);
            let vertex = &mut self.storage.vertices[x];
            vertex.left = left;
            vertex.right = right;
            self.notify(x, |observer, id| observer.on_children_swapped(id));
        }

        let child = &mut self.storage.vertices[left];
        let key = child.key.take();
        let child_ring = child.ring.take();
        let child_corrupted = child.corrupted;
        let child_is_leaf = child.is_leaf();
        debug_assert!(key.is_some() && child_ring.is_some(), "filled from an empty child");

        let vertex = &mut self.storage.vertices[x];
        vertex.key = key;
        match (vertex.ring, child_ring) {
            (Some(own), Some(pulled)) => ring::merge(&mut self.storage.items, own, pulled),
            (None, pulled) => vertex.ring = pulled,
            (Some(_), None) => {}
        }
        self.notify(x, |observer, id| observer.on_key_or_ring_changed(id));
        if child_corrupted {
            self.mark_corrupted(x);
        }

        if child_is_leaf {
            let vertex = &mut self.storage.vertices[x];
            vertex.left = right;
            vertex.right = nil();
            self.remove_vertex(left);
        } else {
            self.defill(left, inserting);
        }
    }

    fn mark_corrupted(&mut self, x: VertexKey) {
        let vertex = &mut self.storage.vertices[x];
        if vertex.corrupted {
            return;
        }
        vertex.corrupted = true;
        let rank = vertex.rank;
        self.notify(x, |observer, id| observer.on_corruption_set(id, rank));
    }

    // ------------------------------------------------------------------------
    // Observer plumbing
    // ------------------------------------------------------------------------

    fn notify(&mut self, v: VertexKey, f: impl FnOnce(&mut Box<dyn StructureObserver>, VertexId)) {
        if let (Some(observer), Some(id)) = (self.observer.as_mut(), VertexId::from_key(v)) {
            f(observer, id);
        }
    }

    fn notify_relinked(&mut self, prev: VertexKey, next: VertexKey) {
        let next = VertexId::from_key(next);
        self.notify(prev, |observer, id| observer.on_root_list_relinked(id, next));
    }
}

impl<T, P: Ord + Clone> SoftHeap<T, P, MinOrder> {
    /// Smallest representative key and the ring holding it
    pub fn find_min(&self) -> Option<(&P, RingIter<'_, T, P>)> {
        self.find_top()
    }

    pub fn delete_min(&mut self) -> Option<Extracted<T, P>> {
        self.delete_top()
    }
}

impl<T, P: Ord + Clone> SoftHeap<T, P, MaxOrder> {
    /// Largest representative key and the ring holding it
    pub fn find_max(&self) -> Option<(&P, RingIter<'_, T, P>)> {
        self.find_top()
    }

    pub fn delete_max(&mut self) -> Option<Extracted<T, P>> {
        self.delete_top()
    }
}

impl<T, P: Clone, O: KeyOrder<P> + Default> Default for SoftHeap<T, P, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Clone, O: KeyOrder<P> + Default> Heap<T, P> for SoftHeap<T, P, O> {
    fn new() -> Self {
        SoftHeap::new()
    }

    fn is_empty(&self) -> bool {
        SoftHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        SoftHeap::len(self)
    }

    fn push(&mut self, priority: P, item: T) {
        self.insert(priority, item);
    }

    fn peek(&self) -> Option<(&P, &T)> {
        let head = self.storage.vertices.get(self.root)?.ring?;
        let entry = &self.storage.items[self.storage.items[head].next];
        Some((&entry.priority, &entry.item))
    }

    fn pop(&mut self) -> Option<(P, T)> {
        self.delete_top()
            .map(|extracted| (extracted.priority, extracted.item))
    }

    fn merge(&mut self, other: Self) {
        self.meld(other);
    }
}
