//! Arena storage for soft heap items and vertices
//!
//! Items and vertices live in two `slotmap` arenas owned by a single heap and
//! reference each other through generational keys. The `nil` sentinel is the
//! null vertex key: it is never inserted, so it cannot be mutated, and looking
//! it up always misses. Accessors that accept a possibly-`nil` key
//! ([`Storage::rank_of`], [`Storage::key_of`], ...) answer for the sentinel
//! themselves.
//!
//! # Melding arenas
//!
//! `meld` consumes another heap. Its nodes are moved into the receiving arena
//! by [`Storage::absorb`], which re-keys every item and vertex and rewrites all
//! links through a `SecondaryMap` translation table. The caller absorbs the
//! smaller arena into the larger one.

use crate::rank::{Rank, SENTINEL_RANK};
use slotmap::{new_key_type, Key, SecondaryMap, SlotMap};

new_key_type! {
    /// Key of a vertex (tree node or root) in the arena
    pub struct VertexKey;
    /// Key of an item in the arena
    pub struct ItemKey;
}

/// The `nil` sentinel: empty subtree, empty heap and root-list terminator.
#[inline]
pub fn nil() -> VertexKey {
    VertexKey::null()
}

/// One inserted key with its payload.
///
/// `next` links the item into the circular ring of its vertex; a lone item
/// points to itself.
#[derive(Debug)]
pub struct Item<T, P> {
    pub priority: P,
    pub item: T,
    pub next: ItemKey,
}

/// A tree node or root.
#[derive(Debug)]
pub struct Vertex<P> {
    /// Representative key; `None` only between `link` and its first `fill`.
    pub key: Option<P>,
    pub rank: Rank,
    pub left: VertexKey,
    pub right: VertexKey,
    /// Sibling in the root list (meaningless for non-roots).
    pub next: VertexKey,
    pub corrupted: bool,
    /// Ring entry point; `None` while the vertex's items have been promoted.
    pub ring: Option<ItemKey>,
}

impl<P> Vertex<P> {
    /// A rank-0 root owning a single-item ring.
    pub fn leaf(key: P, ring: ItemKey) -> Self {
        Self {
            key: Some(key),
            rank: 0,
            left: nil(),
            right: nil(),
            next: nil(),
            corrupted: false,
            ring: Some(ring),
        }
    }

    /// An empty internal vertex with the given children.
    pub fn internal(rank: Rank, left: VertexKey, right: VertexKey) -> Self {
        Self {
            key: None,
            rank,
            left,
            right,
            next: nil(),
            corrupted: false,
            ring: None,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_null()
    }
}

/// Arena pair backing one heap.
#[derive(Debug)]
pub struct Storage<T, P> {
    pub items: SlotMap<ItemKey, Item<T, P>>,
    pub vertices: SlotMap<VertexKey, Vertex<P>>,
}

impl<T, P> Default for Storage<T, P> {
    fn default() -> Self {
        Self {
            items: SlotMap::with_key(),
            vertices: SlotMap::with_key(),
        }
    }
}

impl<T, P> Storage<T, P> {
    /// Rank of `v`, or [`SENTINEL_RANK`] for `nil`.
    #[inline]
    pub fn rank_of(&self, v: VertexKey) -> Rank {
        self.vertices.get(v).map_or(SENTINEL_RANK, |vertex| vertex.rank)
    }

    /// Representative key of `v`; `None` for `nil`.
    #[inline]
    pub fn key_of(&self, v: VertexKey) -> Option<&P> {
        self.vertices.get(v).and_then(|vertex| vertex.key.as_ref())
    }

    /// Root-list successor of `v`; `nil` is its own successor.
    #[inline]
    pub fn next_of(&self, v: VertexKey) -> VertexKey {
        self.vertices.get(v).map_or(nil(), |vertex| vertex.next)
    }

    /// Moves every node of `other` into this arena.
    ///
    /// Returns the translation of `other_root` and the new keys of all
    /// absorbed vertices.
    pub fn absorb(
        &mut self,
        other: Storage<T, P>,
        other_root: VertexKey,
    ) -> (VertexKey, Vec<VertexKey>) {
        let Storage { items, vertices } = other;

        let mut item_map: SecondaryMap<ItemKey, ItemKey> =
            SecondaryMap::with_capacity(items.len());
        for (old, item) in items {
            let new = self.items.insert(item);
            item_map.insert(old, new);
        }

        let mut vertex_map: SecondaryMap<VertexKey, VertexKey> =
            SecondaryMap::with_capacity(vertices.len());
        let mut absorbed = Vec::with_capacity(vertices.len());
        for (old, vertex) in vertices {
            let new = self.vertices.insert(vertex);
            vertex_map.insert(old, new);
            absorbed.push(new);
        }

        let translate = |v: VertexKey| vertex_map.get(v).copied().unwrap_or_else(nil);

        for &new in item_map.values() {
            let item = &mut self.items[new];
            item.next = item_map[item.next];
        }
        for &new in &absorbed {
            let vertex = &mut self.vertices[new];
            vertex.left = translate(vertex.left);
            vertex.right = translate(vertex.right);
            vertex.next = translate(vertex.next);
            vertex.ring = vertex.ring.map(|ring| item_map[ring]);
        }

        (translate(other_root), absorbed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_lookups() {
        let storage: Storage<(), i32> = Storage::default();
        assert_eq!(storage.rank_of(nil()), SENTINEL_RANK);
        assert_eq!(storage.key_of(nil()), None);
        assert_eq!(storage.next_of(nil()), nil());
    }

    #[test]
    fn test_leaf_vertex() {
        let mut storage: Storage<&str, i32> = Storage::default();
        let item = storage.items.insert_with_key(|k| Item {
            priority: 7,
            item: "seven",
            next: k,
        });
        let v = storage.vertices.insert(Vertex::leaf(7, item));

        assert!(storage.vertices[v].is_leaf());
        assert_eq!(storage.rank_of(v), 0);
        assert_eq!(storage.key_of(v), Some(&7));
        assert_eq!(storage.next_of(v), nil());
    }

    #[test]
    fn test_absorb_rewrites_links() {
        let mut target: Storage<u32, i32> = Storage::default();
        let mut source: Storage<u32, i32> = Storage::default();

        // Pad the target so absorbed keys cannot coincide with the source's.
        let pad = target.items.insert_with_key(|k| Item {
            priority: 0,
            item: 0,
            next: k,
        });
        target.vertices.insert(Vertex::leaf(0, pad));

        let a = source.items.insert_with_key(|k| Item {
            priority: 1,
            item: 1,
            next: k,
        });
        let b = source.items.insert_with_key(|k| Item {
            priority: 2,
            item: 2,
            next: k,
        });
        source.items[a].next = b;
        source.items[b].next = a;
        let left = source.vertices.insert(Vertex::leaf(1, a));
        let right = source.vertices.insert(Vertex::leaf(2, b));
        let parent = source.vertices.insert(Vertex::internal(1, left, right));

        let (root, absorbed) = target.absorb(source, parent);

        assert_eq!(absorbed.len(), 3);
        assert_eq!(target.vertices.len(), 4);
        assert_eq!(target.items.len(), 3);
        assert_eq!(target.rank_of(root), 1);

        let new_left = target.vertices[root].left;
        let new_right = target.vertices[root].right;
        assert_eq!(target.key_of(new_left), Some(&1));
        assert_eq!(target.key_of(new_right), Some(&2));
        assert_eq!(target.vertices[root].next, nil());

        let ring = target.vertices[new_left].ring.unwrap();
        let other = target.items[ring].next;
        assert_eq!(target.items[other].priority, 2);
        assert_eq!(target.items[other].next, ring);
    }

    #[test]
    fn test_absorb_empty() {
        let mut target: Storage<(), i32> = Storage::default();
        let (root, absorbed) = target.absorb(Storage::default(), nil());
        assert_eq!(root, nil());
        assert!(absorbed.is_empty());
    }
}
