//! Structural observers
//!
//! A soft heap can report its structural edits to a [`StructureObserver`],
//! e.g. to drive a visualization or to log what the algorithm does. The
//! observer only receives notifications; it never reads back into the heap,
//! and no invariant depends on it being called.
//!
//! Three implementations ship with the crate:
//!
//! - [`NoopObserver`]: ignores everything
//! - [`TracingObserver`]: one `tracing` event at `TRACE` level per edit
//! - [`EventLog`]: records [`StructureEvent`]s into a shared buffer

use crate::rank::Rank;
use crate::storage::VertexKey;
use slotmap::{Key, KeyData};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Opaque, stable identifier of a vertex for the lifetime of the vertex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(u64);

impl VertexId {
    pub(crate) fn from_key(key: VertexKey) -> Option<Self> {
        if key.is_null() {
            None
        } else {
            Some(VertexId(key.data().as_ffi()))
        }
    }

    /// Raw numeric form, suitable for external tooling.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = KeyData::from_ffi(self.0);
        write!(f, "v{:?}", data)
    }
}

/// Receiver of structural notifications. Every method defaults to a no-op.
///
/// `None` in [`on_root_list_relinked`](Self::on_root_list_relinked) stands for
/// the `nil` sentinel.
pub trait StructureObserver {
    fn on_vertex_created(&mut self, _vertex: VertexId, _rank: Rank) {}

    fn on_vertex_removed(&mut self, _vertex: VertexId) {}

    fn on_children_swapped(&mut self, _vertex: VertexId) {}

    /// The vertex's representative key or its ring changed
    fn on_key_or_ring_changed(&mut self, _vertex: VertexId) {}

    fn on_corruption_set(&mut self, _vertex: VertexId, _rank: Rank) {}

    /// `prev.next` now points at `next`
    fn on_root_list_relinked(&mut self, _prev: VertexId, _next: Option<VertexId>) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StructureObserver for NoopObserver {}

/// Observer that emits a `trace!` event per notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl StructureObserver for TracingObserver {
    fn on_vertex_created(&mut self, vertex: VertexId, rank: Rank) {
        trace!(vertex = vertex.as_u64(), rank, "vertex created");
    }

    fn on_vertex_removed(&mut self, vertex: VertexId) {
        trace!(vertex = vertex.as_u64(), "vertex removed");
    }

    fn on_children_swapped(&mut self, vertex: VertexId) {
        trace!(vertex = vertex.as_u64(), "children swapped");
    }

    fn on_key_or_ring_changed(&mut self, vertex: VertexId) {
        trace!(vertex = vertex.as_u64(), "key or ring changed");
    }

    fn on_corruption_set(&mut self, vertex: VertexId, rank: Rank) {
        trace!(vertex = vertex.as_u64(), rank, "vertex corrupted");
    }

    fn on_root_list_relinked(&mut self, prev: VertexId, next: Option<VertexId>) {
        trace!(
            prev = prev.as_u64(),
            next = next.map(VertexId::as_u64),
            "root list relinked"
        );
    }
}

/// A recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureEvent {
    VertexCreated { vertex: VertexId, rank: Rank },
    VertexRemoved { vertex: VertexId },
    ChildrenSwapped { vertex: VertexId },
    KeyOrRingChanged { vertex: VertexId },
    CorruptionSet { vertex: VertexId, rank: Rank },
    RootListRelinked { prev: VertexId, next: Option<VertexId> },
}

/// Observer that appends every notification to a shared buffer.
///
/// Clones share the buffer, so one clone can be handed to the heap while
/// another is kept to read the events back.
///
/// ```rust
/// use rust_soft_heap::observer::{EventLog, StructureEvent};
/// use rust_soft_heap::soft_heap::MinSoftHeap;
///
/// let log = EventLog::new();
/// let mut heap: MinSoftHeap<(), i32> = MinSoftHeap::new();
/// heap.set_observer(Box::new(log.clone()));
/// heap.insert(1, ());
///
/// assert!(matches!(
///     log.events().first(),
///     Some(StructureEvent::VertexCreated { rank: 0, .. })
/// ));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<StructureEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<StructureEvent> {
        self.events.borrow().clone()
    }

    /// Removes and returns the recorded events.
    pub fn drain(&self) -> Vec<StructureEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    fn record(&self, event: StructureEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl StructureObserver for EventLog {
    fn on_vertex_created(&mut self, vertex: VertexId, rank: Rank) {
        self.record(StructureEvent::VertexCreated { vertex, rank });
    }

    fn on_vertex_removed(&mut self, vertex: VertexId) {
        self.record(StructureEvent::VertexRemoved { vertex });
    }

    fn on_children_swapped(&mut self, vertex: VertexId) {
        self.record(StructureEvent::ChildrenSwapped { vertex });
    }

    fn on_key_or_ring_changed(&mut self, vertex: VertexId) {
        self.record(StructureEvent::KeyOrRingChanged { vertex });
    }

    fn on_corruption_set(&mut self, vertex: VertexId, rank: Rank) {
        self.record(StructureEvent::CorruptionSet { vertex, rank });
    }

    fn on_root_list_relinked(&mut self, prev: VertexId, next: Option<VertexId>) {
        self.record(StructureEvent::RootListRelinked { prev, next });
    }
}
