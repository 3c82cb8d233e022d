use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::coords::{Coordinates, Subset, Viewport};

use super::{UpdateBatch, WorldView};

/// Receives World change notifications.
pub trait WorldObserver {
    fn world_changed(&mut self, view: &WorldView);
}

pub type SharedObserver = Rc<RefCell<dyn WorldObserver>>;

/// Opaque handle to an attached observer.
///
/// Handles are never reused, so a stale handle cannot detach a newer observer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Observed spatial state shared between a caller and a render pipeline.
///
/// A `World` is meant to live behind an `Rc` owned by the caller; every method takes
/// `&self`. It is single-threaded by construction (`!Sync`), and at most one tiling
/// sweep may drive it at a time.
///
/// Every mutator queues a change notification. Outside an [`UpdateBatch`] the
/// notification is delivered immediately; inside one it is deferred until the
/// outermost batch ends. Observers are called in attach order with a snapshot of
/// the view. An observer that mutates the World from its own callback is not
/// re-entered; the nested notification skips it.
pub struct World {
    view: Cell<WorldView>,
    block_depth: Cell<u32>,
    pending: Cell<bool>,
    next_observer: Cell<u64>,
    observers: RefCell<Vec<(ObserverId, SharedObserver)>>,
}

impl World {
    /// Creates a world covering `extent`, with the window set to the whole extent.
    pub fn new(extent: Subset, viewport: Viewport) -> Self {
        Self::from_view(WorldView {
            extent,
            window: extent,
            viewport,
        })
    }

    pub fn from_view(view: WorldView) -> Self {
        Self {
            view: Cell::new(view),
            block_depth: Cell::new(0),
            pending: Cell::new(false),
            next_observer: Cell::new(0),
            observers: RefCell::new(Vec::new()),
        }
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn view(&self) -> WorldView {
        self.view.get()
    }

    #[inline]
    pub fn extent(&self) -> Subset {
        self.view.get().extent
    }

    #[inline]
    pub fn window(&self) -> Subset {
        self.view.get().window
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.view.get().viewport
    }

    pub fn is_initialized(&self) -> bool {
        self.view.get().is_initialized()
    }

    pub fn transform(&self, p: Coordinates) -> Coordinates {
        self.view.get().transform(p)
    }

    pub fn inverse_transform(&self, p: Coordinates) -> Coordinates {
        self.view.get().inverse_transform(p)
    }

    pub fn set_extent(&self, extent: Subset) {
        self.update(|v| v.extent = extent);
    }

    pub fn set_window(&self, window: Subset) {
        self.update(|v| v.window = window);
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.update(|v| v.viewport = Viewport::new(width, height));
    }

    fn update(&self, f: impl FnOnce(&mut WorldView)) {
        let mut view = self.view.get();
        f(&mut view);
        self.view.set(view);
        self.pending.set(true);
        if self.block_depth.get() == 0 {
            self.flush();
        }
    }

    // ── batching ──────────────────────────────────────────────────────────

    /// Defers notifications until the returned guard (and every enclosing one) is dropped.
    pub fn batch(&self) -> UpdateBatch<'_> {
        UpdateBatch::new(self)
    }

    #[inline]
    pub fn is_update_blocked(&self) -> bool {
        self.block_depth.get() > 0
    }

    pub(super) fn enter_batch(&self) {
        self.block_depth.set(self.block_depth.get() + 1);
    }

    pub(super) fn leave_batch(&self) {
        let depth = self.block_depth.get().saturating_sub(1);
        self.block_depth.set(depth);
        if depth == 0 {
            self.flush();
        }
    }

    fn flush(&self) {
        if !self.pending.replace(false) {
            return;
        }

        let view = self.view.get();
        // Snapshot the list so observers may attach/detach from their callbacks.
        let observers: Vec<SharedObserver> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, o)| Rc::clone(o))
            .collect();

        for observer in observers {
            match observer.try_borrow_mut() {
                Ok(mut o) => o.world_changed(&view),
                Err(_) => log::debug!("world observer is busy; skipping nested notification"),
            }
        }
    }

    // ── observers ─────────────────────────────────────────────────────────

    pub fn attach(&self, observer: SharedObserver) -> ObserverId {
        let id = ObserverId(self.next_observer.get());
        self.next_observer.set(id.0 + 1);
        self.observers.borrow_mut().push((id, observer));
        id
    }

    /// Returns `false` when `id` is not attached.
    pub fn detach(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::from_view(WorldView::default())
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("view", &self.view.get())
            .field("block_depth", &self.block_depth.get())
            .field("pending", &self.pending.get())
            .field("observers", &self.observer_count())
            .finish()
    }
}
