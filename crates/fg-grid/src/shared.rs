//! `SharedGrid`: the grid behind its single lock.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::{Grid, GridSnapshot};

/// A cheaply clonable handle to the one grid of a run.
///
/// Every agent thread, the detection loop and any external collaborator hold
/// a clone.  All access goes through one `parking_lot::Mutex`; there is no
/// per-cell locking, so no lock ordering to get wrong.
///
/// Hold the guard only for the duration of one logical step (one move
/// attempt, one snapshot).  Never sleep while holding it.
#[derive(Clone)]
pub struct SharedGrid {
    inner: Arc<Mutex<Grid>>,
    size:  i32,
}

impl SharedGrid {
    pub fn new(grid: Grid) -> Self {
        let size = grid.size();
        Self { inner: Arc::new(Mutex::new(grid)), size }
    }

    /// Side length, readable without the lock (it never changes).
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Acquire the grid lock.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, Grid> {
        self.inner.lock()
    }

    /// Run `f` as one critical section.
    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut Grid) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// A consistent copy of the grid, taken under the lock.
    pub fn snapshot(&self) -> GridSnapshot {
        self.inner.lock().snapshot()
    }

    /// Number of live handles, including this one.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl std::fmt::Debug for SharedGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedGrid")
            .field("size", &self.size)
            .field("handles", &self.handle_count())
            .finish()
    }
}
