//! Synchronous change notification.
//!
//! A world keeps a set of observer handles and calls every one of them inline
//! after each mutation. There is no queue: a slow observer stalls the tick,
//! and a failing observer aborts the operation that triggered it.

use crate::error::ObserverError;
use crate::world::World;
use std::rc::Rc;

/// Receives a callback after every world mutation.
pub trait Observer {
    fn model_changed(&self, world: &World) -> Result<(), ObserverError>;
}

/// Ordered set of observer handles, compared by pointer identity.
#[derive(Default, Clone)]
pub struct ObserverSet {
    handles: Vec<Rc<dyn Observer>>,
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet").field("len", &self.handles.len()).finish()
    }
}

impl ObserverSet {
    /// Insert a handle. Returns `false` if it was already registered.
    pub fn add(&mut self, observer: Rc<dyn Observer>) -> bool {
        if self.contains(&observer) {
            return false;
        }
        self.handles.push(observer);
        true
    }

    /// Remove a handle. Returns `false` if it was not registered.
    pub fn remove(&mut self, observer: &Rc<dyn Observer>) -> bool {
        let before = self.handles.len();
        self.handles.retain(|h| !Rc::ptr_eq(h, observer));
        self.handles.len() != before
    }

    pub fn contains(&self, observer: &Rc<dyn Observer>) -> bool {
        self.handles.iter().any(|h| Rc::ptr_eq(h, observer))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Call every observer in registration order, stopping at the first error.
    pub(crate) fn notify(&self, world: &World) -> Result<(), ObserverError> {
        for h in &self.handles {
            h.model_changed(world)?;
        }
        Ok(())
    }
}
