//! Copy-on-write handler registry
//!
//! Dispatch takes a snapshot (an `Arc` clone under a short read lock) and
//! iterates it with no lock held. Mutations build a new list and swap it in,
//! so a dispatch in flight always sees either the old or the new list, never
//! a partial one.

use super::handler::Handler;
use parking_lot::RwLock;
use std::sync::Arc;

pub type HandlerSnapshot = Arc<Vec<Arc<dyn Handler>>>;

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HandlerSnapshot>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handlers(handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self {
            handlers: RwLock::new(Arc::new(handlers)),
        }
    }

    /// Current handler list, in registration order
    #[inline]
    pub fn snapshot(&self) -> HandlerSnapshot {
        Arc::clone(&self.handlers.read())
    }

    pub fn add(&self, handler: Arc<dyn Handler>) {
        let mut guard = self.handlers.write();
        let mut next: Vec<Arc<dyn Handler>> = guard.iter().cloned().collect();
        next.push(handler);
        *guard = Arc::new(next);
    }

    /// Remove every handler with the given name, returning how many were removed
    pub fn remove(&self, name: &str) -> usize {
        let mut guard = self.handlers.write();
        let before = guard.len();
        let next: Vec<Arc<dyn Handler>> = guard
            .iter()
            .filter(|h| h.name() != name)
            .cloned()
            .collect();
        let removed = before - next.len();
        *guard = Arc::new(next);
        removed
    }

    /// Replace the whole list at once
    pub fn replace(&self, handlers: Vec<Arc<dyn Handler>>) {
        *self.handlers.write() = Arc::new(handlers);
    }

    pub fn clear(&self) {
        self.replace(Vec::new());
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_list()
            .entries(snapshot.iter().map(|h| h.name().to_string()))
            .finish()
    }
}
