//! Ordered profile change listeners
//!
//! Data listeners (caches that reload per profile) run before regular listeners
//! (views reacting to the reloaded data).

use std::sync::Arc;

use crate::traits::ProfileChangeListener;

fn same_listener(a: &Arc<dyn ProfileChangeListener>, b: &Arc<dyn ProfileChangeListener>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    data: Vec<Arc<dyn ProfileChangeListener>>,
    regular: Vec<Arc<dyn ProfileChangeListener>>,
}

impl ListenerRegistry {
    fn contains(&self, listener: &Arc<dyn ProfileChangeListener>) -> bool {
        self.data
            .iter()
            .chain(&self.regular)
            .any(|registered| same_listener(registered, listener))
    }

    /// Append a regular listener. Returns `false` if it was already registered.
    pub(crate) fn add_regular(&mut self, listener: Arc<dyn ProfileChangeListener>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.regular.push(listener);
        true
    }

    /// Put a data listener in front of every other listener.
    pub(crate) fn add_data(&mut self, listener: Arc<dyn ProfileChangeListener>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.data.insert(0, listener);
        true
    }

    pub(crate) fn remove(&mut self, listener: &Arc<dyn ProfileChangeListener>) -> bool {
        let before = self.len();
        self.data.retain(|registered| !same_listener(registered, listener));
        self.regular
            .retain(|registered| !same_listener(registered, listener));
        before != self.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len() + self.regular.len()
    }

    /// Listeners in notification order.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn ProfileChangeListener>> {
        self.data.iter().chain(&self.regular).cloned().collect()
    }
}
