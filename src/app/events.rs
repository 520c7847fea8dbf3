//! Destroy notification.
//!
//! Listeners are one-shot: firing drains the list, so a listener may freely
//! call back into the app (including `off`) while it runs.

use std::cell::{Cell, RefCell};

use super::App;

/// Identifies a registered destroy listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnOnce(&App)>;

#[derive(Default)]
pub(crate) struct DestroyListeners {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
}

impl DestroyListeners {
    pub(crate) fn on(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Returns true if a listener was detached.
    pub(crate) fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Invoke and drop every listener in registration order.
    pub(crate) fn fire(&self, app: &App) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        for (_, listener) in listeners {
            listener(app);
        }
    }
}
