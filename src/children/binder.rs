//! Self-removal of destroyed children.
//!
//! The listener only holds a `Weak` to the registry storage, so a child never
//! keeps its parent's registry alive.

use std::cell::RefCell;
use std::rc::Weak;

use super::registry::Slots;
use crate::app::{App, ListenerId};

/// Ties a child's destroy event to its removal from the parent registry.
pub struct SelfRemovalBinder;

impl SelfRemovalBinder {
    /// Attach the listener. On destroy it removes the child under its current
    /// name, if that slot still holds this child, and clears the name.
    pub(crate) fn bind(slots: Weak<RefCell<Slots>>, app: &App) -> ListenerId {
        app.on_destroy(move |app| {
            let Some(slots) = slots.upgrade() else {
                return;
            };
            let Some(name) = app.get_name() else {
                return;
            };
            let removed = slots.borrow_mut().take_instance(&name, app);
            if removed.is_some() {
                app.clear_name();
                log::debug!("Child app '{}' destroyed, removed from parent", name);
            }
        })
    }

    /// Detach the listener so a later destroy leaves the registry alone.
    pub fn unbind(app: &App, listener: ListenerId) -> bool {
        app.off_destroy(listener)
    }
}

#[cfg(test)]
mod tests {
    use crate::app::AppClass;
    use crate::children::ChildAppRegistry;
    use crate::options::Options;
    use std::rc::Rc;

    fn registry_with(names: &[&str]) -> ChildAppRegistry {
        let registry = ChildAppRegistry::new();
        for name in names {
            registry
                .add(name, &AppClass::base().into(), &Options::new(), &Options::new())
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_destroy_removes_child() {
        let registry = registry_with(&["foo", "bar"]);
        let foo = registry.get("foo").unwrap();

        foo.destroy();

        assert!(registry.get("foo").is_none());
        assert!(foo.get_name().is_none());
        assert_eq!(registry.names(), vec!["bar"]);
    }

    #[test]
    fn test_destroy_after_remove_is_noop() {
        let registry = registry_with(&["cA1"]);
        let old = registry.remove("cA1").unwrap();
        let replacement = registry
            .add("cA1", &AppClass::base().into(), &Options::new(), &Options::new())
            .unwrap();

        old.destroy();

        let current = registry.get("cA1").unwrap();
        assert!(Rc::ptr_eq(&current, &replacement));
        assert_eq!(replacement.get_name().as_deref(), Some("cA1"));
    }

    #[test]
    fn test_destroy_after_registry_dropped() {
        let registry = registry_with(&["orphan"]);
        let orphan = registry.get("orphan").unwrap();
        drop(registry);

        orphan.destroy();

        assert!(orphan.is_destroyed());
    }
}
