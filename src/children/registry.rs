//! Per-parent child registry.
//!
//! Names are unique within one registry. Entries keep insertion order, which
//! is the order children were declared or added in.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::binder::SelfRemovalBinder;
use super::declaration::{AppDeclaration, AppDeclarations, StartBinding};
use super::factory::{BuiltApp, ChildAppFactory};
use crate::app::{App, AppHandle, ListenerId};
use crate::error::{AppError, Result};
use crate::options::Options;

/// Ordered snapshot of registered children.
pub type ChildApps = Vec<(String, AppHandle)>;

struct ChildEntry {
    name: String,
    app: AppHandle,
    binding: StartBinding,
    listener: ListenerId,
}

/// Storage shared with the destroy listeners of registered children.
#[derive(Default)]
pub(crate) struct Slots {
    entries: Vec<ChildEntry>,
}

impl Slots {
    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    fn take(&mut self, name: &str) -> Option<ChildEntry> {
        let index = self.position(name)?;
        Some(self.entries.remove(index))
    }

    /// Take the entry for `name` only if it still holds `app`.
    pub(crate) fn take_instance(&mut self, name: &str, app: &App) -> Option<AppHandle> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.name == name && std::ptr::eq(Rc::as_ptr(&entry.app), app))?;
        Some(self.entries.remove(index).app)
    }
}

/// Name → child mapping owned by one parent app.
#[derive(Default)]
pub struct ChildAppRegistry {
    slots: Rc<RefCell<Slots>>,
}

impl ChildAppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail if `name` is already registered.
    pub fn ensure_unique(&self, name: &str) -> Result<()> {
        if self.contains(name) {
            return Err(AppError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Build (unless given an instance) and register a child.
    ///
    /// Uniqueness is checked before the declaration is built, so a duplicate
    /// never runs a constructor. An instance that is already registered, here
    /// or with another parent, is rejected. The child is tagged with `name`
    /// and removes itself from this registry when destroyed.
    pub fn add(&self, name: &str, declaration: &AppDeclaration, shared: &Options, call: &Options) -> Result<AppHandle> {
        self.ensure_unique(name)?;
        let BuiltApp { app, binding } = ChildAppFactory::build(declaration, shared, call)?;
        if let Some(existing) = app.get_name() {
            log::warn!("Refusing to add '{}': app is already registered as '{}'", name, existing);
            return Err(AppError::AlreadyRegistered(existing));
        }

        app.set_name(name);
        let listener = SelfRemovalBinder::bind(self.downgrade(), &app);
        self.slots.borrow_mut().entries.push(ChildEntry {
            name: name.to_string(),
            app: Rc::clone(&app),
            binding,
            listener,
        });

        log::debug!("Added child app '{}' ({})", name, app.class_name());
        Ok(app)
    }

    /// Add every declaration in order, stopping at the first failure.
    pub fn add_many(&self, declarations: &AppDeclarations, shared: &Options, call: &Options) -> Result<()> {
        for (name, declaration) in declarations.iter() {
            self.add(name, declaration, shared, call)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<AppHandle> {
        let slots = self.slots.borrow();
        slots
            .position(name)
            .map(|index| Rc::clone(&slots.entries[index].app))
    }

    /// Snapshot of all children in registration order.
    pub fn get_all(&self) -> ChildApps {
        self.slots
            .borrow()
            .entries
            .iter()
            .map(|entry| (entry.name.clone(), Rc::clone(&entry.app)))
            .collect()
    }

    pub fn binding(&self, name: &str) -> Option<StartBinding> {
        let slots = self.slots.borrow();
        slots.position(name).map(|index| slots.entries[index].binding.clone())
    }

    /// Detach a child. The child is not destroyed; its name is cleared and
    /// destroying it later no longer touches this registry.
    pub fn remove(&self, name: &str) -> Option<AppHandle> {
        let entry = self.slots.borrow_mut().take(name)?;
        SelfRemovalBinder::unbind(&entry.app, entry.listener);
        entry.app.clear_name();
        log::debug!("Removed child app '{}'", name);
        Some(entry.app)
    }

    pub fn remove_all(&self) {
        for name in self.names() {
            self.remove(&name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.borrow().position(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.slots
            .borrow()
            .entries
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().entries.is_empty()
    }

    fn downgrade(&self) -> Weak<RefCell<Slots>> {
        Rc::downgrade(&self.slots)
    }
}
