//! Name → class lookup for tree files.

use std::collections::HashMap;

use crate::app::{AppClass, LogHooks};

/// Classes that tree files may refer to by name.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, AppClass>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in classes:
    /// - `app`: the plain base class
    /// - `logged`: logs every lifecycle hook
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("app", AppClass::base());
        registry.register("logged", AppClass::with_hooks::<LogHooks>("Logged"));
        registry
    }

    /// Register a class, replacing any class already under `name`.
    pub fn register(&mut self, name: impl Into<String>, class: AppClass) {
        let name = name.into();
        if self.classes.insert(name.clone(), class).is_some() {
            log::debug!("Replaced class '{}'", name);
        }
    }

    pub fn resolve(&self, name: &str) -> Option<AppClass> {
        let class = self.classes.get(name).cloned();
        if class.is_none() {
            log::warn!("Unknown app class '{}'", name);
        }
        class
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
