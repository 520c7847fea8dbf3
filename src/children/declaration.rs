//! Child app declarations.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::app::{AppClass, AppHandle};
use crate::options::Options;

/// How a parent describes one child.
#[derive(Debug, Clone)]
pub enum AppDeclaration {
    /// Instantiate this class with the merged options.
    Class(AppClass),
    /// Class plus declared options and start bindings.
    Described(AppDescriptor),
    /// Register an app that already exists.
    Instance(AppHandle),
}

impl From<AppClass> for AppDeclaration {
    fn from(class: AppClass) -> Self {
        AppDeclaration::Class(class)
    }
}

impl From<AppDescriptor> for AppDeclaration {
    fn from(descriptor: AppDescriptor) -> Self {
        AppDeclaration::Described(descriptor)
    }
}

impl From<AppHandle> for AppDeclaration {
    fn from(app: AppHandle) -> Self {
        AppDeclaration::Instance(app)
    }
}

/// Descriptor form of a declaration.
///
/// `options` sit between the parent's shared child options and call-site
/// options. `region_name` and `get_options` are not options: they are kept
/// by the registry and consulted each time the child is started.
#[derive(Debug, Clone, Default)]
pub struct AppDescriptor {
    pub app_class: Option<AppClass>,
    pub options: Options,
    pub region_name: Option<String>,
    pub get_options: Vec<String>,
}

impl AppDescriptor {
    pub fn new(app_class: AppClass) -> Self {
        Self {
            app_class: Some(app_class),
            ..Default::default()
        }
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn options(mut self, options: Options) -> Self {
        self.options.extend(options);
        self
    }

    pub fn region_name(mut self, name: impl Into<String>) -> Self {
        self.region_name = Some(name.into());
        self
    }

    pub fn get_options<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.get_options = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn binding(&self) -> StartBinding {
        StartBinding {
            region_name: self.region_name.clone(),
            get_options: self.get_options.clone(),
        }
    }
}

/// What the registry remembers about a child for start time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartBinding {
    pub region_name: Option<String>,
    pub get_options: Vec<String>,
}

/// Ordered `name → declaration` list.
#[derive(Debug, Clone, Default)]
pub struct AppDeclarations {
    entries: Vec<(String, AppDeclaration)>,
}

impl AppDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, declaration: impl Into<AppDeclaration>) -> Self {
        self.insert(name, declaration);
        self
    }

    /// Append a declaration. Names are not checked here; a repeated name
    /// fails when the declarations are added to a registry.
    pub fn insert(&mut self, name: impl Into<String>, declaration: impl Into<AppDeclaration>) {
        self.entries.push((name.into(), declaration.into()));
    }

    pub fn get(&self, name: &str) -> Option<&AppDeclaration> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, declaration)| declaration)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AppDeclaration)> {
        self.entries.iter().map(|(name, declaration)| (name.as_str(), declaration))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N, D> FromIterator<(N, D)> for AppDeclarations
where
    N: Into<String>,
    D: Into<AppDeclaration>,
{
    fn from_iter<I: IntoIterator<Item = (N, D)>>(iter: I) -> Self {
        let mut declarations = Self::new();
        for (name, declaration) in iter {
            declarations.insert(name, declaration);
        }
        declarations
    }
}

type DeferredDeclarations = Rc<dyn Fn(&Options) -> AppDeclarations>;

/// Where a class gets its child declarations from.
#[derive(Clone)]
pub enum ChildAppsSource {
    Static(AppDeclarations),
    /// Called once per instance with its construction options.
    Deferred(DeferredDeclarations),
}

impl ChildAppsSource {
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn(&Options) -> AppDeclarations + 'static,
    {
        ChildAppsSource::Deferred(Rc::new(f))
    }

    pub(crate) fn resolve(&self, options: &Options) -> AppDeclarations {
        match self {
            ChildAppsSource::Static(declarations) => declarations.clone(),
            ChildAppsSource::Deferred(f) => f(options),
        }
    }
}

impl From<AppDeclarations> for ChildAppsSource {
    fn from(declarations: AppDeclarations) -> Self {
        ChildAppsSource::Static(declarations)
    }
}

impl fmt::Debug for ChildAppsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildAppsSource::Static(declarations) => f.debug_tuple("Static").field(&declarations.names()).finish(),
            ChildAppsSource::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn test_declarations_keep_order() {
        let declarations = AppDeclarations::new()
            .with("cA3", AppClass::base())
            .with("cA1", AppClass::base())
            .with("cA2", AppDescriptor::new(AppClass::base()));
        assert_eq!(declarations.names(), vec!["cA3", "cA1", "cA2"]);
        assert_eq!(declarations.len(), 3);
        assert!(matches!(declarations.get("cA2"), Some(AppDeclaration::Described(_))));
        assert!(declarations.get("cA4").is_none());
    }

    #[test]
    fn test_from_iterator() {
        let declarations: AppDeclarations = [("a", AppClass::base()), ("b", AppClass::base())].into_iter().collect();
        assert_eq!(declarations.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = AppDescriptor::new(AppClass::base())
            .option("baz_option", true)
            .region_name("region")
            .get_options(["foo", "bar"]);

        assert_eq!(descriptor.options["baz_option"], json!(true));
        assert_eq!(
            descriptor.binding(),
            StartBinding {
                region_name: Some("region".to_string()),
                get_options: vec!["foo".to_string(), "bar".to_string()],
            }
        );
    }

    #[test]
    fn test_deferred_source_sees_options() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let source = ChildAppsSource::deferred(move |options| {
            counter.set(counter.get() + 1);
            let mut declarations = AppDeclarations::new().with("always", AppClass::base());
            if options.get("extra") == Some(&json!(true)) {
                declarations.insert("extra", AppClass::base());
            }
            declarations
        });

        let mut options = Options::new();
        assert_eq!(source.resolve(&options).len(), 1);
        options.insert("extra".to_string(), json!(true));
        assert_eq!(source.resolve(&options).len(), 2);
        assert_eq!(calls.get(), 2);
    }
}
