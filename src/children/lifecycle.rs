//! Start and stop children by name.

use crate::app::{App, AppHandle, RegionHost, START_WITH_PARENT, STOP_WITH_PARENT, StartOptions};
use crate::error::Result;
use crate::options::{Options, merge_layers, pull_options};

/// Lifecycle controller over one parent's children.
///
/// Unknown names are not errors: `start` and `stop` return `Ok(None)`.
pub struct ChildLifecycle<'a> {
    parent: &'a App,
}

impl<'a> ChildLifecycle<'a> {
    pub fn new(parent: &'a App) -> Self {
        Self { parent }
    }

    /// Effective start options for a registered child.
    ///
    /// Keys listed in the child's `get_options` are read from the parent's
    /// current properties, then `call` is layered on top. The region is the
    /// parent's current region for the child's `region_name`, or `None`.
    pub fn start_options(&self, name: &str, call: &Options) -> Option<StartOptions> {
        let binding = self.parent.child_app_registry().binding(name)?;
        let pulled = pull_options(&self.parent.properties(), &binding.get_options);
        let region = binding
            .region_name
            .as_deref()
            .and_then(|region_name| self.parent.get_region(region_name));

        Some(StartOptions {
            options: merge_layers([&pulled, call]),
            region,
        })
    }

    /// Start the named child and return it.
    pub fn start(&self, name: &str, call: &Options) -> Result<Option<AppHandle>> {
        let Some(child) = self.parent.get_child_app(name) else {
            log::debug!("No child app '{}' to start", name);
            return Ok(None);
        };
        let options = self.start_options(name, call).unwrap_or_default();
        child.start(options)?;
        Ok(Some(child))
    }

    /// Stop the named child with `options` as given, and return it.
    pub fn stop(&self, name: &str, options: &Options) -> Result<Option<AppHandle>> {
        let Some(child) = self.parent.get_child_app(name) else {
            log::debug!("No child app '{}' to stop", name);
            return Ok(None);
        };
        child.stop(options)?;
        Ok(Some(child))
    }

    /// Start every child that sets `start_with_parent`.
    pub fn start_with_parent(&self) -> Result<()> {
        for (name, child) in self.parent.get_child_apps() {
            if child.option_flag(START_WITH_PARENT, false) {
                self.start(&name, &Options::new())?;
            }
        }
        Ok(())
    }

    /// Stop every running child unless it sets `stop_with_parent` to false.
    pub fn stop_with_parent(&self) -> Result<()> {
        for (name, child) in self.parent.get_child_apps() {
            if child.is_running() && child.option_flag(STOP_WITH_PARENT, true) {
                self.stop(&name, &Options::new())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppClass, View};
    use crate::children::{AppDeclarations, AppDescriptor};
    use crate::options::options_from;
    use serde_json::{Value, json};

    fn parent_with(declarations: AppDeclarations) -> AppHandle {
        AppClass::base()
            .child_apps(declarations)
            .instantiate(Options::new())
            .unwrap()
    }

    #[test]
    fn test_start_options_without_binding_have_no_region() {
        let parent = parent_with(AppDeclarations::new().with("cA1", AppClass::base()));
        let options = parent
            .lifecycle()
            .start_options("cA1", &options_from([("x", json!(1))]))
            .unwrap();
        assert_eq!(options.options, options_from([("x", json!(1))]));
        assert!(options.region.is_none());
    }

    #[test]
    fn test_start_options_pull_parent_properties() {
        let parent = parent_with(
            AppDeclarations::new().with("cA5", AppDescriptor::new(AppClass::base()).get_options(["foo", "bar", "ghost"])),
        );
        parent.set_property("foo", "foo");
        parent.set_property("bar", "bar");

        let options = parent
            .lifecycle()
            .start_options("cA5", &options_from([("bar", json!("bar2")), ("baz", json!("baz"))]))
            .unwrap();

        assert_eq!(options.get("foo"), Some(&json!("foo")));
        assert_eq!(options.get("bar"), Some(&json!("bar2")));
        assert_eq!(options.get("baz"), Some(&json!("baz")));
        assert_eq!(options.get("ghost"), Some(&Value::Null));
        assert!(options.region.is_none());
    }

    #[test]
    fn test_start_options_resolve_region_at_call_time() {
        let parent = parent_with(
            AppDeclarations::new().with("cA4", AppDescriptor::new(AppClass::base()).region_name("region")),
        );
        let lifecycle = parent.lifecycle();
        assert!(lifecycle.start_options("cA4", &Options::new()).unwrap().region.is_none());

        parent.set_view(View::new().with_region("region", "#region"));
        let region = lifecycle.start_options("cA4", &Options::new()).unwrap().region;
        assert_eq!(region, parent.get_region("region"));
        assert!(region.is_some());
    }

    #[test]
    fn test_start_and_stop_unknown_child() {
        let parent = parent_with(AppDeclarations::new());
        assert!(parent.lifecycle().start("nope", &Options::new()).unwrap().is_none());
        assert!(parent.lifecycle().stop("nope", &Options::new()).unwrap().is_none());
    }

    #[test]
    fn test_start_returns_running_child() {
        let parent = parent_with(AppDeclarations::new().with("cA1", AppClass::base()));
        let child = parent.lifecycle().start("cA1", &Options::new()).unwrap().unwrap();
        assert!(child.is_running());
        assert_eq!(child.get_name().as_deref(), Some("cA1"));

        let stopped = parent.lifecycle().stop("cA1", &Options::new()).unwrap().unwrap();
        assert!(!stopped.is_running());
    }

    #[test]
    fn test_parent_start_cascades() {
        let eager = AppClass::base().extend("Eager").property(START_WITH_PARENT, true);
        let parent = parent_with(
            AppDeclarations::new()
                .with("eager", eager)
                .with("lazy", AppClass::base()),
        );

        parent.start(StartOptions::default()).unwrap();

        assert!(parent.get_child_app("eager").unwrap().is_running());
        assert!(!parent.get_child_app("lazy").unwrap().is_running());
    }

    #[test]
    fn test_parent_stop_cascades_unless_opted_out() {
        let sticky = AppDescriptor::new(AppClass::base()).option(STOP_WITH_PARENT, false);
        let parent = parent_with(
            AppDeclarations::new()
                .with("plain", AppClass::base())
                .with("sticky", sticky),
        );
        parent.start(StartOptions::default()).unwrap();
        parent.start_child_app("plain", None).unwrap();
        parent.start_child_app("sticky", None).unwrap();

        parent.stop(&Options::new()).unwrap();

        assert!(!parent.get_child_app("plain").unwrap().is_running());
        assert!(parent.get_child_app("sticky").unwrap().is_running());
    }

    #[test]
    fn test_child_added_to_running_parent_starts_with_it() {
        let parent = parent_with(AppDeclarations::new());
        parent.start(StartOptions::default()).unwrap();

        let eager = AppDescriptor::new(AppClass::base()).option(START_WITH_PARENT, true);
        let child = parent.add_child_app("late", eager, None).unwrap();
        let idle = parent.add_child_app("idle", AppClass::base(), None).unwrap();

        assert!(child.is_running());
        assert!(!idle.is_running());
    }
}
