//! The base application component.
//!
//! An [`App`] carries options, properties, a running flag and a destroy
//! notification, and it owns a [`ChildAppRegistry`] for the children it
//! declares or adds at runtime. Behaviour specific to an app class lives in
//! its [`AppHooks`].
//!
//! Apps are single-threaded and shared through [`AppHandle`] (`Rc<App>`).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::children::{
    AppDeclaration, AppDeclarations, ChildAppFactory, ChildAppRegistry, ChildApps, ChildAppsSource, ChildLifecycle,
};
use crate::error::Result;
use crate::options::Options;

mod events;
mod hooks;
mod region;

pub use self::events::ListenerId;
pub use self::hooks::{AppHooks, LogHooks, NoopHooks};
pub use self::region::{Region, RegionHost, View};

use self::events::DestroyListeners;

/// Option holding the options shared with every child of an app.
pub const CHILD_APP_OPTIONS: &str = "child_app_options";

/// Start the child whenever its parent starts, or when added to a running parent.
pub const START_WITH_PARENT: &str = "start_with_parent";

/// Stop the child when its parent stops. Defaults to true.
pub const STOP_WITH_PARENT: &str = "stop_with_parent";

/// Keep the child alive when its parent is destroyed.
pub const PREVENT_DESTROY: &str = "prevent_destroy";

/// Start the app as the last step of construction.
pub const START_AFTER_INITIALIZED: &str = "start_after_initialized";

/// Shared handle to an app.
pub type AppHandle = Rc<App>;

/// Options handed to [`App::start`].
///
/// `region` is always part of the start options; `None` means the parent had
/// no such region when the child was started.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartOptions {
    pub options: Options,
    pub region: Option<Region>,
}

impl StartOptions {
    pub fn new(options: Options) -> Self {
        Self { options, region: None }
    }

    pub fn with_region(mut self, region: Option<Region>) -> Self {
        self.region = region;
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}

impl From<Options> for StartOptions {
    fn from(options: Options) -> Self {
        Self::new(options)
    }
}

type HooksFactory = Rc<dyn Fn() -> Box<dyn AppHooks>>;

/// Constructor reference for apps.
///
/// A class names the kind of app, carries class-level properties (read by
/// [`App::get_option`] when an option is not set), may declare child apps, and
/// produces fresh hooks for every instance.
#[derive(Clone)]
pub struct AppClass {
    name: Rc<str>,
    properties: Options,
    child_apps: Option<ChildAppsSource>,
    hooks: HooksFactory,
}

impl AppClass {
    /// The plain base class.
    pub fn base() -> Self {
        Self::with_hooks::<NoopHooks>("App")
    }

    pub fn new<F>(name: impl Into<String>, hooks: F) -> Self
    where
        F: Fn() -> Box<dyn AppHooks> + 'static,
    {
        Self {
            name: Rc::from(name.into()),
            properties: Options::new(),
            child_apps: None,
            hooks: Rc::new(hooks),
        }
    }

    /// Class whose instances get `H::default()` as hooks.
    pub fn with_hooks<H>(name: impl Into<String>) -> Self
    where
        H: AppHooks + Default + 'static,
    {
        Self::new(name, || Box::new(H::default()))
    }

    /// Derive a new class that keeps this one's properties, children and hooks.
    pub fn extend(&self, name: impl Into<String>) -> Self {
        Self {
            name: Rc::from(name.into()),
            ..self.clone()
        }
    }

    /// Set a class-level property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Declare the children every instance is built with.
    pub fn child_apps(mut self, source: impl Into<ChildAppsSource>) -> Self {
        self.child_apps = Some(source.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declares_child_apps(&self) -> bool {
        self.child_apps.is_some()
    }

    /// Construct an instance.
    ///
    /// Declared children are evaluated once, with `options`, and added before
    /// `on_initialize` runs. If the `start_after_initialized` option is set the
    /// app is started with `options` as the last step.
    pub fn instantiate(&self, options: Options) -> Result<AppHandle> {
        let app = Rc::new(App {
            class_name: Rc::clone(&self.name),
            options: RefCell::new(options.clone()),
            properties: RefCell::new(self.properties.clone()),
            name: RefCell::new(None),
            running: Cell::new(false),
            destroyed: Cell::new(false),
            region: RefCell::new(None),
            view: RefCell::new(None),
            hooks: RefCell::new(Some((self.hooks)())),
            destroy_listeners: DestroyListeners::default(),
            declared_child_apps: RefCell::new(None),
            child_apps: ChildAppRegistry::new(),
        });
        log::debug!("Constructing {}", app.label());

        if let Some(source) = &self.child_apps {
            let declarations = source.resolve(&options);
            *app.declared_child_apps.borrow_mut() = Some(declarations.clone());
            app.add_child_apps(&declarations, None)?;
        }

        app.with_hooks(|hooks| hooks.on_initialize(&app, &options))
            .unwrap_or(Ok(()))?;

        if app.option_flag(START_AFTER_INITIALIZED, false) {
            app.start(StartOptions::new(options))?;
        }

        Ok(app)
    }
}

impl fmt::Debug for AppClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppClass")
            .field("name", &self.name)
            .field("properties", &self.properties)
            .field("child_apps", &self.child_apps)
            .finish_non_exhaustive()
    }
}

/// A live application instance.
pub struct App {
    class_name: Rc<str>,
    options: RefCell<Options>,
    properties: RefCell<Options>,
    name: RefCell<Option<String>>,
    running: Cell<bool>,
    destroyed: Cell<bool>,
    region: RefCell<Option<Region>>,
    view: RefCell<Option<View>>,
    hooks: RefCell<Option<Box<dyn AppHooks>>>,
    destroy_listeners: DestroyListeners,
    declared_child_apps: RefCell<Option<AppDeclarations>>,
    child_apps: ChildAppRegistry,
}

impl App {
    //=== Identity ===

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Name under which this app is registered with its parent.
    ///
    /// `None` for root apps and for children that were removed.
    pub fn get_name(&self) -> Option<String> {
        self.name.borrow().clone()
    }

    pub(crate) fn set_name(&self, name: &str) {
        *self.name.borrow_mut() = Some(name.to_string());
    }

    pub(crate) fn clear_name(&self) {
        self.name.borrow_mut().take();
    }

    /// Human-readable label for logs: `Class` or `Class(name)`.
    pub fn label(&self) -> String {
        match self.name.borrow().as_deref() {
            Some(name) => format!("{}({})", self.class_name, name),
            None => self.class_name.to_string(),
        }
    }

    //=== Options and properties ===

    /// Look up an option, falling back to the property of the same key.
    pub fn get_option(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.options.borrow().get(key) {
            return Some(value.clone());
        }
        self.properties.borrow().get(key).cloned()
    }

    /// Read a boolean option, `default` when unset or not a bool.
    pub fn option_flag(&self, key: &str, default: bool) -> bool {
        match self.get_option(key) {
            Some(Value::Bool(value)) => value,
            _ => default,
        }
    }

    pub fn options(&self) -> Options {
        self.options.borrow().clone()
    }

    /// Copy the listed keys that are present in `options` onto this app's properties.
    pub fn merge_options(&self, options: &Options, keys: &[&str]) {
        let mut properties = self.properties.borrow_mut();
        for key in keys {
            if let Some(value) = options.get(*key) {
                properties.insert((*key).to_string(), value.clone());
            }
        }
    }

    pub fn property(&self, key: &str) -> Option<Value> {
        self.properties.borrow().get(key).cloned()
    }

    pub fn set_property(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.borrow_mut().insert(key.into(), value.into());
    }

    /// Snapshot of the current properties.
    pub fn properties(&self) -> Options {
        self.properties.borrow().clone()
    }

    /// Options shared with every child, taken from the `child_app_options` option.
    pub fn child_app_options(&self) -> Options {
        match self.get_option(CHILD_APP_OPTIONS) {
            Some(Value::Object(options)) => options,
            _ => Options::new(),
        }
    }

    //=== Regions ===

    pub fn set_view(&self, view: View) {
        *self.view.borrow_mut() = Some(view);
    }

    /// Region the app was bound to on its last start.
    pub fn region(&self) -> Option<Region> {
        self.region.borrow().clone()
    }

    //=== Lifecycle ===

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Start the app. A running or destroyed app ignores the call.
    ///
    /// If a child started with this app or the `on_start` hook fails, the app
    /// is left stopped and the error is returned.
    pub fn start(&self, options: StartOptions) -> Result<()> {
        if self.destroyed.get() {
            log::warn!("Ignoring start of destroyed {}", self.label());
            return Ok(());
        }
        if self.running.get() {
            log::debug!("{} is already running", self.label());
            return Ok(());
        }

        log::info!("Starting {}", self.label());
        *self.region.borrow_mut() = options.region.clone();
        self.running.set(true);

        let result = self.lifecycle().start_with_parent().and_then(|()| {
            self.with_hooks(|hooks| hooks.on_start(self, &options))
                .unwrap_or(Ok(()))
        });
        if let Err(e) = &result {
            self.running.set(false);
            log::warn!("Failed to start {}: {}", self.label(), e);
        }
        result
    }

    /// Stop the app. A stopped app ignores the call.
    pub fn stop(&self, options: &Options) -> Result<()> {
        if !self.running.get() {
            log::debug!("{} is not running", self.label());
            return Ok(());
        }

        log::info!("Stopping {}", self.label());
        self.lifecycle().stop_with_parent()?;
        self.running.set(false);

        self.with_hooks(|hooks| hooks.on_stop(self, options))
            .unwrap_or(Ok(()))
    }

    /// Destroy the app.
    ///
    /// Stops it if running, destroys children that do not set
    /// `prevent_destroy`, detaches the rest, then fires destroy listeners.
    /// Destroying twice is a no-op.
    pub fn destroy(&self) {
        if self.destroyed.get() {
            return;
        }
        self.destroyed.set(true);
        let label = self.label();

        if self.running.get() {
            if let Err(e) = self.stop(&Options::new()) {
                log::warn!("Failed to stop {} while destroying: {}", label, e);
            }
        }

        self.destroy_child_apps();
        self.with_hooks(|hooks| hooks.on_destroy(self));

        log::info!("Destroyed {}", label);
        self.destroy_listeners.fire(self);
    }

    fn destroy_child_apps(&self) {
        for (name, child) in self.child_apps.get_all() {
            if child.option_flag(PREVENT_DESTROY, false) {
                log::debug!("Keeping child app '{}' alive past its parent", name);
                continue;
            }
            child.destroy();
        }
        self.child_apps.remove_all();
    }

    /// Register a one-shot listener for this app's destruction.
    pub fn on_destroy(&self, listener: impl FnOnce(&App) + 'static) -> ListenerId {
        self.destroy_listeners.on(Box::new(listener))
    }

    /// Detach a destroy listener. Returns false if it was not attached.
    pub fn off_destroy(&self, id: ListenerId) -> bool {
        self.destroy_listeners.off(id)
    }

    pub fn destroy_listener_count(&self) -> usize {
        self.destroy_listeners.len()
    }

    /// Run `f` against the hooks. Returns `None` when the hooks are already
    /// in use further up the stack.
    fn with_hooks<R>(&self, f: impl FnOnce(&mut dyn AppHooks) -> R) -> Option<R> {
        let taken = self.hooks.borrow_mut().take();
        let Some(mut hooks) = taken else {
            log::warn!("{} hooks re-entered, skipping lifecycle hook", self.label());
            return None;
        };
        let result = f(hooks.as_mut());
        *self.hooks.borrow_mut() = Some(hooks);
        Some(result)
    }

    //=== Children ===

    pub fn child_app_registry(&self) -> &ChildAppRegistry {
        &self.child_apps
    }

    /// Start/stop controller for this app's children.
    pub fn lifecycle(&self) -> ChildLifecycle<'_> {
        ChildLifecycle::new(self)
    }

    /// Children this app's class declared, as evaluated at construction.
    pub fn declared_child_apps(&self) -> Option<AppDeclarations> {
        self.declared_child_apps.borrow().clone()
    }

    /// Build an app with this app's shared child options, without registering it.
    pub fn build_app(&self, declaration: impl Into<AppDeclaration>, options: Option<&Options>) -> Result<AppHandle> {
        let call = options.cloned().unwrap_or_default();
        let built = ChildAppFactory::build(&declaration.into(), &self.child_app_options(), &call)?;
        Ok(built.app)
    }

    /// Build and register a child under `name`.
    ///
    /// When this app is running and the child sets `start_with_parent`, the
    /// child is started right away.
    pub fn add_child_app(
        &self,
        name: &str,
        declaration: impl Into<AppDeclaration>,
        options: Option<&Options>,
    ) -> Result<AppHandle> {
        let call = options.cloned().unwrap_or_default();
        self.register_child_app(name, &declaration.into(), &call)
    }

    /// Add every declaration in order. Stops at the first failure; children
    /// added before it stay registered. Only the children added here are
    /// started, never their siblings.
    pub fn add_child_apps(&self, declarations: &AppDeclarations, options: Option<&Options>) -> Result<()> {
        let call = options.cloned().unwrap_or_default();
        for (name, declaration) in declarations.iter() {
            self.register_child_app(name, declaration, &call)?;
        }
        Ok(())
    }

    fn register_child_app(&self, name: &str, declaration: &AppDeclaration, call: &Options) -> Result<AppHandle> {
        let child = self
            .child_apps
            .add(name, declaration, &self.child_app_options(), call)?;

        if self.is_running() && child.option_flag(START_WITH_PARENT, false) {
            self.lifecycle().start(name, &Options::new())?;
        }
        Ok(child)
    }

    pub fn get_child_app(&self, name: &str) -> Option<AppHandle> {
        self.child_apps.get(name)
    }

    pub fn get_child_apps(&self) -> ChildApps {
        self.child_apps.get_all()
    }

    pub fn remove_child_app(&self, name: &str) -> Option<AppHandle> {
        self.child_apps.remove(name)
    }

    pub fn remove_child_apps(&self) {
        self.child_apps.remove_all();
    }

    pub fn start_child_app(&self, name: &str, options: Option<&Options>) -> Result<Option<AppHandle>> {
        let call = options.cloned().unwrap_or_default();
        self.lifecycle().start(name, &call)
    }

    pub fn stop_child_app(&self, name: &str, options: Option<&Options>) -> Result<Option<AppHandle>> {
        let call = options.cloned().unwrap_or_default();
        self.lifecycle().stop(name, &call)
    }
}

impl RegionHost for App {
    fn get_region(&self, name: &str) -> Option<Region> {
        self.view.borrow().as_ref().and_then(|view| view.get_region(name))
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("class", &self.class_name)
            .field("name", &self.name.borrow())
            .field("running", &self.running.get())
            .field("destroyed", &self.destroyed.get())
            .field("children", &self.child_apps.names())
            .finish_non_exhaustive()
    }
}
