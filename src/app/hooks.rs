//! Lifecycle hooks an app class plugs into the base component.

use super::{App, StartOptions};
use crate::error::Result;
use crate::options::Options;

/// Callbacks invoked by [`App`] at each lifecycle transition.
///
/// Every method has a no-op default, so an implementation only overrides the
/// transitions it cares about. Hooks receive the app they belong to and may
/// call back into it (`merge_options`, `set_property`, child management).
pub trait AppHooks {
    /// Runs once at the end of construction, after declared children were added.
    fn on_initialize(&mut self, _app: &App, _options: &Options) -> Result<()> {
        Ok(())
    }

    fn on_start(&mut self, _app: &App, _options: &StartOptions) -> Result<()> {
        Ok(())
    }

    fn on_stop(&mut self, _app: &App, _options: &Options) -> Result<()> {
        Ok(())
    }

    /// Runs right before destroy listeners fire. Cannot fail.
    fn on_destroy(&mut self, _app: &App) {}
}

/// Hooks for the plain base class.
#[derive(Debug, Default)]
pub struct NoopHooks;

impl AppHooks for NoopHooks {}

/// Hooks that log every transition.
#[derive(Debug, Default)]
pub struct LogHooks;

impl AppHooks for LogHooks {
    fn on_initialize(&mut self, app: &App, options: &Options) -> Result<()> {
        log::info!("{} initialized with {} option(s)", app.label(), options.len());
        Ok(())
    }

    fn on_start(&mut self, app: &App, options: &StartOptions) -> Result<()> {
        log::info!(
            "{} started (region: {:?}, options: {})",
            app.label(),
            options.region.as_ref().map(|r| r.name()),
            serde_json::Value::Object(options.options.clone())
        );
        Ok(())
    }

    fn on_stop(&mut self, app: &App, options: &Options) -> Result<()> {
        log::info!("{} stopped with {} option(s)", app.label(), options.len());
        Ok(())
    }

    fn on_destroy(&mut self, app: &App) {
        log::info!("{} destroyed", app.label());
    }
}
