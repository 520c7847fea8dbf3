//! apptree - parent/child application registry
//!
//! Apps declare child apps by name. Children are built with layered options,
//! started and stopped through their parent, optionally bound to one of the
//! parent's regions, and removed from the parent automatically when destroyed.

pub mod app;
pub mod children;
pub mod config;
pub mod error;
pub mod options;

pub use app::{App, AppClass, AppHandle, AppHooks, StartOptions};
pub use children::{AppDeclaration, AppDeclarations, AppDescriptor, ChildAppsSource};
pub use error::{AppError, Result};
pub use options::Options;
