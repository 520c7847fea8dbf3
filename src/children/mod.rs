//! Child apps: declaration, construction, registration and lifecycle.
//!
//! - **declaration**: what a parent says about a child (class, descriptor or instance)
//! - **factory**: turns a declaration into a live app
//! - **registry**: the per-parent name → child mapping
//! - **lifecycle**: start/stop children by name
//! - **binder**: deregisters a child when it is destroyed

mod binder;
mod declaration;
mod factory;
mod lifecycle;
mod registry;

pub use binder::SelfRemovalBinder;
pub use declaration::{AppDeclaration, AppDeclarations, AppDescriptor, ChildAppsSource, StartBinding};
pub use factory::{BuiltApp, ChildAppFactory};
pub use lifecycle::ChildLifecycle;
pub use registry::{ChildAppRegistry, ChildApps};
