//! App tree configuration.
//!
//! A YAML file describes a root app: its properties, the options it shares
//! with its children, the regions of its view, and the children themselves.
//! Class names in the file are resolved through a [`ClassRegistry`].

use eyre::Result;
use std::path::PathBuf;

pub use self::classes::ClassRegistry;
pub use self::tree::{ChildSpec, DescriptorSpec, TreeConfig};

mod classes;
mod tree;

/// Project-local config file name.
pub const PROJECT_CONFIG: &str = ".apptree.yml";

/// Class name given to the root app built from a tree file.
pub const ROOT_CLASS: &str = "Root";

/// Load configuration from the standard search paths.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. .apptree.yml in current directory (project config)
/// 3. ~/.config/apptree/apptree.yml (user config)
/// 4. Default values
pub fn load_config(explicit_path: Option<&PathBuf>) -> Result<TreeConfig> {
    TreeConfig::load(explicit_path)
}
