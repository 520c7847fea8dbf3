//! Tree file format.
//!
//! Loaded from .apptree.yml or ~/.config/apptree/apptree.yml

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ClassRegistry, PROJECT_CONFIG, ROOT_CLASS};
use crate::app::{AppClass, AppHandle, CHILD_APP_OPTIONS, View};
use crate::children::{AppDeclarations, AppDescriptor};
use crate::options::Options;

/// A root app and its children as described in YAML.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Properties of the root app, readable by children through `get_options`.
    pub properties: Options,

    /// Options shared with every child at construction.
    pub child_app_options: Options,

    /// Region name → selector for the root app's view.
    pub regions: HashMap<String, String>,

    /// Child name → child spec, in declaration order.
    pub children: serde_yaml::Mapping,
}

/// One entry under `children`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ChildSpec {
    /// Bare class name.
    Class(String),
    Descriptor(DescriptorSpec),
}

/// Descriptor form of a child. Keys other than the known ones are the
/// child's declared options.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DescriptorSpec {
    #[serde(default)]
    pub class: Option<String>,

    #[serde(default)]
    pub region_name: Option<String>,

    #[serde(default)]
    pub get_options: Vec<String>,

    #[serde(flatten)]
    pub options: Options,
}

impl TreeConfig {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .apptree.yml in current directory
    /// 3. ~/.config/apptree/apptree.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let project_config = PathBuf::from(PROJECT_CONFIG);
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from {}", PROJECT_CONFIG);
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load {}: {}", PROJECT_CONFIG, e);
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("apptree").join("apptree.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("Failed to parse config file")?;
        config.child_specs()?;
        Ok(config)
    }

    /// Child specs in declaration order.
    pub fn child_specs(&self) -> Result<Vec<(String, ChildSpec)>> {
        self.children
            .iter()
            .map(|(key, value)| {
                let Some(name) = key.as_str() else {
                    eyre::bail!("Child names must be strings, got {:?}", key);
                };
                let spec: ChildSpec = serde_yaml::from_value(value.clone())
                    .with_context(|| format!("Invalid child spec for '{}'", name))?;
                Ok((name.to_string(), spec))
            })
            .collect()
    }

    /// Resolve the child specs into declarations.
    ///
    /// A class name the registry does not know becomes a descriptor without a
    /// class, which fails when the root app is built.
    pub fn declarations(&self, classes: &ClassRegistry) -> Result<AppDeclarations> {
        let mut declarations = AppDeclarations::new();
        for (name, spec) in self.child_specs()? {
            match spec {
                ChildSpec::Class(class) => match classes.resolve(&class) {
                    Some(class) => declarations.insert(name, class),
                    None => declarations.insert(name, AppDescriptor::default()),
                },
                ChildSpec::Descriptor(spec) => {
                    let descriptor = AppDescriptor {
                        app_class: spec.class.as_deref().and_then(|class| classes.resolve(class)),
                        options: spec.options,
                        region_name: spec.region_name,
                        get_options: spec.get_options,
                    };
                    declarations.insert(name, descriptor);
                }
            }
        }
        Ok(declarations)
    }

    /// The root app's view, one region per configured selector.
    pub fn view(&self) -> View {
        self.regions
            .iter()
            .fold(View::new(), |view, (name, selector)| view.with_region(name.clone(), selector.clone()))
    }

    /// Build the root app with all of its children.
    pub fn build_root(&self, classes: &ClassRegistry) -> Result<AppHandle> {
        let class = self
            .properties
            .iter()
            .fold(AppClass::base().extend(ROOT_CLASS), |class, (key, value)| {
                class.property(key.clone(), value.clone())
            })
            .child_apps(self.declarations(classes)?);

        let mut options = Options::new();
        if !self.child_app_options.is_empty() {
            options.insert(CHILD_APP_OPTIONS.to_string(), Value::Object(self.child_app_options.clone()));
        }

        let root = class.instantiate(options).context("Failed to build app tree")?;
        root.set_view(self.view());
        log::info!("Built app tree with {} children", root.get_child_apps().len());
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::RegionHost;
    use serde_json::json;

    const TREE: &str = r##"
properties:
  foo: 1
child_app_options:
  my_child_option: bar
regions:
  main: "#main"
children:
  second: app
  first:
    class: logged
    region_name: main
    get_options: [foo]
    baz_option: true
"##;

    #[test]
    fn test_default_config() {
        let config = TreeConfig::default();
        assert!(config.properties.is_empty());
        assert!(config.children.is_empty());
        assert!(config.child_specs().unwrap().is_empty());
    }

    #[test]
    fn test_parse_yaml() {
        let config = TreeConfig::parse(TREE).unwrap();
        assert_eq!(config.properties["foo"], json!(1));
        assert_eq!(config.child_app_options["my_child_option"], json!("bar"));
        assert_eq!(config.regions["main"], "#main");

        let specs = config.child_specs().unwrap();
        assert_eq!(specs[0], ("second".to_string(), ChildSpec::Class("app".to_string())));
        match &specs[1] {
            (name, ChildSpec::Descriptor(spec)) => {
                assert_eq!(name, "first");
                assert_eq!(spec.class.as_deref(), Some("logged"));
                assert_eq!(spec.region_name.as_deref(), Some("main"));
                assert_eq!(spec.get_options, vec!["foo".to_string()]);
                assert_eq!(spec.options["baz_option"], json!(true));
                assert!(!spec.options.contains_key("class"));
            }
            other => panic!("Expected descriptor, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_child_spec() {
        let yaml = "children:\n  broken: [1, 2]\n";
        assert!(TreeConfig::parse(yaml).is_err());
    }

    #[test]
    fn test_build_root() {
        let config = TreeConfig::parse(TREE).unwrap();
        let root = config.build_root(&ClassRegistry::with_builtins()).unwrap();

        assert_eq!(root.class_name(), ROOT_CLASS);
        assert_eq!(root.property("foo"), Some(json!(1)));
        assert!(root.get_region("main").is_some());

        let names: Vec<String> = root.get_child_apps().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["second", "first"]);

        let first = root.get_child_app("first").unwrap();
        assert_eq!(first.class_name(), "Logged");
        assert_eq!(first.get_option("my_child_option"), Some(json!("bar")));
        assert_eq!(first.get_option("baz_option"), Some(json!(true)));
    }

    #[test]
    fn test_unknown_class_declares_classless_descriptor() {
        let config = TreeConfig::parse("children:\n  odd: widget\n").unwrap();
        let declarations = config.declarations(&ClassRegistry::with_builtins()).unwrap();
        assert_eq!(declarations.names(), vec!["odd"]);
        assert!(config.build_root(&ClassRegistry::with_builtins()).is_err());
    }
}
