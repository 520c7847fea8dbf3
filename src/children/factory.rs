//! Child construction.

use std::rc::Rc;

use super::declaration::{AppDeclaration, StartBinding};
use crate::app::AppHandle;
use crate::error::{AppError, Result};
use crate::options::{Options, merge_options};

/// A freshly built child and the start binding taken from its declaration.
#[derive(Debug)]
pub struct BuiltApp {
    pub app: AppHandle,
    pub binding: StartBinding,
}

/// Builds apps from declarations. Never registers them.
pub struct ChildAppFactory;

impl ChildAppFactory {
    /// Build the app a declaration describes.
    ///
    /// `shared` are the parent's child options and `call` the options passed
    /// at the call site; see [`merge_options`] for precedence. An instance is
    /// returned as is.
    pub fn build(declaration: &AppDeclaration, shared: &Options, call: &Options) -> Result<BuiltApp> {
        match declaration {
            AppDeclaration::Class(class) => {
                let options = merge_options(shared, &Options::new(), call);
                Ok(BuiltApp {
                    app: class.instantiate(options)?,
                    binding: StartBinding::default(),
                })
            }
            AppDeclaration::Described(descriptor) => {
                let Some(class) = &descriptor.app_class else {
                    log::warn!("Child app descriptor has no app class");
                    return Err(AppError::Configuration);
                };
                let options = merge_options(shared, &descriptor.options, call);
                Ok(BuiltApp {
                    app: class.instantiate(options)?,
                    binding: descriptor.binding(),
                })
            }
            AppDeclaration::Instance(app) => Ok(BuiltApp {
                app: Rc::clone(app),
                binding: StartBinding::default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppClass;
    use crate::children::AppDescriptor;
    use crate::options::options_from;
    use serde_json::json;

    #[test]
    fn test_build_from_class() {
        let shared = options_from([("my_child_option", json!("bar"))]);
        let built = ChildAppFactory::build(&AppClass::base().into(), &shared, &Options::new()).unwrap();

        assert_eq!(built.app.class_name(), "App");
        assert_eq!(built.app.get_option("my_child_option"), Some(json!("bar")));
        assert_eq!(built.binding, StartBinding::default());
        assert!(built.app.get_name().is_none());
    }

    #[test]
    fn test_build_from_descriptor_merges_declared_options() {
        let shared = options_from([("my_child_option", json!("bar")), ("baz_option", json!(false))]);
        let descriptor = AppDescriptor::new(AppClass::base())
            .option("baz_option", true)
            .region_name("main");

        let built = ChildAppFactory::build(&descriptor.into(), &shared, &Options::new()).unwrap();

        assert_eq!(built.app.get_option("baz_option"), Some(json!(true)));
        assert_eq!(built.app.get_option("my_child_option"), Some(json!("bar")));
        assert_eq!(built.binding.region_name.as_deref(), Some("main"));
    }

    #[test]
    fn test_call_options_win() {
        let descriptor = AppDescriptor::new(AppClass::base()).option("baz_option", true);
        let call = options_from([("baz_option", json!("call"))]);

        let built = ChildAppFactory::build(&descriptor.into(), &Options::new(), &call).unwrap();

        assert_eq!(built.app.get_option("baz_option"), Some(json!("call")));
    }

    #[test]
    fn test_descriptor_without_class_fails() {
        let result = ChildAppFactory::build(&AppDescriptor::default().into(), &Options::new(), &Options::new());
        let err = result.unwrap_err();
        assert!(matches!(err, AppError::Configuration));
        assert_eq!(err.to_string(), "App build failed. Incorrect configuration.");
    }

    #[test]
    fn test_instance_is_passed_through() {
        let app = AppClass::base().instantiate(Options::new()).unwrap();
        let built = ChildAppFactory::build(&Rc::clone(&app).into(), &Options::new(), &Options::new()).unwrap();
        assert!(Rc::ptr_eq(&app, &built.app));
    }
}
