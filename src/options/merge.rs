//! Option resolution (shallow, layered merge).
//!
//! Resolves the effective options for a child from:
//! 1. Parent-wide shared child options
//! 2. Options declared with the child
//! 3. Options passed at the call site
//!
//! Keys pulled from the parent (`get_options`) sit below call-site options.

use serde_json::Value;

use super::Options;

/// Fold option layers from lowest to highest precedence.
///
/// Top-level keys of a later layer replace the same key of an earlier one;
/// nested objects are replaced wholesale, never merged.
pub fn merge_layers<'a, I>(layers: I) -> Options
where
    I: IntoIterator<Item = &'a Options>,
{
    let mut merged = Options::new();
    for layer in layers {
        for (key, value) in layer {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Resolve construction options for a child.
///
/// Precedence: `shared` < `declared` < `call`.
pub fn merge_options(shared: &Options, declared: &Options, call: &Options) -> Options {
    merge_layers([shared, declared, call])
}

/// Copy `keys` out of the owner's current property snapshot.
///
/// Missing keys are kept as `null` so the child still sees the key.
pub fn pull_options(owner: &Options, keys: &[String]) -> Options {
    keys.iter()
        .map(|key| (key.clone(), owner.get(key).cloned().unwrap_or(Value::Null)))
        .collect()
}
