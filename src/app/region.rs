//! Regions and the view that hosts them.
//!
//! Rendering is out of scope: a region is only a named handle that a parent
//! looks up and hands to a child. Two `Region` values are equal when they are
//! the same handle.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Named placeholder a child app may be bound to.
#[derive(Clone)]
pub struct Region {
    inner: Rc<RegionInner>,
}

struct RegionInner {
    name: String,
    selector: String,
}

impl Region {
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RegionInner {
                name: name.into(),
                selector: selector.into(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn selector(&self) -> &str {
        &self.inner.selector
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Region {}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("name", &self.inner.name)
            .field("selector", &self.inner.selector)
            .finish()
    }
}

/// Anything that can resolve a region by name.
pub trait RegionHost {
    fn get_region(&self, name: &str) -> Option<Region>;
}

/// A set of named regions.
#[derive(Debug, Clone, Default)]
pub struct View {
    regions: HashMap<String, Region>,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region, keyed by name.
    pub fn with_region(mut self, name: impl Into<String>, selector: impl Into<String>) -> Self {
        let name = name.into();
        self.regions.insert(name.clone(), Region::new(name, selector));
        self
    }

    pub fn region_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.regions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl RegionHost for View {
    fn get_region(&self, name: &str) -> Option<Region> {
        self.regions.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_identity() {
        let a = Region::new("main", "#main");
        let b = Region::new("main", "#main");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_view_lookup_returns_same_handle() {
        let view = View::new().with_region("region", "#region");
        let first = view.get_region("region").unwrap();
        let second = view.get_region("region").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.selector(), "#region");
        assert!(view.get_region("missing").is_none());
    }

    #[test]
    fn test_region_names_sorted() {
        let view = View::new().with_region("b", "#b").with_region("a", "#a");
        assert_eq!(view.region_names(), vec!["a", "b"]);
    }
}
