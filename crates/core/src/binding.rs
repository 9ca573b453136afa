//! Per-invocation bindings
//!
//! A [`Binding`] is the validated name → value mapping produced for one
//! invocation. It is built fresh by the binder, owned by that invocation,
//! and pushed/popped as a unit. Its key set always equals the contract's
//! parameter names, in positional order.

use crate::value::Value;
use std::sync::Arc;

/// Ordered mapping from parameter name to validated value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding {
    entries: Vec<(Arc<str>, Value)>,
}

impl Binding {
    /// Empty binding with room for `capacity` parameters
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: Arc<str>, value: Value) {
        self.entries.push((name, value));
    }

    /// Value bound to `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(bound, _)| &**bound == name)
            .map(|(_, value)| value)
    }

    /// Whether `name` is bound
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Bound names in positional order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| &**name)
    }

    /// Bound values in positional order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// (name, value) pairs in positional order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (&**name, value))
    }

    /// Number of bound parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is bound
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
