//! Concurrent procedure registry
//!
//! Maps procedure names to their registered entries. Registration happens
//! while defining a type and may race with invocations on other threads:
//! a reader sees either the previous entry or the new one, never a torn
//! state, because entries are immutable and swapped whole behind an `Arc`.
//!
//! Redefining a name replaces the entry. Invocations that already hold the
//! old `Arc` finish against the old contract.

use dashmap::DashMap;
use std::sync::Arc;
use tacit_core::ParameterContract;
use tracing::trace;

/// Anything stored in a [`ContractRegistry`] exposes its parameter contract
pub trait Contracted: Send + Sync {
    /// The entry's immutable contract
    fn contract(&self) -> &Arc<ParameterContract>;
}

impl Contracted for Arc<ParameterContract> {
    fn contract(&self) -> &Arc<ParameterContract> {
        self
    }
}

/// Name → entry map safe for concurrent registration and lookup
pub struct ContractRegistry<T> {
    entries: DashMap<String, Arc<T>>,
}

impl<T: Contracted> ContractRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Register `entry` under `name`
    ///
    /// Returns the entry it replaced, if any.
    pub fn register(&self, name: impl Into<String>, entry: T) -> Option<Arc<T>> {
        let name = name.into();
        let params = entry.contract().len();
        let previous = self.entries.insert(name.clone(), Arc::new(entry));
        if previous.is_some() {
            trace!(procedure = %name, params, "replaced contracted procedure");
        } else {
            trace!(procedure = %name, params, "inserted contracted procedure");
        }
        previous
    }

    /// Entry registered under `name`
    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.entries.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Contract of the entry registered under `name`
    pub fn contract(&self, name: &str) -> Option<Arc<ParameterContract>> {
        self.entries
            .get(name)
            .map(|entry| Arc::clone(entry.value().contract()))
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Contracted> Default for ContractRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ContractRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractRegistry")
            .field("len", &self.entries.len())
            .finish()
    }
}
