//! Registry Module
//!
//! Name -> group directory. One registry is built at startup and shared by
//! reference with everything that creates or looks up groups.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::group::{Getter, Group};

// == Registry ==
/// Directory of groups by name.
///
/// Lookups take a shared lock and never serialize against each other;
/// registration takes the exclusive lock.
#[derive(Debug, Default)]
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates a group backed by `getter` with a `cache_bytes` budget for its
    /// main cache (0 = unbounded) and registers it under `name`, replacing any
    /// group previously registered with that name.
    pub fn new_group<G>(&self, name: impl Into<String>, cache_bytes: usize, getter: G) -> Arc<Group>
    where
        G: Getter + 'static,
    {
        let name = name.into();
        let group = Arc::new(Group::new(name.clone(), cache_bytes, Arc::new(getter)));

        let replaced = self
            .groups
            .write()
            .insert(name.clone(), Arc::clone(&group))
            .is_some();
        info!(group = %name, cache_bytes, replaced, "group registered");
        group
    }

    // == Get Group ==
    /// Returns the group registered under `name`.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Returns all registered groups ordered by name.
    pub fn groups(&self) -> Vec<Arc<Group>> {
        let mut groups: Vec<_> = self.groups.read().values().cloned().collect();
        groups.sort_by(|a, b| a.name().cmp(b.name()));
        groups
    }

    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}
