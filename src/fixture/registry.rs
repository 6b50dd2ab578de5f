// ABOUTME: In-process registry of active fixture names.
// ABOUTME: A claimed name is held by a lease that releases itself on drop.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use super::error::FixtureError;
use crate::types::ContainerName;

/// Names of fixtures currently owned by one manager, with claim times.
#[derive(Debug, Clone, Default)]
pub struct FixtureRegistry {
    active: Arc<Mutex<HashMap<ContainerName, DateTime<Utc>>>>,
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name`, failing if it is already active.
    pub fn claim(&self, name: &ContainerName) -> Result<NameLease, FixtureError> {
        let mut active = self.active.lock();
        match active.entry(name.clone()) {
            Entry::Occupied(entry) => Err(FixtureError::NameInUse {
                name: name.to_string(),
                since: *entry.get(),
            }),
            Entry::Vacant(entry) => {
                let claimed_at = *entry.insert(Utc::now());
                tracing::debug!(fixture = %name, "claimed fixture name");
                Ok(NameLease {
                    registry: self.clone(),
                    name: name.clone(),
                    claimed_at,
                })
            }
        }
    }

    pub fn is_active(&self, name: &ContainerName) -> bool {
        self.active.lock().contains_key(name)
    }

    /// Active names, sorted.
    pub fn active_names(&self) -> Vec<ContainerName> {
        let mut names: Vec<_> = self.active.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.active.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.lock().is_empty()
    }

    fn release(&self, name: &ContainerName) {
        self.active.lock().remove(name);
        tracing::debug!(fixture = %name, "released fixture name");
    }
}

/// Exclusive hold on a fixture name; dropping it frees the name.
#[derive(Debug)]
pub struct NameLease {
    registry: FixtureRegistry,
    name: ContainerName,
    claimed_at: DateTime<Utc>,
}

impl NameLease {
    pub fn name(&self) -> &ContainerName {
        &self.name
    }

    pub fn claimed_at(&self) -> DateTime<Utc> {
        self.claimed_at
    }
}

impl Drop for NameLease {
    fn drop(&mut self) {
        self.registry.release(&self.name);
    }
}
