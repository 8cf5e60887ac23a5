use crate::{DeviceId, RegistryError, Result};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};

/// Set of claimed device ids.
///
/// There is no removal: once an id is claimed it stays claimed. Insert and
/// query run under one lock so concurrent startup code cannot both claim the
/// same id.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    ids: Mutex<BTreeSet<DeviceId>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id`, treating a duplicate as a programming error.
    ///
    /// # Panics
    ///
    /// Panics if `id` is already registered.
    pub fn register(&self, id: DeviceId) {
        let claimed = self.try_register(id);
        assert!(claimed.is_ok(), "CAN device id {id} is already registered");
    }

    /// Claim `id`, reporting a duplicate instead of panicking.
    pub fn try_register(&self, id: DeviceId) -> Result<()> {
        let mut ids = self.ids.lock();
        if !ids.insert(id) {
            return Err(RegistryError::Duplicate(id));
        }
        tracing::debug!(%id, total = ids.len(), "registered CAN device id");
        Ok(())
    }

    pub fn is_registered(&self, id: DeviceId) -> bool {
        self.ids.lock().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.lock().is_empty()
    }

    /// Sorted snapshot of every claimed id.
    pub fn ids(&self) -> Vec<DeviceId> {
        self.ids.lock().iter().copied().collect()
    }
}

static GLOBAL: OnceLock<Arc<DeviceRegistry>> = OnceLock::new();

/// The process-wide registry, created on first use.
pub fn global() -> Arc<DeviceRegistry> {
    GLOBAL.get_or_init(|| Arc::new(DeviceRegistry::new())).clone()
}
