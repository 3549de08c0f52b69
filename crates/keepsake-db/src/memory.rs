use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{Result, anyhow, bail};

use keepsake_types::models::{Capsule, NewCapsule};

use crate::CapsuleStore;

/// Process-local store. Same contract as SQLite, nothing is persisted.
#[derive(Default)]
pub struct MemoryStore {
    capsules: RwLock<HashMap<String, Capsule>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CapsuleStore for MemoryStore {
    fn insert(&self, capsule: &NewCapsule) -> Result<()> {
        let mut capsules = self
            .capsules
            .write()
            .map_err(|e| anyhow!("Store lock poisoned: {}", e))?;
        if capsules.contains_key(&capsule.id) {
            bail!("capsule id already exists: {}", capsule.id);
        }
        capsules.insert(capsule.id.clone(), capsule.to_capsule());
        Ok(())
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Capsule>> {
        let capsules = self
            .capsules
            .read()
            .map_err(|e| anyhow!("Store lock poisoned: {}", e))?;
        Ok(capsules.get(id).cloned())
    }
}
