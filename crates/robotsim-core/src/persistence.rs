//! Persistence collaborator.
//!
//! The core never stores worlds on its own. A [`PersistenceManager`] reads,
//! persists and deletes world snapshots keyed by the world's identifier,
//! which is assigned on the first successful persist.

use crate::serialize::{DeserializeError, SerializeError};
use crate::world::World;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("no stored world with id '{0}'")]
    NotFound(String),
    #[error("world has no persistence id")]
    Unidentified,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    #[error(transparent)]
    Deserialize(#[from] DeserializeError),
}

pub trait PersistenceManager {
    /// Load the world stored under `id`.
    fn read(&self, id: &str) -> Result<World, PersistenceError>;

    /// Store the world, assigning its id when it has none. Returns the id.
    fn persist(&mut self, world: &mut World) -> Result<String, PersistenceError>;

    /// Remove the stored copy of the world.
    fn delete(&mut self, world: &World) -> Result<(), PersistenceError>;
}

/// In-memory store of encoded snapshots.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    store: BTreeMap<String, Vec<u8>>,
    next_id: u64,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.store.contains_key(id)
    }
}

impl PersistenceManager for MemoryPersistence {
    fn read(&self, id: &str) -> Result<World, PersistenceError> {
        let data = self
            .store
            .get(id)
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))?;
        Ok(World::deserialize(data)?)
    }

    fn persist(&mut self, world: &mut World) -> Result<String, PersistenceError> {
        let previous = world.id().map(str::to_string);
        let id = match &previous {
            Some(id) => id.clone(),
            None => format!("world-{}", self.next_id),
        };
        // The id is part of the snapshot, so it is set before encoding and
        // rolled back if encoding fails.
        world.set_id(Some(id.clone()));
        let data = match world.serialize() {
            Ok(data) => data,
            Err(e) => {
                world.set_id(previous);
                return Err(e.into());
            }
        };
        if previous.is_none() {
            self.next_id += 1;
        }
        self.store.insert(id.clone(), data);
        Ok(id)
    }

    fn delete(&mut self, world: &World) -> Result<(), PersistenceError> {
        let id = world.id().ok_or(PersistenceError::Unidentified)?;
        self.store
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))
    }
}
