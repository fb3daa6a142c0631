//! On-disk world snapshots.
//!
//! Each world is one `.rsim` file holding a bitcode snapshot. The world's
//! persistence id is the file path.

use robotsim_core::persistence::{PersistenceError, PersistenceManager};
use robotsim_core::world::World;
use std::io;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_EXTENSION: &str = "rsim";

#[derive(Debug, Clone)]
pub struct FilePersistence {
    dir: PathBuf,
}

impl FilePersistence {
    /// Store snapshots under `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First unused `{name}-{n}.rsim` in the store directory.
    fn fresh_path(&self, name: &str) -> PathBuf {
        let stem: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        (0u64..)
            .map(|n| self.dir.join(format!("{stem}-{n}.{SNAPSHOT_EXTENSION}")))
            .find(|p| !p.exists())
            .unwrap_or_else(|| self.dir.join(format!("{stem}.{SNAPSHOT_EXTENSION}")))
    }
}

fn not_found(id: &str) -> impl FnOnce(io::Error) -> PersistenceError + '_ {
    move |e| match e.kind() {
        io::ErrorKind::NotFound => PersistenceError::NotFound(id.to_string()),
        _ => PersistenceError::Io(e),
    }
}

impl PersistenceManager for FilePersistence {
    fn read(&self, id: &str) -> Result<World, PersistenceError> {
        let data = std::fs::read(id).map_err(not_found(id))?;
        Ok(World::deserialize(&data)?)
    }

    fn persist(&mut self, world: &mut World) -> Result<String, PersistenceError> {
        let previous = world.id().map(str::to_string);
        let id = match &previous {
            Some(id) => id.clone(),
            None => self.fresh_path(world.name()).to_string_lossy().into_owned(),
        };
        world.set_id(Some(id.clone()));
        let written = world
            .serialize()
            .map_err(PersistenceError::from)
            .and_then(|data| std::fs::write(&id, data).map_err(PersistenceError::from));
        if let Err(e) = written {
            world.set_id(previous);
            return Err(e);
        }
        tracing::debug!(%id, "snapshot written");
        Ok(id)
    }

    fn delete(&mut self, world: &World) -> Result<(), PersistenceError> {
        let id = world.id().ok_or(PersistenceError::Unidentified)?;
        std::fs::remove_file(id).map_err(not_found(id))
    }
}
