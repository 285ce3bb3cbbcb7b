//! Whole-world snapshots for save and restore.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::PersistError;
use crate::world::{World, validate_world};

/// Where SaveGame and LoadGame put and fetch snapshots.
pub trait SnapshotStore {
    fn save(&mut self, world: &World) -> Result<(), PersistError>;
    fn load(&mut self) -> Result<World, PersistError>;
}

pub fn to_snapshot(world: &World) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(world)?)
}

/// Decodes and re-validates a snapshot. A snapshot that would not load as a
/// fresh world is rejected.
pub fn from_snapshot(blob: &str) -> Result<World, PersistError> {
    let world: World = serde_json::from_str(blob)?;
    let errors = validate_world(&world);
    if !errors.is_empty() {
        let msg = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(PersistError::Invalid(msg));
    }
    Ok(world)
}

/// JSON file on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&mut self, world: &World) -> Result<(), PersistError> {
        let blob = to_snapshot(world)?;
        // A failed write must leave the previous save intact.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }

    fn load(&mut self) -> Result<World, PersistError> {
        let blob = fs::read_to_string(&self.path)?;
        from_snapshot(&blob)
    }
}

/// Keeps the last snapshot in memory.
#[derive(Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, world: &World) -> Result<(), PersistError> {
        self.blob = Some(to_snapshot(world)?);
        Ok(())
    }

    fn load(&mut self) -> Result<World, PersistError> {
        match &self.blob {
            Some(blob) => from_snapshot(blob),
            None => Err(PersistError::NothingSaved),
        }
    }
}
