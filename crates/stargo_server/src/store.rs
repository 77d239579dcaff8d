//! File-backed snapshot storage.

use std::path::{Path, PathBuf};

use stargo_core::error::Result;
use stargo_core::snapshot::{Snapshot, SnapshotStore};

/// Keeps the latest snapshot in a single file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Store snapshots at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        snapshot.save(&self.path)
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Snapshot::load(&self.path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stargo_core::error::GameError;
    use stargo_core::simulation::Simulation;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("none.bin"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSnapshotStore::new(dir.path().join("state.bin"));
        let mut sim = Simulation::new(1);

        store.save(&Snapshot::capture(&sim)).unwrap();
        sim.tick();
        store.save(&Snapshot::capture(&sim)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.saved_at_tick, 1);
    }

    #[test]
    fn test_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.bin");
        std::fs::write(&path, b"garbage").unwrap();

        let store = FileSnapshotStore::new(&path);
        assert!(matches!(store.load(), Err(GameError::LoadFailed(_))));
    }
}
