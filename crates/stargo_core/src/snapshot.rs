//! Versioned session snapshots.
//!
//! A [`Snapshot`] carries the whole [`Simulation`], including in-flight
//! construction queues, active research, pending missions and the RNG
//! position, so a restored session continues exactly where it stopped.
//!
//! Snapshots are stored as bincode by default, or as RON when the path ends
//! in `.ron`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clock::Tick;
use crate::error::{GameError, Result};
use crate::simulation::Simulation;

/// Snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A saved session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version.
    pub version: u32,
    /// Session seed.
    pub seed: u64,
    /// Tick at which the snapshot was taken.
    pub saved_at_tick: Tick,
    /// State hash at capture time, for diagnostics.
    pub state_hash: u64,
    /// The session itself.
    pub simulation: Simulation,
}

impl Snapshot {
    /// Capture the current state of `simulation`.
    #[must_use]
    pub fn capture(simulation: &Simulation) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            seed: simulation.seed(),
            saved_at_tick: simulation.current_tick(),
            state_hash: simulation.state_hash(),
            simulation: simulation.clone(),
        }
    }

    /// A copy of the saved session.
    #[must_use]
    pub fn restore(&self) -> Simulation {
        self.simulation.clone()
    }

    /// Consume the snapshot and return the saved session.
    #[must_use]
    pub fn into_simulation(self) -> Simulation {
        self.simulation
    }

    fn check_version(self) -> Result<Self> {
        if self.version != SNAPSHOT_VERSION {
            return Err(GameError::LoadFailed(format!(
                "Snapshot version mismatch: expected {}, got {}",
                SNAPSHOT_VERSION, self.version
            )));
        }
        Ok(self)
    }

    /// Encode as bincode.
    ///
    /// # Errors
    /// Returns [`GameError::SaveFailed`] if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::SaveFailed(format!("Failed to serialize snapshot: {e}")))
    }

    /// Decode from bincode.
    ///
    /// # Errors
    /// Returns [`GameError::LoadFailed`] on malformed data or a version mismatch.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| GameError::LoadFailed(format!("Failed to deserialize snapshot: {e}")))?;
        snapshot.check_version()
    }

    /// Encode as human-readable RON.
    ///
    /// # Errors
    /// Returns [`GameError::SaveFailed`] if encoding fails.
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| GameError::SaveFailed(format!("Failed to serialize snapshot: {e}")))
    }

    /// Decode from RON.
    ///
    /// # Errors
    /// Returns [`GameError::LoadFailed`] on malformed data or a version mismatch.
    pub fn from_ron(text: &str) -> Result<Self> {
        let snapshot: Self = ron::from_str(text)
            .map_err(|e| GameError::LoadFailed(format!("Failed to parse snapshot: {e}")))?;
        snapshot.check_version()
    }

    /// Write the snapshot to `path`, replacing any previous file.
    ///
    /// The data goes to a sibling temporary file first and is renamed into
    /// place, so a crash never leaves a half-written snapshot.
    ///
    /// # Errors
    /// Returns [`GameError::SaveFailed`] if encoding or writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = if is_ron(path) {
            self.to_ron()?.into_bytes()
        } else {
            self.to_bytes()?
        };

        let temp = path.with_extension("tmp");
        std::fs::write(&temp, bytes)
            .map_err(|e| GameError::SaveFailed(format!("Failed to write {}: {e}", temp.display())))?;
        std::fs::rename(&temp, path)
            .map_err(|e| GameError::SaveFailed(format!("Failed to replace {}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), tick = self.saved_at_tick, "Snapshot saved");
        Ok(())
    }

    /// Read a snapshot from `path`.
    ///
    /// # Errors
    /// Returns [`GameError::LoadFailed`] if reading or decoding fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| GameError::LoadFailed(format!("Failed to read {}: {e}", path.display())))?;

        if is_ron(path) {
            let text = String::from_utf8(bytes)
                .map_err(|e| GameError::LoadFailed(format!("Snapshot is not UTF-8: {e}")))?;
            Self::from_ron(&text)
        } else {
            Self::from_bytes(&bytes)
        }
    }
}

fn is_ron(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "ron")
}

/// Durable storage for the latest snapshot.
pub trait SnapshotStore {
    /// Persist `snapshot`, replacing the previous one.
    ///
    /// # Errors
    /// Returns [`GameError::SaveFailed`] if the state could not be made durable.
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// The latest snapshot, or `None` when nothing was saved yet.
    ///
    /// # Errors
    /// Returns [`GameError::LoadFailed`] if stored data exists but is unreadable.
    fn load(&self) -> Result<Option<Snapshot>>;
}

/// In-memory store, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    latest: Option<Vec<u8>>,
    saves: usize,
}

impl MemorySnapshotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves.
    #[must_use]
    pub const fn save_count(&self) -> usize {
        self.saves
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.latest = Some(snapshot.to_bytes()?);
        self.saves += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        self.latest
            .as_deref()
            .map(Snapshot::from_bytes)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buildings::BuildingType;
    use crate::research::ResearchType;
    use crate::simulation::Command;

    fn busy_simulation() -> Simulation {
        let mut sim = Simulation::new(9);
        let player = sim.register_player("Ada");
        let home = sim.player(player).unwrap().home_planet;
        sim.planet_mut(home).unwrap().resources =
            crate::resources::Resources::from_units(50_000, 50_000, 50_000);

        sim.apply_command(
            player,
            Command::StartConstruction {
                planet: home,
                building_type: BuildingType::Shipyard,
            },
        )
        .unwrap();
        sim.apply_command(
            player,
            Command::StartResearch {
                planet: home,
                research: ResearchType::ImprovedMining,
            },
        )
        .unwrap();
        sim
    }

    #[test]
    fn test_bytes_roundtrip_keeps_queues() {
        let sim = busy_simulation();
        let snapshot = Snapshot::capture(&sim);

        let restored = Snapshot::from_bytes(&snapshot.to_bytes().unwrap())
            .unwrap()
            .into_simulation();
        assert_eq!(restored, sim);

        let home = restored.players().next().unwrap().home_planet;
        let planet = restored.planet(home).unwrap();
        assert!(planet.is_constructing());
        assert!(planet.research.is_researching(ResearchType::ImprovedMining));
    }

    #[test]
    fn test_ron_roundtrip() {
        let sim = busy_simulation();
        let snapshot = Snapshot::capture(&sim);

        let text = snapshot.to_ron().unwrap();
        let restored = Snapshot::from_ron(&text).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut snapshot = Snapshot::capture(&Simulation::new(1));
        snapshot.version = SNAPSHOT_VERSION + 1;

        let bytes = snapshot.to_bytes().unwrap();
        assert!(matches!(
            Snapshot::from_bytes(&bytes),
            Err(GameError::LoadFailed(_))
        ));
    }

    #[test]
    fn test_file_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let sim = busy_simulation();
        let snapshot = Snapshot::capture(&sim);

        for name in ["state.bin", "state.ron"] {
            let path = dir.path().join(name);
            snapshot.save(&path).unwrap();
            assert_eq!(Snapshot::load(&path).unwrap(), snapshot);
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Snapshot::load(dir.path().join("absent.bin"));
        assert!(matches!(result, Err(GameError::LoadFailed(_))));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemorySnapshotStore::new();
        assert_eq!(store.load().unwrap(), None);

        let snapshot = Snapshot::capture(&busy_simulation());
        store.save(&snapshot).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap(), Some(snapshot));
    }
}
