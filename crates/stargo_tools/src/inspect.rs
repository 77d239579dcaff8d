//! Snapshot inspection.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use stargo_core::error::Result;
use stargo_core::planet::Planet;
use stargo_core::player::Player;
use stargo_core::snapshot::Snapshot;

/// Per-planet overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanetSummary {
    /// Planet id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Owning player id.
    pub owner: Option<u32>,
    /// Stockpile, formatted.
    pub resources: String,
    /// Standing buildings.
    pub buildings: usize,
    /// Installed defenses.
    pub defenses: usize,
    /// Operational ships.
    pub ships: usize,
    /// Buildings, defenses and ships under construction.
    pub queued: usize,
    /// Active research, if any.
    pub researching: Option<String>,
    /// Completed research count.
    pub researched: usize,
    /// Whether the fleet is away on a mission.
    pub on_mission: bool,
}

impl From<&Planet> for PlanetSummary {
    fn from(planet: &Planet) -> Self {
        Self {
            id: planet.id.0,
            name: planet.name.clone(),
            owner: planet.owner.map(|owner| owner.0),
            resources: planet.resources.to_string(),
            buildings: planet.buildings.len(),
            defenses: planet.defenses.len(),
            ships: planet.fleet.active_ship_count(),
            queued: planet.building_queue.len()
                + planet.defense_queue.len()
                + planet.fleet.construction_queue.len(),
            researching: planet
                .research
                .current()
                .map(|active| active.research.to_string()),
            researched: planet.research.completed().count(),
            on_mission: planet.fleet.has_active_mission(),
        }
    }
}

/// Per-player overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    /// Player id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Home planet id.
    pub home_planet: u32,
    /// Number of discovered planets.
    pub discovered: usize,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.0,
            name: player.name.clone(),
            home_planet: player.home_planet.0,
            discovered: player.discovered_planets.len(),
        }
    }
}

/// Overview of a saved session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    /// Format version.
    pub version: u32,
    /// Session seed.
    pub seed: u64,
    /// Tick at save time.
    pub tick: u64,
    /// State hash recorded at save time.
    pub state_hash: u64,
    /// Planets in id order.
    pub planets: Vec<PlanetSummary>,
    /// Players in id order.
    pub players: Vec<PlayerSummary>,
}

impl SnapshotSummary {
    /// Summarize a snapshot.
    #[must_use]
    pub fn of(snapshot: &Snapshot) -> Self {
        let sim = &snapshot.simulation;
        Self {
            version: snapshot.version,
            seed: snapshot.seed,
            tick: snapshot.saved_at_tick,
            state_hash: snapshot.state_hash,
            planets: sim.planets().map(PlanetSummary::from).collect(),
            players: sim.players().map(PlayerSummary::from).collect(),
        }
    }
}

impl fmt::Display for SnapshotSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "snapshot v{} seed {} tick {} hash {:016x}",
            self.version, self.seed, self.tick, self.state_hash
        )?;
        writeln!(f, "players: {}", self.players.len())?;
        for player in &self.players {
            writeln!(
                f,
                "  #{} {} home #{} discovered {}",
                player.id, player.name, player.home_planet, player.discovered
            )?;
        }
        writeln!(f, "planets: {}", self.planets.len())?;
        for planet in &self.planets {
            let owner = planet
                .owner
                .map_or_else(|| "unowned".to_string(), |id| format!("owner #{id}"));
            writeln!(
                f,
                "  #{} {} ({owner}) {} | buildings {} defenses {} ships {} queued {} researched {}{}{}",
                planet.id,
                planet.name,
                planet.resources,
                planet.buildings,
                planet.defenses,
                planet.ships,
                planet.queued,
                planet.researched,
                planet
                    .researching
                    .as_deref()
                    .map(|r| format!(" researching {r}"))
                    .unwrap_or_default(),
                if planet.on_mission { " on mission" } else { "" },
            )?;
        }
        Ok(())
    }
}

/// Load a snapshot file and summarize it.
///
/// # Errors
///
/// [`GameError::LoadFailed`](stargo_core::error::GameError::LoadFailed) if
/// the file cannot be read or decoded.
pub fn inspect_file(path: &Path) -> Result<SnapshotSummary> {
    let snapshot = Snapshot::load(path)?;
    Ok(SnapshotSummary::of(&snapshot))
}
