//! The game session.
//!
//! [`Simulation`] is the explicit context object for one session. It owns
//! the clock, every planet and player, and the seeded RNG, and it is the
//! only place that touches more than one planet at a time (mission
//! resolution).
//!
//! # Tick Order
//!
//! Each call to [`Simulation::tick`]:
//! 1. **Clock** - advance by one tick, step the countdown
//! 2. **Planets** - in id order, `update(tick)` then credit one tick of production
//! 3. **Missions** - resolve every mission that has arrived, exactly once

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingId, BuildingType};
use crate::clock::{Countdown, GameClock, Tick};
use crate::combat::{resolve_attack, AttackOutcome};
use crate::defenses::DefenseType;
use crate::error::{GameError, Rejection, Result};
use crate::fleet::{FleetId, FleetMission, MissionState, MissionType};
use crate::generation::{
    create_home_planet, create_random_planet, MAX_PLANETS_PER_SCAN, MIN_PLANET_SPACING_LY,
    SCAN_RADIUS_KM,
};
use crate::location::{light_years_to_km, Location, LocationService};
use crate::planet::{Planet, PlanetEvent, PlanetId};
use crate::player::{Player, PlayerId};
use crate::research::ResearchType;
use crate::ships::ShipType;

/// A player-initiated mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Queue a new building.
    StartConstruction {
        /// Planet to build on.
        planet: PlanetId,
        /// What to build.
        building_type: BuildingType,
    },
    /// Upgrade an existing building.
    UpgradeBuilding {
        /// Planet the building stands on.
        planet: PlanetId,
        /// Building to upgrade.
        building: BuildingId,
    },
    /// Start a research.
    StartResearch {
        /// Researching planet.
        planet: PlanetId,
        /// What to research.
        research: ResearchType,
    },
    /// Queue a ship.
    BuildShip {
        /// Planet with the shipyard.
        planet: PlanetId,
        /// Ship class.
        ship_type: ShipType,
    },
    /// Queue a defense.
    BuildDefense {
        /// Planet to defend.
        planet: PlanetId,
        /// Defense type.
        defense_type: DefenseType,
    },
    /// Send a planet's fleet on a mission.
    LaunchMission {
        /// Planet whose fleet departs.
        source: PlanetId,
        /// Destination.
        target: PlanetId,
        /// What happens on arrival.
        mission_type: MissionType,
        /// Travel time in ticks.
        duration: Tick,
    },
}

impl Command {
    /// Planet whose owner may issue this command.
    #[must_use]
    pub const fn planet(&self) -> PlanetId {
        match *self {
            Self::StartConstruction { planet, .. }
            | Self::UpgradeBuilding { planet, .. }
            | Self::StartResearch { planet, .. }
            | Self::BuildShip { planet, .. }
            | Self::BuildDefense { planet, .. } => planet,
            Self::LaunchMission { source, .. } => source,
        }
    }
}

/// A mission that resolved this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionReport {
    /// Planet whose fleet flew the mission.
    pub source: PlanetId,
    /// Destination planet.
    pub target: PlanetId,
    /// Mission kind.
    pub mission_type: MissionType,
    /// Hit applied by an attack, if any ship was there to hit.
    pub attack: Option<AttackOutcome>,
}

/// Events generated during a single tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    /// The tick these events belong to.
    pub tick: Tick,
    /// Completions on each planet, in planet id order.
    pub planet_events: Vec<(PlanetId, PlanetEvent)>,
    /// Missions resolved this tick.
    pub missions: Vec<MissionReport>,
    /// Whether the session countdown wrapped this tick.
    pub countdown_wrapped: bool,
}

/// One game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    clock: GameClock,
    countdown: Countdown,
    planets: BTreeMap<PlanetId, Planet>,
    players: BTreeMap<PlayerId, Player>,
    next_planet_id: u32,
    next_player_id: u32,
    seed: u64,
    #[serde(with = "rng_serde")]
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Create an empty session at tick 0.
    ///
    /// # Example
    ///
    /// ```
    /// use stargo_core::simulation::Simulation;
    ///
    /// let mut sim = Simulation::new(42);
    /// sim.tick();
    /// assert_eq!(sim.current_tick(), 1);
    /// ```
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            clock: GameClock::new(),
            countdown: Countdown::default(),
            planets: BTreeMap::new(),
            players: BTreeMap::new(),
            next_planet_id: 1,
            next_player_id: 1,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Current tick.
    #[must_use]
    pub const fn current_tick(&self) -> Tick {
        self.clock.current_tick()
    }

    /// The session display countdown.
    #[must_use]
    pub const fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Seed the session RNG was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    /// Planet by id.
    #[must_use]
    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(&id)
    }

    /// Mutable planet by id.
    pub fn planet_mut(&mut self, id: PlanetId) -> Option<&mut Planet> {
        self.planets.get_mut(&id)
    }

    /// All planets in id order.
    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets.values()
    }

    /// Player by id.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// All players in id order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    fn allocate_planet_id(&mut self) -> PlanetId {
        let id = PlanetId(self.next_planet_id);
        self.next_planet_id += 1;
        id
    }

    /// Insert a planet under a freshly allocated id.
    pub fn add_planet(&mut self, mut planet: Planet) -> PlanetId {
        let id = self.allocate_planet_id();
        planet.id = id;
        planet.fleet.id = FleetId(id.0);
        self.planets.insert(id, planet);
        id
    }

    /// Create a player together with their starter home planet.
    pub fn register_player(&mut self, name: &str) -> PlayerId {
        let player_id = PlayerId(self.next_player_id);
        self.next_player_id += 1;

        let planet_id = self.allocate_planet_id();
        let home = Planet::starter_home(planet_id, player_id, name, self.current_tick());
        self.planets.insert(planet_id, home);
        self.players
            .insert(player_id, Player::new(player_id, name, planet_id));

        tracing::info!(player = %player_id, home = %planet_id, name, "Player registered");
        player_id
    }

    /// Give a player a located homeworld at `location`.
    ///
    /// The unlocated starter planet, if that is the current home, is
    /// replaced.
    ///
    /// # Errors
    ///
    /// [`GameError::PlayerNotFound`], [`GameError::InvalidLocation`] for
    /// out-of-range coordinates, or [`Rejection::HomeworldAlreadyExists`]
    /// when the current home already has a location.
    pub fn establish_homeworld(&mut self, player: PlayerId, location: Location) -> Result<PlanetId> {
        let current_home = self
            .players
            .get(&player)
            .ok_or(GameError::PlayerNotFound(player))?
            .home_planet;

        if !(location.latitude.is_finite()
            && location.longitude.is_finite()
            && (-90.0..=90.0).contains(&location.latitude)
            && (-180.0..=180.0).contains(&location.longitude))
        {
            return Err(GameError::InvalidLocation(location.to_string()));
        }

        if self
            .planets
            .get(&current_home)
            .is_some_and(|planet| planet.location.is_some())
        {
            return Err(Rejection::HomeworldAlreadyExists.into());
        }

        let tick = self.current_tick();
        let id = self.allocate_planet_id();
        let mut planet = create_home_planet(id, location, tick);
        planet.owner = Some(player);
        self.planets.insert(id, planet);
        self.planets.remove(&current_home);

        if let Some(entry) = self.players.get_mut(&player) {
            entry.home_planet = id;
        }
        tracing::info!(player = %player, home = %id, %location, "Homeworld established");
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Apply a player command at the current tick.
    ///
    /// # Errors
    ///
    /// [`GameError::PlayerNotFound`], [`GameError::PlanetNotFound`],
    /// [`Rejection::NotOwner`], or whatever the planet operation returns.
    pub fn apply_command(&mut self, player: PlayerId, command: Command) -> Result<()> {
        if !self.players.contains_key(&player) {
            return Err(GameError::PlayerNotFound(player));
        }

        let planet_id = command.planet();
        let tick = self.current_tick();
        let planet = self
            .planets
            .get_mut(&planet_id)
            .ok_or(GameError::PlanetNotFound(planet_id))?;
        if planet.owner != Some(player) {
            return Err(Rejection::NotOwner.into());
        }

        match command {
            Command::StartConstruction { building_type, .. } => {
                planet.start_construction(building_type, tick).map(drop)
            }
            Command::UpgradeBuilding { building, .. } => planet.upgrade_building(building, tick),
            Command::StartResearch { research, .. } => planet.start_research(research, tick),
            Command::BuildShip { ship_type, .. } => planet.build_ship(ship_type, tick).map(drop),
            Command::BuildDefense { defense_type, .. } => {
                planet.build_defense(defense_type, tick).map(drop)
            }
            Command::LaunchMission {
                source,
                target,
                mission_type,
                duration,
            } => self.launch_mission(source, target, mission_type, duration),
        }
    }

    /// Send the fleet of `source` on a mission to `target`.
    ///
    /// # Errors
    ///
    /// [`GameError::PlanetNotFound`] for unknown planets,
    /// [`Rejection::InvalidTarget`] for self-targeting,
    /// [`Rejection::EmptyFleet`], [`Rejection::MissionInProgress`], or
    /// [`Rejection::TargetProtected`] for attacks on protected planets.
    pub fn launch_mission(
        &mut self,
        source: PlanetId,
        target: PlanetId,
        mission_type: MissionType,
        duration: Tick,
    ) -> Result<()> {
        let tick = self.current_tick();
        let target_planet = self
            .planets
            .get(&target)
            .ok_or(GameError::PlanetNotFound(target))?;
        if source == target {
            return Err(Rejection::InvalidTarget.into());
        }
        if mission_type == MissionType::Attack && target_planet.is_protected(tick) {
            return Err(Rejection::TargetProtected.into());
        }

        let fleet = &mut self
            .planets
            .get_mut(&source)
            .ok_or(GameError::PlanetNotFound(source))?
            .fleet;
        if fleet.active_ship_count() == 0 {
            return Err(Rejection::EmptyFleet.into());
        }
        if fleet.has_active_mission() {
            return Err(Rejection::MissionInProgress.into());
        }

        fleet.mission = Some(FleetMission::new(mission_type, source, target, tick, duration));
        tracing::info!(%source, %target, %mission_type, tick, duration, "Mission launched");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Discovery
    // ------------------------------------------------------------------

    /// Check whether any located planet lies within `km` of `location`.
    pub fn has_planet_nearby(
        &self,
        location: Location,
        km: f64,
        geo: &dyn LocationService,
    ) -> bool {
        self.planets
            .values()
            .filter_map(|planet| planet.location)
            .any(|other| geo.distance_km(location, other) < km)
    }

    /// Generate new planets around `center` and record them as discovered
    /// by `player`.
    ///
    /// Between one and five spots are rolled; spots closer than half a
    /// light year to an existing planet are skipped.
    ///
    /// # Errors
    ///
    /// [`GameError::PlayerNotFound`].
    pub fn scan_area(
        &mut self,
        player: PlayerId,
        center: Location,
        geo: &dyn LocationService,
    ) -> Result<Vec<PlanetId>> {
        if !self.players.contains_key(&player) {
            return Err(GameError::PlayerNotFound(player));
        }

        let tick = self.current_tick();
        let spacing_km = light_years_to_km(MIN_PLANET_SPACING_LY);
        let attempts = rand::Rng::gen_range(&mut self.rng, 1..=MAX_PLANETS_PER_SCAN);
        let mut found = Vec::new();

        for _ in 0..attempts {
            let spot = geo.random_near(center, SCAN_RADIUS_KM, &mut self.rng);
            if self.has_planet_nearby(spot, spacing_km, geo) {
                continue;
            }

            let id = self.allocate_planet_id();
            let mut planet = create_random_planet(id, &mut self.rng, tick);
            planet.discover(spot, tick);
            self.planets.insert(id, planet);
            found.push(id);
        }

        if let Some(entry) = self.players.get_mut(&player) {
            for &id in &found {
                entry.discover_planet(id);
            }
        }
        tracing::debug!(player = %player, %center, attempts, found = found.len(), "Area scanned");
        Ok(found)
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance the session by one tick.
    ///
    /// # Example
    ///
    /// ```
    /// use stargo_core::simulation::Simulation;
    ///
    /// let mut sim = Simulation::new(1);
    /// let events = sim.tick();
    /// assert_eq!(events.tick, 1);
    /// ```
    pub fn tick(&mut self) -> TickEvents {
        let tick = self.clock.advance();
        let mut events = TickEvents {
            tick,
            countdown_wrapped: self.countdown.step(),
            ..TickEvents::default()
        };

        for (&id, planet) in &mut self.planets {
            events
                .planet_events
                .extend(planet.update(tick).into_iter().map(|event| (id, event)));
            planet.collect_production(1);
        }

        events.missions = self.resolve_missions(tick);

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick, state_hash = hash, "Simulation state hash");
        }

        events
    }

    fn resolve_missions(&mut self, tick: Tick) -> Vec<MissionReport> {
        let arrived: Vec<FleetMission> = self
            .planets
            .values()
            .filter_map(|planet| planet.fleet.mission.clone())
            .filter(|mission| mission.state(tick) == MissionState::CompleteUnresolved)
            .collect();

        let mut reports = Vec::with_capacity(arrived.len());
        for mission in arrived {
            let attack = match mission.mission_type {
                MissionType::Attack => self.resolve_attack_mission(&mission),
                MissionType::Scout | MissionType::Defend | MissionType::Transport => None,
            };

            if let Some(planet) = self.planets.get_mut(&mission.source) {
                if let Some(stored) = planet.fleet.mission.as_mut() {
                    stored.mark_resolved();
                }
            }

            tracing::info!(
                source = %mission.source,
                target = %mission.target,
                mission_type = %mission.mission_type,
                tick,
                hit = ?attack,
                "Mission resolved"
            );
            reports.push(MissionReport {
                source: mission.source,
                target: mission.target,
                mission_type: mission.mission_type,
                attack,
            });
        }
        reports
    }

    fn resolve_attack_mission(&mut self, mission: &FleetMission) -> Option<AttackOutcome> {
        let power = self.planets.get(&mission.source)?.fleet.total_attack_power();
        let target = self.planets.get_mut(&mission.target)?;
        resolve_attack(power, &mut target.fleet, &mut self.rng)
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Hash of the complete session state.
    ///
    /// Two sessions with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.clock.hash(&mut hasher);
        self.countdown.hash(&mut hasher);
        self.next_planet_id.hash(&mut hasher);
        self.next_player_id.hash(&mut hasher);

        self.planets.len().hash(&mut hasher);
        for planet in self.planets.values() {
            planet.hash(&mut hasher);
        }

        self.players.len().hash(&mut hasher);
        for player in self.players.values() {
            player.hash(&mut hasher);
        }

        self.rng.get_word_pos().hash(&mut hasher);
        hasher.finish()
    }

    /// Serialize the session with bincode.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SaveFailed`] if encoding fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::SaveFailed(format!("Failed to serialize simulation: {e}")))
    }

    /// Deserialize a session from bincode.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::LoadFailed`] if decoding fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| GameError::LoadFailed(format!("Failed to deserialize simulation: {e}")))
    }
}

/// Serde support for the session RNG.
///
/// Stores the seed, stream and 128-bit word position (split into two
/// `u64`s so text formats without 128-bit integers can carry it).
mod rng_serde {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct RngState {
        seed: [u8; 32],
        stream: u64,
        word_pos_high: u64,
        word_pos_low: u64,
    }

    pub fn serialize<S>(rng: &ChaCha8Rng, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let word_pos = rng.get_word_pos();
        RngState {
            seed: rng.get_seed(),
            stream: rng.get_stream(),
            word_pos_high: (word_pos >> 64) as u64,
            word_pos_low: word_pos as u64,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ChaCha8Rng, D::Error>
    where
        D: Deserializer<'de>,
    {
        let state = RngState::deserialize(deserializer)?;
        let mut rng = ChaCha8Rng::from_seed(state.seed);
        rng.set_stream(state.stream);
        rng.set_word_pos((u128::from(state.word_pos_high) << 64) | u128::from(state.word_pos_low));
        Ok(rng)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Resources;
    use rand::{Rng, RngCore};

    /// Flat-plane geometry: one degree is one kilometre.
    struct FlatGeo;

    impl LocationService for FlatGeo {
        fn distance_km(&self, a: Location, b: Location) -> f64 {
            ((a.latitude - b.latitude).powi(2) + (a.longitude - b.longitude).powi(2)).sqrt()
        }

        fn random_near(&self, center: Location, radius_km: f64, rng: &mut dyn RngCore) -> Location {
            Location::new(
                center.latitude + rng.gen_range(-radius_km..=radius_km),
                center.longitude + rng.gen_range(-radius_km..=radius_km),
            )
        }
    }

    fn armed_planet(sim: &mut Simulation, owner: PlayerId, ships: &[ShipType]) -> PlanetId {
        let mut planet = Planet::new(PlanetId(0), "Armed", 0);
        planet.owner = Some(owner);
        let id = sim.add_planet(planet);
        let planet = sim.planet_mut(id).unwrap();
        for (n, &ship_type) in ships.iter().enumerate() {
            planet
                .fleet
                .add_ship(crate::ships::Ship::new(crate::ships::ShipId::new(100 + n as u32), ship_type));
        }
        id
    }

    #[test]
    fn test_tick_increments() {
        let mut sim = Simulation::new(0);
        assert_eq!(sim.current_tick(), 0);
        sim.tick();
        sim.tick();
        assert_eq!(sim.current_tick(), 2);
        assert_eq!(sim.countdown().remaining(), 28);
    }

    #[test]
    fn test_register_player_creates_home() {
        let mut sim = Simulation::new(0);
        let player = sim.register_player("Ada");

        let home = sim.player(player).unwrap().home_planet;
        let planet = sim.planet(home).unwrap();
        assert_eq!(planet.owner, Some(player));
        assert_eq!(planet.buildings.len(), 3);
    }

    #[test]
    fn test_apply_command_checks_owner() {
        let mut sim = Simulation::new(0);
        let ada = sim.register_player("Ada");
        let bob = sim.register_player("Bob");
        let ada_home = sim.player(ada).unwrap().home_planet;

        let command = Command::StartConstruction {
            planet: ada_home,
            building_type: BuildingType::PowerPlant,
        };
        assert_eq!(
            sim.apply_command(bob, command),
            Err(GameError::InvalidOperation(Rejection::NotOwner))
        );
        assert_eq!(
            sim.apply_command(PlayerId(99), command),
            Err(GameError::PlayerNotFound(PlayerId(99)))
        );

        sim.apply_command(ada, command).unwrap();
        let events = sim.tick();
        assert!(events.planet_events.iter().any(|(id, event)| *id == ada_home
            && matches!(event, PlanetEvent::BuildingCompleted { building_type: BuildingType::PowerPlant, .. })));
    }

    #[test]
    fn test_production_accrues_per_tick() {
        let mut sim = Simulation::new(0);
        let player = sim.register_player("Ada");
        let home = sim.player(player).unwrap().home_planet;
        sim.planet_mut(home).unwrap().resources = Resources::ZERO;

        for _ in 0..3600 {
            sim.tick();
        }

        let stock = sim.planet(home).unwrap().resources;
        assert!((stock.metal - crate::math::Fixed::from_num(30)).abs() < crate::math::Fixed::from_num(0.001));
        assert!((stock.energy - crate::math::Fixed::from_num(40)).abs() < crate::math::Fixed::from_num(0.001));
    }

    #[test]
    fn test_attack_mission_resolves_once() {
        let mut sim = Simulation::new(5);
        let ada = sim.register_player("Ada");
        let bob = sim.register_player("Bob");
        let attacker = armed_planet(&mut sim, ada, &[ShipType::LightFighter]);
        let defender = armed_planet(&mut sim, bob, &[ShipType::Cruiser]);

        sim.apply_command(
            ada,
            Command::LaunchMission {
                source: attacker,
                target: defender,
                mission_type: MissionType::Attack,
                duration: 2,
            },
        )
        .unwrap();

        assert!(sim.tick().missions.is_empty());
        let events = sim.tick();
        assert_eq!(events.missions.len(), 1);
        let hit = events.missions[0].attack.unwrap();
        assert_eq!(hit.remaining_health, crate::math::Fixed::from_num(250));

        assert!(sim.tick().missions.is_empty());
        let health = sim.planet(defender).unwrap().fleet.ships[0].health;
        assert_eq!(health, crate::math::Fixed::from_num(250));
    }

    #[test]
    fn test_launch_mission_rejections() {
        let mut sim = Simulation::new(0);
        let ada = sim.register_player("Ada");
        let armed = armed_planet(&mut sim, ada, &[ShipType::LightFighter]);
        let unarmed = armed_planet(&mut sim, ada, &[]);

        assert_eq!(
            sim.launch_mission(armed, armed, MissionType::Scout, 1),
            Err(GameError::InvalidOperation(Rejection::InvalidTarget))
        );
        assert_eq!(
            sim.launch_mission(unarmed, armed, MissionType::Scout, 1),
            Err(GameError::InvalidOperation(Rejection::EmptyFleet))
        );
        assert_eq!(
            sim.launch_mission(armed, PlanetId(999), MissionType::Scout, 1),
            Err(GameError::PlanetNotFound(PlanetId(999)))
        );

        sim.planet_mut(unarmed)
            .unwrap()
            .discover(Location::new(0.0, 0.0), 0);
        assert_eq!(
            sim.launch_mission(armed, unarmed, MissionType::Attack, 1),
            Err(GameError::InvalidOperation(Rejection::TargetProtected))
        );

        sim.launch_mission(armed, unarmed, MissionType::Scout, 1).unwrap();
        assert_eq!(
            sim.launch_mission(armed, unarmed, MissionType::Transport, 1),
            Err(GameError::InvalidOperation(Rejection::MissionInProgress))
        );

        sim.tick();
        sim.launch_mission(armed, unarmed, MissionType::Defend, 1).unwrap();
    }

    #[test]
    fn test_establish_homeworld() {
        let mut sim = Simulation::new(0);
        let ada = sim.register_player("Ada");
        let starter = sim.player(ada).unwrap().home_planet;

        assert!(matches!(
            sim.establish_homeworld(ada, Location::new(120.0, 0.0)),
            Err(GameError::InvalidLocation(_))
        ));

        let home = sim.establish_homeworld(ada, Location::new(55.0, 12.0)).unwrap();
        assert_eq!(sim.player(ada).unwrap().home_planet, home);
        assert!(sim.planet(starter).is_none());
        assert_eq!(sim.planet(home).unwrap().command_center_level(), 2);

        assert_eq!(
            sim.establish_homeworld(ada, Location::new(10.0, 10.0)),
            Err(GameError::InvalidOperation(Rejection::HomeworldAlreadyExists))
        );
    }

    #[test]
    fn test_scan_area_respects_spacing() {
        let mut sim = Simulation::new(11);
        let ada = sim.register_player("Ada");
        let center = Location::new(0.0, 0.0);

        let mut total = 0;
        for _ in 0..10 {
            total += sim.scan_area(ada, center, &FlatGeo).unwrap().len();
        }
        assert!(total > 0);

        let located: Vec<Location> = sim.planets().filter_map(|p| p.location).collect();
        for (i, a) in located.iter().enumerate() {
            for b in &located[i + 1..] {
                assert!(FlatGeo.distance_km(*a, *b) >= 5.0);
            }
        }
        assert_eq!(sim.player(ada).unwrap().discovered_planets.len(), total);
    }

    #[test]
    fn test_deterministic_hash() {
        let build = || {
            let mut sim = Simulation::new(77);
            let ada = sim.register_player("Ada");
            sim.scan_area(ada, Location::new(0.0, 0.0), &FlatGeo).unwrap();
            for _ in 0..10 {
                sim.tick();
            }
            sim
        };

        assert_eq!(build().state_hash(), build().state_hash());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut sim = Simulation::new(3);
        let ada = sim.register_player("Ada");
        sim.scan_area(ada, Location::new(0.0, 0.0), &FlatGeo).unwrap();
        sim.tick();

        let bytes = sim.serialize().unwrap();
        let mut restored = Simulation::deserialize(&bytes).unwrap();
        assert_eq!(restored, sim);
        assert_eq!(restored.state_hash(), sim.state_hash());

        sim.tick();
        restored.tick();
        assert_eq!(restored.state_hash(), sim.state_hash());
    }

    #[test]
    fn test_deserialize_garbage_fails() {
        assert!(matches!(
            Simulation::deserialize(&[1, 2, 3]),
            Err(GameError::LoadFailed(_))
        ));
    }
}
