//! The planet aggregate.
//!
//! A [`Planet`] exclusively owns its stockpile, buildings, defenses, fleet,
//! research state and construction queues. Every mutating operation
//! re-validates its preconditions and either applies completely or fails
//! without touching anything.
//!
//! # Update Order
//!
//! [`Planet::update`] runs these steps once per tick:
//! 1. **Buildings** - apply due upgrades
//! 2. **Fleet** - move finished ships into the fleet
//! 3. **Research** - complete the active research
//! 4. **Building queue** - move finished buildings onto the planet
//! 5. **Defense queue** - move finished defenses onto the planet

use serde::{Deserialize, Serialize};

use crate::buildings::{Building, BuildingId, BuildingType};
use crate::clock::{Tick, TICKS_PER_DAY, TICKS_PER_HOUR};
use crate::combat::DefensePower;
use crate::defenses::{defense_limit, Defense, DefenseId, DefenseType};
use crate::error::{Rejection, Result};
use crate::fleet::{Fleet, FleetId};
use crate::location::Location;
use crate::math::Fixed;
use crate::player::PlayerId;
use crate::queue::ConstructionQueue;
use crate::research::{ResearchSystem, ResearchType};
use crate::resources::{ResourceType, Resources};
use crate::ships::{Ship, ShipId, ShipType};

/// Length of the post-discovery protection window.
pub const PROTECTION_TICKS: Tick = 30 * TICKS_PER_DAY;

/// Unique identifier for a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanetId(pub u32);

impl std::fmt::Display for PlanetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "planet#{}", self.0)
    }
}

/// Something that finished during a planet update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetEvent {
    /// A new building was placed.
    BuildingCompleted {
        /// The building.
        building_id: BuildingId,
        /// Its type.
        building_type: BuildingType,
    },
    /// An upgrade finished.
    BuildingUpgraded {
        /// The building.
        building_id: BuildingId,
        /// Its type.
        building_type: BuildingType,
        /// New level.
        level: u32,
    },
    /// A defense was installed.
    DefenseCompleted {
        /// The defense.
        defense_id: DefenseId,
        /// Its type.
        defense_type: DefenseType,
    },
    /// A ship joined the fleet.
    ShipCompleted {
        /// The ship.
        ship_id: ShipId,
        /// Its class.
        ship_type: ShipType,
    },
    /// A research finished.
    ResearchCompleted(ResearchType),
}

/// A planet and everything on it.
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub struct Planet {
    /// Planet identifier.
    pub id: PlanetId,
    /// Display name.
    pub name: String,
    /// Owning player, if any. Looked up through the player registry.
    pub owner: Option<PlayerId>,
    /// Current stockpile.
    pub resources: Resources,
    /// Standing buildings.
    pub buildings: Vec<Building>,
    /// Installed defenses.
    pub defenses: Vec<Defense>,
    /// Stationed ships and their construction queue.
    pub fleet: Fleet,
    /// Research progress.
    pub research: ResearchSystem,
    /// Buildings under construction.
    pub building_queue: ConstructionQueue<Building>,
    /// Defenses under construction.
    pub defense_queue: ConstructionQueue<Defense>,
    /// Where the planet is, once discovered.
    pub location: Option<Location>,
    /// Whether the planet has been discovered.
    pub is_discovered: bool,
    /// Tick of discovery.
    pub discovered_at: Option<Tick>,
    /// Tick the planet was created.
    pub created_at: Tick,
    next_entity_id: u32,
}

impl Planet {
    /// Create an undiscovered, unowned planet with the default stockpile.
    #[must_use]
    pub fn new(id: PlanetId, name: impl Into<String>, created_at: Tick) -> Self {
        Self {
            id,
            name: name.into(),
            owner: None,
            resources: Resources::from_units(500, 300, 100),
            buildings: Vec::new(),
            defenses: Vec::new(),
            fleet: Fleet::new(FleetId(id.0)),
            research: ResearchSystem::new(),
            building_queue: ConstructionQueue::new(),
            defense_queue: ConstructionQueue::new(),
            location: None,
            is_discovered: false,
            discovered_at: None,
            created_at,
            next_entity_id: 1,
        }
    }

    /// Starting planet handed to a newly registered player: command center,
    /// mine and power plant.
    #[must_use]
    pub fn starter_home(id: PlanetId, owner: PlayerId, player_name: &str, created_at: Tick) -> Self {
        let mut planet = Self::new(id, format!("{player_name}'s Home"), created_at);
        planet.owner = Some(owner);
        for building_type in [
            BuildingType::CommandCenter,
            BuildingType::Mine,
            BuildingType::PowerPlant,
        ] {
            planet.place_building(building_type, 1);
        }
        planet
    }

    /// Put a finished building on the planet, bypassing cost and queue.
    pub fn place_building(&mut self, building_type: BuildingType, level: u32) -> BuildingId {
        let id = BuildingId::new(self.allocate_id());
        self.buildings
            .push(Building::new(id, building_type).with_level(level));
        id
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    // ------------------------------------------------------------------
    // Discovery
    // ------------------------------------------------------------------

    /// Mark the planet discovered at `location`.
    ///
    /// Returns `false` and changes nothing if it was already discovered.
    pub fn discover(&mut self, location: Location, tick: Tick) -> bool {
        if self.is_discovered {
            return false;
        }
        self.location = Some(location);
        self.is_discovered = true;
        self.discovered_at = Some(tick);
        true
    }

    /// Check whether the planet is inside its protection window at `now`.
    #[must_use]
    pub fn is_protected(&self, now: Tick) -> bool {
        self.protection_remaining(now).is_some()
    }

    /// Ticks of protection left, if still protected.
    #[must_use]
    pub fn protection_remaining(&self, now: Tick) -> Option<Tick> {
        let ends = self.discovered_at?.saturating_add(PROTECTION_TICKS);
        (now < ends).then(|| ends - now)
    }

    // ------------------------------------------------------------------
    // Buildings
    // ------------------------------------------------------------------

    /// Building with the given id.
    #[must_use]
    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|building| building.id == id)
    }

    /// First standing building of `building_type`.
    #[must_use]
    pub fn building_of_type(&self, building_type: BuildingType) -> Option<&Building> {
        self.buildings
            .iter()
            .find(|building| building.building_type == building_type)
    }

    /// Check whether a building of `building_type` stands on the planet.
    #[must_use]
    pub fn has_building(&self, building_type: BuildingType) -> bool {
        self.building_of_type(building_type).is_some()
    }

    /// Level of the command center, or 0 without one.
    #[must_use]
    pub fn command_center_level(&self) -> u32 {
        self.building_of_type(BuildingType::CommandCenter)
            .map_or(0, |building| building.level)
    }

    /// Check whether a new building of `building_type` can be started.
    #[must_use]
    pub fn can_build_new_building(&self, building_type: BuildingType) -> bool {
        self.resources.can_afford(&building_type.build_cost())
            && !self.is_building_queued(building_type)
    }

    fn is_building_queued(&self, building_type: BuildingType) -> bool {
        self.building_queue
            .contains(|building| building.building_type == building_type)
    }

    /// Pay for and queue a new building.
    ///
    /// # Errors
    ///
    /// [`Rejection::BuildingAlreadyQueued`] if one of this type is already
    /// queued, or [`GameError::InsufficientResources`](crate::error::GameError::InsufficientResources).
    pub fn start_construction(&mut self, building_type: BuildingType, tick: Tick) -> Result<BuildingId> {
        if self.is_building_queued(building_type) {
            return Err(Rejection::BuildingAlreadyQueued.into());
        }
        self.resources.subtract(&building_type.build_cost())?;

        let id = BuildingId::new(self.allocate_id());
        self.building_queue.enqueue(
            Building::new(id, building_type),
            tick + building_type.build_time(),
        );
        tracing::debug!(planet = %self.id, ?building_type, tick, "Construction started");
        Ok(id)
    }

    /// Check whether the building can be upgraded now.
    #[must_use]
    pub fn can_upgrade_building(&self, id: BuildingId) -> bool {
        self.building(id).is_some_and(|building| {
            !building.upgrade_in_progress && self.resources.can_afford(&building.upgrade_cost())
        })
    }

    /// Pay for and start an upgrade.
    ///
    /// # Errors
    ///
    /// [`Rejection::BuildingNotFound`], [`Rejection::UpgradeInProgress`], or
    /// insufficient resources for the next level.
    pub fn upgrade_building(&mut self, id: BuildingId, tick: Tick) -> Result<()> {
        let index = self
            .buildings
            .iter()
            .position(|building| building.id == id)
            .ok_or(Rejection::BuildingNotFound)?;

        let building = &self.buildings[index];
        if building.upgrade_in_progress {
            return Err(Rejection::UpgradeInProgress.into());
        }
        self.resources.subtract(&building.upgrade_cost())?;

        let building = &mut self.buildings[index];
        building.begin_upgrade(tick);
        tracing::debug!(
            planet = %self.id,
            building_type = ?building.building_type,
            level = building.level,
            tick,
            "Upgrade started"
        );
        Ok(())
    }

    /// Ticks until the queued building of `building_type` completes.
    #[must_use]
    pub fn building_time_remaining(&self, building_type: BuildingType, now: Tick) -> Option<Tick> {
        self.building_queue
            .time_remaining(|building| building.building_type == building_type, now)
    }

    /// Check whether any building is under construction.
    #[must_use]
    pub fn is_constructing(&self) -> bool {
        !self.building_queue.is_empty()
    }

    // ------------------------------------------------------------------
    // Defenses
    // ------------------------------------------------------------------

    /// Per-type defense cap from the command center level.
    #[must_use]
    pub fn defense_limit(&self) -> usize {
        defense_limit(self.command_center_level())
    }

    /// Defenses of `defense_type`, installed plus queued.
    #[must_use]
    pub fn defense_count(&self, defense_type: DefenseType) -> usize {
        let built = self
            .defenses
            .iter()
            .filter(|defense| defense.defense_type == defense_type)
            .count();
        built + self
            .defense_queue
            .count(|defense| defense.defense_type == defense_type)
    }

    /// Check whether a defense of `defense_type` can be built now.
    #[must_use]
    pub fn can_build_defense(&self, defense_type: DefenseType) -> bool {
        self.check_defense(defense_type).is_ok()
            && self.resources.can_afford(&defense_type.build_cost())
    }

    fn check_defense(&self, defense_type: DefenseType) -> std::result::Result<(), Rejection> {
        if !self.has_building(BuildingType::CommandCenter) {
            return Err(Rejection::MissingCommandCenter);
        }
        if self.defense_count(defense_type) >= self.defense_limit() {
            return Err(Rejection::DefenseLimitReached);
        }
        Ok(())
    }

    /// Pay for and queue a defense.
    ///
    /// # Errors
    ///
    /// [`Rejection::MissingCommandCenter`], [`Rejection::DefenseLimitReached`],
    /// or insufficient resources.
    pub fn build_defense(&mut self, defense_type: DefenseType, tick: Tick) -> Result<DefenseId> {
        self.check_defense(defense_type)?;
        self.resources.subtract(&defense_type.build_cost())?;

        let id = DefenseId::new(self.allocate_id());
        self.defense_queue.enqueue(
            Defense::new(id, defense_type),
            tick + defense_type.build_ticks(),
        );
        tracing::debug!(planet = %self.id, ?defense_type, tick, "Defense construction started");
        Ok(id)
    }

    /// Ticks until the first queued defense of `defense_type` completes.
    #[must_use]
    pub fn defense_time_remaining(&self, defense_type: DefenseType, now: Tick) -> Option<Tick> {
        self.defense_queue
            .time_remaining(|defense| defense.defense_type == defense_type, now)
    }

    /// Check whether any defense is under construction.
    #[must_use]
    pub fn is_constructing_defense(&self) -> bool {
        !self.defense_queue.is_empty()
    }

    /// Shield and weapon totals of installed defenses.
    ///
    /// Shields are multiplied by `1 + bonus` once Shield Technology is
    /// researched.
    #[must_use]
    pub fn calculate_defense_power(&self) -> DefensePower {
        let shield_multiplier = if self.research.is_researched(ResearchType::ShieldTechnology) {
            Fixed::ONE + ResearchType::ShieldTechnology.bonus_effect()
        } else {
            Fixed::ONE
        };

        self.defenses
            .iter()
            .fold(DefensePower::default(), |mut power, defense| {
                let kind = defense.defense_type;
                power.shield_strength = power
                    .shield_strength
                    .saturating_add(kind.shield_strength().saturating_mul(shield_multiplier));
                power.weapon_power = power.weapon_power.saturating_add(kind.weapon_power());
                power
            })
    }

    // ------------------------------------------------------------------
    // Ships
    // ------------------------------------------------------------------

    /// Check whether every research `ship_type` needs is completed.
    #[must_use]
    pub fn is_ship_unlocked(&self, ship_type: ShipType) -> bool {
        ship_type
            .required_research()
            .iter()
            .all(|&research| self.research.is_researched(research))
    }

    /// Check whether a ship of `ship_type` can be built now.
    #[must_use]
    pub fn can_build_ship(&self, ship_type: ShipType) -> bool {
        self.check_ship(ship_type).is_ok() && self.resources.can_afford(&ship_type.build_cost())
    }

    fn check_ship(&self, ship_type: ShipType) -> std::result::Result<(), Rejection> {
        if !self.has_building(BuildingType::Shipyard) {
            return Err(Rejection::MissingShipyard);
        }
        if !self.is_ship_unlocked(ship_type) {
            return Err(Rejection::ResearchLocked);
        }
        Ok(())
    }

    /// Pay for and queue a ship in the planet's fleet.
    ///
    /// # Errors
    ///
    /// [`Rejection::MissingShipyard`], [`Rejection::ResearchLocked`], or
    /// insufficient resources.
    pub fn build_ship(&mut self, ship_type: ShipType, tick: Tick) -> Result<ShipId> {
        self.check_ship(ship_type)?;
        self.resources.subtract(&ship_type.build_cost())?;

        let id = ShipId::new(self.allocate_id());
        self.fleet
            .add_to_construction_queue(Ship::new(id, ship_type), tick + ship_type.build_time());
        tracing::debug!(planet = %self.id, ?ship_type, tick, "Ship construction started");
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Research
    // ------------------------------------------------------------------

    /// Check whether `research` can start now, including its cost.
    #[must_use]
    pub fn can_start_research(&self, research: ResearchType) -> bool {
        self.research.can_research(research)
            && !self.research.is_busy()
            && self.resources.can_afford(&research.cost())
    }

    /// Pay for and start a research.
    ///
    /// # Errors
    ///
    /// [`Rejection::ResearchUnavailable`] when already completed, already
    /// active or missing prerequisites; [`Rejection::ResearchSlotBusy`] when
    /// another research is active; otherwise insufficient resources.
    pub fn start_research(&mut self, research: ResearchType, tick: Tick) -> Result<()> {
        if !self.research.can_research(research) {
            return Err(Rejection::ResearchUnavailable.into());
        }
        if self.research.is_busy() {
            return Err(Rejection::ResearchSlotBusy.into());
        }
        self.resources.subtract(&research.cost())?;

        let started = self.research.start_research(research, tick);
        debug_assert!(started, "research validated before charging");
        tracing::debug!(planet = %self.id, ?research, tick, "Research started");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Economy
    // ------------------------------------------------------------------

    /// Hourly output of all buildings with research bonuses applied.
    #[must_use]
    pub fn calculate_resource_production(&self) -> Resources {
        let mut total = Resources::ZERO;
        for building in &self.buildings {
            let output = building.production();
            for resource in ResourceType::ALL {
                let slot = total.get_mut(resource);
                *slot = slot.saturating_add(output.get(resource));
            }
        }

        for resource in ResourceType::ALL {
            let bonus = self.research.production_bonus(resource);
            let slot = total.get_mut(resource);
            *slot = slot.saturating_mul(bonus);
        }
        total
    }

    /// Credit `ticks` worth of production to the stockpile.
    pub fn collect_production(&mut self, ticks: Tick) {
        let rate = self.calculate_resource_production();
        let elapsed = Fixed::saturating_from_num(ticks);
        let per_hour = Fixed::from_num(TICKS_PER_HOUR);

        for resource in ResourceType::ALL {
            let gained = rate.get(resource).saturating_mul(elapsed) / per_hour;
            let slot = self.resources.get_mut(resource);
            *slot = slot.saturating_add(gained);
        }
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Apply everything that is due at `tick`.
    ///
    /// Calling this twice with the same tick leaves the planet as after one
    /// call.
    pub fn update(&mut self, tick: Tick) -> Vec<PlanetEvent> {
        let mut events = Vec::new();

        // 1. Building upgrades
        for building in &mut self.buildings {
            if building.update(tick) {
                events.push(PlanetEvent::BuildingUpgraded {
                    building_id: building.id,
                    building_type: building.building_type,
                    level: building.level,
                });
            }
        }

        // 2. Fleet construction
        for ship in self.fleet.update(tick) {
            events.push(PlanetEvent::ShipCompleted {
                ship_id: ship.id,
                ship_type: ship.ship_type,
            });
        }

        // 3. Research
        if let Some(research) = self.research.update(tick) {
            events.push(PlanetEvent::ResearchCompleted(research));
        }

        // 4. Building queue
        for building in self.building_queue.drain_completed(tick) {
            events.push(PlanetEvent::BuildingCompleted {
                building_id: building.id,
                building_type: building.building_type,
            });
            self.buildings.push(building);
        }

        // 5. Defense queue
        for defense in self.defense_queue.drain_completed(tick) {
            events.push(PlanetEvent::DefenseCompleted {
                defense_id: defense.id,
                defense_type: defense.defense_type,
            });
            self.defenses.push(defense);
        }

        if !events.is_empty() {
            tracing::debug!(planet = %self.id, tick, completed = events.len(), "Planet updated");
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    fn rich_planet() -> Planet {
        let mut planet = Planet::new(PlanetId(1), "Test", 0);
        planet.resources = Resources::from_units(100_000, 100_000, 100_000);
        planet
    }

    #[test]
    fn test_new_planet_defaults() {
        let planet = Planet::new(PlanetId(7), "Nova", 3);
        assert_eq!(planet.resources, Resources::from_units(500, 300, 100));
        assert!(planet.buildings.is_empty());
        assert!(!planet.is_discovered);
        assert_eq!(planet.command_center_level(), 0);
    }

    #[test]
    fn test_starter_home() {
        let planet = Planet::starter_home(PlanetId(1), PlayerId(9), "Ada", 0);
        assert_eq!(planet.name, "Ada's Home");
        assert_eq!(planet.owner, Some(PlayerId(9)));
        assert_eq!(planet.buildings.len(), 3);
        assert_eq!(planet.command_center_level(), 1);
        assert_eq!(
            planet.calculate_resource_production(),
            Resources::from_units(30, 0, 40)
        );
    }

    #[test]
    fn test_discovery_is_one_way() {
        let mut planet = Planet::new(PlanetId(1), "Test", 0);
        assert!(!planet.is_protected(0));

        assert!(planet.discover(Location::new(1.0, 2.0), 100));
        assert!(!planet.discover(Location::new(3.0, 4.0), 200));
        assert_eq!(planet.location, Some(Location::new(1.0, 2.0)));
        assert_eq!(planet.discovered_at, Some(100));
    }

    #[test]
    fn test_protection_window() {
        let mut planet = Planet::new(PlanetId(1), "Test", 0);
        planet.discover(Location::new(0.0, 0.0), 10);

        assert!(planet.is_protected(10));
        assert_eq!(planet.protection_remaining(10), Some(PROTECTION_TICKS));
        assert!(planet.is_protected(10 + PROTECTION_TICKS - 1));
        assert!(!planet.is_protected(10 + PROTECTION_TICKS));
        assert_eq!(planet.protection_remaining(10 + PROTECTION_TICKS), None);
    }

    #[test]
    fn test_duplicate_queued_building_rejected() {
        let mut planet = rich_planet();
        planet.start_construction(BuildingType::Mine, 0).unwrap();
        let before = planet.resources;

        assert!(!planet.can_build_new_building(BuildingType::Mine));
        assert_eq!(
            planet.start_construction(BuildingType::Mine, 0),
            Err(GameError::InvalidOperation(Rejection::BuildingAlreadyQueued))
        );
        assert_eq!(planet.resources, before);
        assert!(planet.can_build_new_building(BuildingType::PowerPlant));
    }

    #[test]
    fn test_unaffordable_construction_is_atomic() {
        let mut planet = Planet::new(PlanetId(1), "Test", 0);
        let result = planet.start_construction(BuildingType::Shipyard, 0);

        assert!(matches!(result, Err(GameError::InsufficientResources { .. })));
        assert_eq!(planet.resources, Resources::from_units(500, 300, 100));
        assert!(!planet.is_constructing());
    }

    #[test]
    fn test_upgrade_rejections() {
        let mut planet = rich_planet();
        let mine = planet.place_building(BuildingType::Mine, 1);

        assert_eq!(
            planet.upgrade_building(BuildingId::new(999), 0),
            Err(GameError::InvalidOperation(Rejection::BuildingNotFound))
        );

        planet.upgrade_building(mine, 0).unwrap();
        assert!(!planet.can_upgrade_building(mine));
        assert_eq!(
            planet.upgrade_building(mine, 0),
            Err(GameError::InvalidOperation(Rejection::UpgradeInProgress))
        );

        planet.update(1);
        assert_eq!(planet.building(mine).map(|b| b.level), Some(2));
        assert!(planet.can_upgrade_building(mine));
    }

    #[test]
    fn test_defense_requires_command_center() {
        let mut planet = rich_planet();
        assert_eq!(
            planet.build_defense(DefenseType::LaserTurret, 0),
            Err(GameError::InvalidOperation(Rejection::MissingCommandCenter))
        );
    }

    #[test]
    fn test_queued_defenses_count_toward_limit() {
        let mut planet = rich_planet();
        planet.place_building(BuildingType::CommandCenter, 1);

        planet.build_defense(DefenseType::LaserTurret, 0).unwrap();
        planet.build_defense(DefenseType::LaserTurret, 0).unwrap();
        assert_eq!(planet.defense_count(DefenseType::LaserTurret), 2);
        assert!(!planet.can_build_defense(DefenseType::LaserTurret));
        assert!(planet.can_build_defense(DefenseType::PlasmaCannon));
    }

    #[test]
    fn test_ship_gates() {
        let mut planet = rich_planet();
        assert_eq!(
            planet.build_ship(ShipType::LightFighter, 0),
            Err(GameError::InvalidOperation(Rejection::MissingShipyard))
        );

        planet.place_building(BuildingType::Shipyard, 1);
        assert_eq!(
            planet.build_ship(ShipType::HeavyFighter, 0),
            Err(GameError::InvalidOperation(Rejection::ResearchLocked))
        );

        let id = planet.build_ship(ShipType::LightFighter, 0).unwrap();
        assert!(planet.fleet.is_constructing());

        let events = planet.update(1);
        assert!(events.contains(&PlanetEvent::ShipCompleted {
            ship_id: id,
            ship_type: ShipType::LightFighter,
        }));
        assert_eq!(planet.fleet.ships.len(), 1);
    }

    #[test]
    fn test_research_charged_once() {
        let mut planet = rich_planet();
        planet.start_research(ResearchType::ImprovedMining, 0).unwrap();
        let after_first = planet.resources;

        assert!(planet.research.can_research(ResearchType::AdvancedPowerSystems));
        assert!(!planet.can_start_research(ResearchType::AdvancedPowerSystems));
        assert_eq!(
            planet.start_research(ResearchType::AdvancedPowerSystems, 0),
            Err(GameError::InvalidOperation(Rejection::ResearchSlotBusy))
        );
        assert_eq!(
            planet.start_research(ResearchType::ImprovedMining, 0),
            Err(GameError::InvalidOperation(Rejection::ResearchUnavailable))
        );
        assert_eq!(planet.resources, after_first);

        let events = planet.update(1);
        assert_eq!(events, vec![PlanetEvent::ResearchCompleted(ResearchType::ImprovedMining)]);
    }

    #[test]
    fn test_production_with_research_bonus() {
        let mut planet = rich_planet();
        planet.place_building(BuildingType::Mine, 1);
        planet.place_building(BuildingType::PowerPlant, 1);

        planet.start_research(ResearchType::ImprovedMining, 0).unwrap();
        planet.update(1);

        let production = planet.calculate_resource_production();
        assert_eq!(production.metal, Fixed::from_num(37.5));
        assert_eq!(production.energy, Fixed::from_num(40));
    }

    #[test]
    fn test_collect_full_hour() {
        let mut planet = Planet::new(PlanetId(1), "Test", 0);
        planet.resources = Resources::ZERO;
        planet.place_building(BuildingType::Mine, 1);
        planet.place_building(BuildingType::PowerPlant, 1);

        planet.collect_production(TICKS_PER_HOUR);
        assert_eq!(planet.resources, Resources::from_units(30, 0, 40));
    }

    #[test]
    fn test_defense_power_shield_bonus() {
        let mut planet = rich_planet();
        planet.place_building(BuildingType::CommandCenter, 1);
        planet.build_defense(DefenseType::LaserTurret, 0).unwrap();
        planet.update(1);

        let power = planet.calculate_defense_power();
        assert_eq!(power.shield_strength, Fixed::from_num(100));
        assert_eq!(power.weapon_power, Fixed::from_num(150));

        planet.research.start_research(ResearchType::AdvancedPowerSystems, 1);
        planet.update(2);
        planet.research.start_research(ResearchType::ImprovedMining, 2);
        planet.update(3);
        planet.research.start_research(ResearchType::EnhancedShipHulls, 3);
        planet.update(4);
        planet.research.start_research(ResearchType::ShieldTechnology, 4);
        planet.update(5);

        let boosted = planet.calculate_defense_power().shield_strength;
        assert!((boosted - Fixed::from_num(145)).abs() < Fixed::from_num(0.001));
    }

    #[test]
    fn test_update_idempotent() {
        let mut planet = rich_planet();
        planet.place_building(BuildingType::CommandCenter, 1);
        planet.start_construction(BuildingType::Mine, 0).unwrap();
        planet.build_defense(DefenseType::LaserTurret, 0).unwrap();

        let first = planet.update(1);
        assert_eq!(first.len(), 2);
        let snapshot = planet.clone();

        assert!(planet.update(1).is_empty());
        assert_eq!(planet, snapshot);
    }
}
