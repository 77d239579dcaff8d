//! Research catalog and per-planet research progress.
//!
//! The catalog is a fixed directed acyclic graph: each research lists its
//! prerequisites, and a research can only start once all of them are
//! completed. At most one research is active per planet.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::clock::Tick;
use crate::error::{GameError, Result};
use crate::math::{percent, Fixed};
use crate::resources::{ResourceType, Resources};

/// A researchable technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResearchType {
    /// Raises metal and crystal output.
    ImprovedMining,
    /// Raises energy output.
    AdvancedPowerSystems,
    /// Unlocks heavier hulls.
    EnhancedShipHulls,
    /// Unlocks cruisers.
    WeaponSystems,
    /// Strengthens planetary shields and unlocks battleships.
    ShieldTechnology,
    /// Faster ship travel.
    AdvancedPropulsion,
}

impl ResearchType {
    /// Every research, in catalog order.
    pub const ALL: [Self; 6] = [
        Self::ImprovedMining,
        Self::AdvancedPowerSystems,
        Self::EnhancedShipHulls,
        Self::WeaponSystems,
        Self::ShieldTechnology,
        Self::AdvancedPropulsion,
    ];

    /// Human readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::ImprovedMining => "Improved Mining",
            Self::AdvancedPowerSystems => "Advanced Power Systems",
            Self::EnhancedShipHulls => "Enhanced Ship Hulls",
            Self::WeaponSystems => "Weapon Systems",
            Self::ShieldTechnology => "Shield Technology",
            Self::AdvancedPropulsion => "Advanced Propulsion",
        }
    }

    /// Effect summary for UI surfaces.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ImprovedMining => "Increases mining efficiency",
            Self::AdvancedPowerSystems => "Improves energy production",
            Self::EnhancedShipHulls => "Stronger ship construction",
            Self::WeaponSystems => "More powerful weapons",
            Self::ShieldTechnology => "Better defensive shields",
            Self::AdvancedPropulsion => "Faster ship movement",
        }
    }

    /// Cost to start this research.
    #[must_use]
    pub fn cost(self) -> Resources {
        match self {
            Self::ImprovedMining => Resources::from_units(1000, 500, 200),
            Self::AdvancedPowerSystems => Resources::from_units(800, 1000, 300),
            Self::EnhancedShipHulls => Resources::from_units(1500, 800, 400),
            Self::WeaponSystems => Resources::from_units(2000, 1500, 500),
            Self::ShieldTechnology => Resources::from_units(1800, 2000, 600),
            Self::AdvancedPropulsion => Resources::from_units(1200, 1800, 400),
        }
    }

    /// Ticks from start to completion.
    #[must_use]
    pub const fn research_time(self) -> Tick {
        1
    }

    /// Research that must be completed before this one can start.
    #[must_use]
    pub const fn prerequisites(self) -> &'static [Self] {
        match self {
            Self::ImprovedMining | Self::AdvancedPowerSystems => &[],
            Self::EnhancedShipHulls => &[Self::ImprovedMining],
            Self::WeaponSystems => &[Self::AdvancedPowerSystems],
            Self::ShieldTechnology => &[Self::AdvancedPowerSystems, Self::EnhancedShipHulls],
            Self::AdvancedPropulsion => &[Self::EnhancedShipHulls],
        }
    }

    /// Bonus granted on completion, as an integer percentage.
    #[must_use]
    pub const fn bonus_percent(self) -> i32 {
        match self {
            Self::ImprovedMining => 25,
            Self::AdvancedPowerSystems => 30,
            Self::EnhancedShipHulls => 40,
            Self::WeaponSystems => 35,
            Self::ShieldTechnology => 45,
            Self::AdvancedPropulsion => 20,
        }
    }

    /// Bonus as a fraction (`0.25` for 25%).
    #[must_use]
    pub fn bonus_effect(self) -> Fixed {
        percent(self.bonus_percent())
    }
}

impl std::fmt::Display for ResearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Order the catalog so every research appears after its prerequisites.
///
/// # Errors
///
/// Returns [`GameError::InvalidCatalog`] if the prerequisite graph has a cycle.
pub fn topological_order() -> Result<Vec<ResearchType>> {
    order_by_prerequisites(&ResearchType::ALL, |research| {
        research.prerequisites().to_vec()
    })
}

/// Kahn's algorithm over an arbitrary prerequisite relation.
///
/// Ties are broken by `Ord` so the result is stable.
pub(crate) fn order_by_prerequisites<T, F>(nodes: &[T], prerequisites: F) -> Result<Vec<T>>
where
    T: Copy + Ord + std::fmt::Debug,
    F: Fn(T) -> Vec<T>,
{
    let mut pending: BTreeMap<T, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<T, Vec<T>> = BTreeMap::new();

    for &node in nodes {
        let requires = prerequisites(node);
        pending.insert(node, requires.len());
        for required in requires {
            dependents.entry(required).or_default().push(node);
        }
    }

    let mut ready: BTreeSet<T> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(&node, _)| node)
        .collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(node) = ready.pop_first() {
        order.push(node);
        for dependent in dependents.get(&node).into_iter().flatten() {
            if let Some(count) = pending.get_mut(dependent) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(*dependent);
                }
            }
        }
    }

    if order.len() == nodes.len() {
        Ok(order)
    } else {
        let stuck: Vec<T> = pending
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(node, _)| node)
            .collect();
        Err(GameError::InvalidCatalog(format!(
            "prerequisite cycle involving {stuck:?}"
        )))
    }
}

/// A research in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveResearch {
    /// What is being researched.
    pub research: ResearchType,
    /// Tick at which it completes.
    pub completion_tick: Tick,
}

/// Research state of one planet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ResearchSystem {
    completed: BTreeSet<ResearchType>,
    current: Option<ActiveResearch>,
}

impl ResearchSystem {
    /// Nothing researched, nothing active.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `research` is completed.
    #[must_use]
    pub fn is_researched(&self, research: ResearchType) -> bool {
        self.completed.contains(&research)
    }

    /// Check whether `research` is the active research.
    #[must_use]
    pub fn is_researching(&self, research: ResearchType) -> bool {
        self.current.is_some_and(|active| active.research == research)
    }

    /// Check whether `research` is available: not completed, not the
    /// active research, and every prerequisite completed.
    ///
    /// Another research being active does not make `research` unavailable;
    /// [`start_research`](Self::start_research) still needs a free slot.
    /// Affordability is the planet's concern.
    #[must_use]
    pub fn can_research(&self, research: ResearchType) -> bool {
        !self.is_researched(research)
            && !self.is_researching(research)
            && research
                .prerequisites()
                .iter()
                .all(|&required| self.is_researched(required))
    }

    /// Whether any research is active.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    /// Start `research` at `tick`. Returns `false` and changes nothing when
    /// [`can_research`](Self::can_research) does not hold or another
    /// research is active.
    pub fn start_research(&mut self, research: ResearchType, tick: Tick) -> bool {
        if !self.can_research(research) || self.is_busy() {
            return false;
        }
        self.current = Some(ActiveResearch {
            research,
            completion_tick: tick + research.research_time(),
        });
        true
    }

    /// Complete the active research if it is due. Returns the completed item.
    pub fn update(&mut self, tick: Tick) -> Option<ResearchType> {
        let active = self.current?;
        if tick < active.completion_tick {
            return None;
        }
        self.current = None;
        self.completed.insert(active.research);
        tracing::debug!(research = ?active.research, tick, "Research completed");
        Some(active.research)
    }

    /// Ticks until `research` completes, if it is the active research.
    #[must_use]
    pub fn time_remaining(&self, research: ResearchType, now: Tick) -> Option<Tick> {
        self.current
            .filter(|active| active.research == research)
            .map(|active| active.completion_tick.saturating_sub(now))
    }

    /// Production multiplier for a resource from completed research.
    #[must_use]
    pub fn production_bonus(&self, resource: ResourceType) -> Fixed {
        let source = match resource {
            ResourceType::Metal | ResourceType::Crystal => ResearchType::ImprovedMining,
            ResourceType::Energy => ResearchType::AdvancedPowerSystems,
        };
        if self.is_researched(source) {
            Fixed::ONE + source.bonus_effect()
        } else {
            Fixed::ONE
        }
    }

    /// The active research, if any.
    #[must_use]
    pub const fn current(&self) -> Option<ActiveResearch> {
        self.current
    }

    /// Completed research in catalog order.
    pub fn completed(&self) -> impl Iterator<Item = ResearchType> + '_ {
        self.completed.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_acyclic() {
        let order = topological_order().unwrap();
        assert_eq!(order.len(), ResearchType::ALL.len());

        for (position, research) in order.iter().enumerate() {
            for required in research.prerequisites() {
                let required_position = order.iter().position(|r| r == required).unwrap();
                assert!(required_position < position, "{required} must precede {research}");
            }
        }
    }

    #[test]
    fn test_cycle_detected() {
        let result = order_by_prerequisites(&[1_u8, 2, 3], |node| match node {
            1 => vec![3],
            2 => vec![1],
            3 => vec![2],
            _ => vec![],
        });
        assert!(matches!(result, Err(GameError::InvalidCatalog(_))));
    }

    #[test]
    fn test_prerequisites_gate_start() {
        let mut research = ResearchSystem::new();

        assert!(!research.can_research(ResearchType::EnhancedShipHulls));
        assert!(!research.start_research(ResearchType::EnhancedShipHulls, 0));
        assert_eq!(research.current(), None);

        assert!(research.start_research(ResearchType::ImprovedMining, 0));
        assert_eq!(research.update(1), Some(ResearchType::ImprovedMining));

        assert!(research.can_research(ResearchType::EnhancedShipHulls));
    }

    #[test]
    fn test_single_active_research() {
        let mut research = ResearchSystem::new();
        assert!(research.start_research(ResearchType::ImprovedMining, 10));

        assert!(research.is_researching(ResearchType::ImprovedMining));
        assert!(research.is_busy());
        assert!(research.can_research(ResearchType::AdvancedPowerSystems));
        assert!(!research.start_research(ResearchType::AdvancedPowerSystems, 10));
        assert_eq!(research.current().map(|a| a.research), Some(ResearchType::ImprovedMining));
        assert_eq!(research.time_remaining(ResearchType::ImprovedMining, 10), Some(1));
        assert_eq!(research.time_remaining(ResearchType::AdvancedPowerSystems, 10), None);
    }

    #[test]
    fn test_availability_ignores_other_active_research() {
        let mut research = ResearchSystem::new();
        assert!(research.start_research(ResearchType::ImprovedMining, 0));

        // The active item itself is unavailable, everything unlocked is not.
        assert!(!research.can_research(ResearchType::ImprovedMining));
        assert!(research.can_research(ResearchType::AdvancedPowerSystems));
        assert!(!research.can_research(ResearchType::EnhancedShipHulls));

        research.update(1);
        assert!(!research.can_research(ResearchType::ImprovedMining));
        assert!(research.can_research(ResearchType::EnhancedShipHulls));
    }

    #[test]
    fn test_catalog_text() {
        assert_eq!(ResearchType::ShieldTechnology.display_name(), "Shield Technology");
        assert_eq!(
            ResearchType::ImprovedMining.description(),
            "Increases mining efficiency"
        );
    }

    #[test]
    fn test_update_only_when_due() {
        let mut research = ResearchSystem::new();
        research.start_research(ResearchType::AdvancedPowerSystems, 5);

        assert_eq!(research.update(5), None);
        assert_eq!(research.update(6), Some(ResearchType::AdvancedPowerSystems));
        assert_eq!(research.update(6), None);
        assert!(research.is_researched(ResearchType::AdvancedPowerSystems));
        assert!(!research.can_research(ResearchType::AdvancedPowerSystems));
    }

    #[test]
    fn test_production_bonus() {
        let mut research = ResearchSystem::new();
        assert_eq!(research.production_bonus(ResourceType::Metal), Fixed::ONE);

        research.start_research(ResearchType::ImprovedMining, 0);
        research.update(1);

        assert_eq!(research.production_bonus(ResourceType::Metal), Fixed::from_num(1.25));
        assert_eq!(research.production_bonus(ResourceType::Crystal), Fixed::from_num(1.25));
        assert_eq!(research.production_bonus(ResourceType::Energy), Fixed::ONE);
    }
}
