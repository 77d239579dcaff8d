//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation produces
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! A saved session must continue exactly as the live one would have.
//! Sources of non-determinism include:
//!
//! - **Floating-point math**: economy and combat use
//!   [`stargo_core::math::Fixed`] throughout.
//!
//! - **HashMap iteration order**: planets and players live in `BTreeMap`s
//!   and are always visited in id order.
//!
//! - **System randomness**: attack targeting and planet generation draw
//!   from the session's seeded RNG only.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use stargo_core::simulation::Simulation;
use stargo_core::snapshot::Snapshot;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Run two sessions from the same setup and compare final hashes.
pub fn verify_simulation_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    verify_determinism(
        2,
        num_ticks,
        &setup_fn,
        |sim| {
            sim.tick();
        },
        Simulation::state_hash,
    )
    .is_deterministic
}

/// Run `num_sims` sessions on scoped threads and collect final hashes.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_simulations<F>(setup_fn: F, num_sims: usize, num_ticks: u64) -> DeterminismResult
where
    F: Fn() -> Simulation + Sync,
{
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    for _ in 0..num_ticks {
                        sim.tick();
                    }
                    sim.state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        ticks: num_ticks,
    }
}

/// Compare two runs tick-by-tick and report the first tick where they differ.
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        sim1.tick();
        sim2.tick();

        if sim1.state_hash() != sim2.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Check that a session saved after `before` ticks and restored continues
/// identically to the uninterrupted run for another `after` ticks.
pub fn verify_snapshot_continuity<F>(setup_fn: F, before: u64, after: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let mut live = setup_fn();
    for _ in 0..before {
        live.tick();
    }

    let restored = Snapshot::capture(&live)
        .to_bytes()
        .and_then(|bytes| Snapshot::from_bytes(&bytes));
    let Ok(snapshot) = restored else {
        return false;
    };
    let mut resumed = snapshot.into_simulation();

    for _ in 0..after {
        live.tick();
        resumed.tick();
    }

    tracing::debug!(
        live = live.state_hash(),
        resumed = resumed.state_hash(),
        "Snapshot continuity"
    );
    live.state_hash() == resumed.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for simulation testing.
pub mod strategies {
    use proptest::prelude::*;
    use stargo_core::buildings::BuildingType;
    use stargo_core::defenses::DefenseType;
    use stargo_core::math::Fixed;
    use stargo_core::research::ResearchType;
    use stargo_core::resources::Resources;
    use stargo_core::ships::ShipType;

    /// A non-negative amount with a fractional part (eighths).
    pub fn arb_amount() -> impl Strategy<Value = Fixed> {
        (0i32..200_000).prop_map(|eighths| Fixed::from_num(eighths) / Fixed::from_num(8))
    }

    /// A resource amount in a typical mid-game range.
    pub fn arb_resources() -> impl Strategy<Value = Resources> {
        (arb_amount(), arb_amount(), arb_amount())
            .prop_map(|(metal, crystal, energy)| Resources::new(metal, crystal, energy))
    }

    /// Any building type.
    pub fn arb_building_type() -> impl Strategy<Value = BuildingType> {
        proptest::sample::select(BuildingType::ALL.to_vec())
    }

    /// Any defense type.
    pub fn arb_defense_type() -> impl Strategy<Value = DefenseType> {
        proptest::sample::select(DefenseType::ALL.to_vec())
    }

    /// Any ship class.
    pub fn arb_ship_type() -> impl Strategy<Value = ShipType> {
        proptest::sample::select(ShipType::ALL.to_vec())
    }

    /// Any research.
    pub fn arb_research_type() -> impl Strategy<Value = ResearchType> {
        proptest::sample::select(ResearchType::ALL.to_vec())
    }

    /// A planet-level action, as the tag of what to attempt.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum PlanetAction {
        /// Start a building.
        Build(BuildingType),
        /// Upgrade the nth building (modulo the building count).
        Upgrade(usize),
        /// Queue a defense.
        Defend(DefenseType),
        /// Queue a ship.
        Ship(ShipType),
        /// Start a research.
        Research(ResearchType),
        /// Let a tick pass.
        Wait,
    }

    /// A random planet action.
    pub fn arb_planet_action() -> impl Strategy<Value = PlanetAction> {
        prop_oneof![
            arb_building_type().prop_map(PlanetAction::Build),
            (0usize..8).prop_map(PlanetAction::Upgrade),
            arb_defense_type().prop_map(PlanetAction::Defend),
            arb_ship_type().prop_map(PlanetAction::Ship),
            arb_research_type().prop_map(PlanetAction::Research),
            Just(PlanetAction::Wait),
        ]
    }

    /// A sequence of planet actions.
    pub fn arb_action_sequence(max_len: usize) -> impl Strategy<Value = Vec<PlanetAction>> {
        proptest::collection::vec(arb_planet_action(), 0..max_len)
    }
}
