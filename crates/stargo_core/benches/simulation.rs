//! Simulation benchmarks for stargo_core.
//!
//! Run with: `cargo bench -p stargo_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use stargo_core::clock::TICKS_PER_HOUR;
use stargo_core::prelude::*;
use stargo_core::ships::ShipId;

fn populated_session(players: u32) -> Simulation {
    let mut sim = Simulation::new(42);
    for n in 0..players {
        let player = sim.register_player(&format!("Player {n}"));
        let Some(home) = sim.player(player).map(|p| p.home_planet) else {
            continue;
        };
        if let Some(planet) = sim.planet_mut(home) {
            planet.resources = Resources::from_units(1_000_000, 1_000_000, 1_000_000);
            planet.place_building(BuildingType::Shipyard, 1);
            for id in 0..10 {
                planet
                    .fleet
                    .add_ship(Ship::new(ShipId::new(1000 + id), ShipType::LightFighter));
            }
        }
    }
    sim
}

/// Runs simulation benchmarks for the stargo_core crate.
pub fn simulation_benchmark(c: &mut Criterion) {
    c.bench_function("tick_100_planets", |b| {
        b.iter_batched(
            || populated_session(100),
            |mut sim| {
                for _ in 0..60 {
                    black_box(sim.tick());
                }
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("state_hash_100_planets", |b| {
        let sim = populated_session(100);
        b.iter(|| black_box(sim.state_hash()));
    });

    c.bench_function("snapshot_roundtrip_100_planets", |b| {
        let snapshot = Snapshot::capture(&populated_session(100));
        b.iter(|| {
            let bytes = snapshot.to_bytes().unwrap_or_default();
            black_box(Snapshot::from_bytes(&bytes).is_ok())
        });
    });

    c.bench_function("production_hour", |b| {
        let sim = populated_session(1);
        let planet = sim.planets().next().cloned();
        b.iter_batched(
            || planet.clone(),
            |planet| {
                if let Some(mut planet) = planet {
                    planet.collect_production(TICKS_PER_HOUR);
                    black_box(planet.resources);
                }
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, simulation_benchmark);
criterion_main!(benches);
