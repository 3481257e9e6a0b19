/*
 * Swarm Simulation Benchmark
 *
 * Measures neighbor discovery (pairwise scan, spatial grid, parallel grid),
 * the combined steering of a single agent, and the full simulation tick for
 * both scenes at several population sizes.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nannou::prelude::vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use swarm::environment::StillEnvironment;
use swarm::neighbors::{find_neighbors, NeighborSearch};
use swarm::{AgentConfig, Neighbor, Scene, Simulation, SimulationParams, WorldBounds};

const SIZES: [usize; 4] = [100, 500, 1000, 2000];
const DT: f32 = 1.0 / 60.0;

fn world() -> WorldBounds {
    WorldBounds::new(2000.0, 1500.0)
}

fn random_snapshot(count: usize, bounds: WorldBounds, rng: &mut StdRng) -> Vec<Neighbor> {
    (0..count)
        .map(|_| Neighbor {
            position: bounds.random_point(rng),
            velocity: vec2(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)),
        })
        .collect()
}

// Benchmark neighbor discovery with each search strategy
fn bench_neighbor_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_search");
    let bounds = world();

    for &count in SIZES.iter() {
        let mut rng = StdRng::seed_from_u64(7);
        let snapshot = random_snapshot(count, bounds, &mut rng);
        let radii = vec![90.0; count];

        let strategies = [
            ("pairwise", NeighborSearch::Pairwise, false),
            ("grid", NeighborSearch::Grid, false),
            ("grid_parallel", NeighborSearch::Grid, true),
        ];
        for (name, search, parallel) in strategies {
            group.bench_with_input(BenchmarkId::new(name, count), &count, |b, _| {
                b.iter(|| black_box(find_neighbors(&snapshot, &radii, bounds, search, parallel)));
            });
        }
    }

    group.finish();
}

// Benchmark one agent's combined steering in a crowd
fn bench_steering(c: &mut Criterion) {
    let mut group = c.benchmark_group("steering");
    let world = StillEnvironment::default();

    for neighbor_count in [5usize, 20, 80] {
        let mut rng = StdRng::seed_from_u64(11);
        let agent = AgentConfig {
            position: vec2(100.0, 100.0),
            ..AgentConfig::default()
        }
        .build(&mut rng)
        .expect("valid config");
        let crowd: Vec<Neighbor> = (0..neighbor_count)
            .map(|_| Neighbor {
                position: agent.position + vec2(rng.gen_range(-60.0..60.0), rng.gen_range(-60.0..60.0)),
                velocity: vec2(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)),
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(neighbor_count), &crowd, |b, crowd| {
            b.iter(|| black_box(agent.pipeline().combine(&agent, crowd, &world.view(), &mut rng)));
        });
    }

    group.finish();
}

// Benchmark the overall simulation tick
fn bench_simulation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");

    for scene in [Scene::Fish, Scene::Mosquitoes] {
        for &count in SIZES.iter() {
            let params = SimulationParams {
                agent_count: count,
                bounds: world(),
                ..SimulationParams::for_scene(scene)
            };
            let mut simulation = Simulation::with_seed(params, 3).expect("valid params");
            simulation.add_obstacle_at(1000.0, 750.0);
            simulation.add_light_at(600.0, 400.0);

            group.bench_function(BenchmarkId::new(scene.to_string(), count), |b| {
                b.iter(|| simulation.step(black_box(DT)));
            });
        }
    }

    group.finish();
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_neighbor_search, bench_steering, bench_simulation_step
}

criterion_main!(benches);
