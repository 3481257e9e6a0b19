//! Whole-crate properties of the steering engine, checked over seeded runs.

use nannou::prelude::{vec2, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use swarm::behavior::{Alignment, Cohesion, Separation};
use swarm::environment::StillEnvironment;
use swarm::light::LightSource;
use swarm::mosquito::Circling;
use swarm::obstacle::{Obstacle, AVOIDANCE_MARGIN};
use swarm::vector::{shortest_angle_delta, SteerVec};
use swarm::wind::WindField;
use swarm::{AgentConfig, BehaviorKind, BehaviorPipeline, Neighbor, Personality, Scene, Simulation, SimulationParams};

const DT: f32 = 1.0 / 60.0;
const EPS: f32 = 1e-3;

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn seeded_simulation(scene: Scene, seed: u64) -> Simulation {
    let params = SimulationParams {
        agent_count: 40,
        bounds: swarm::WorldBounds::new(400.0, 300.0),
        ..SimulationParams::for_scene(scene)
    };
    Simulation::with_seed(params, seed).expect("valid params")
}

#[test]
fn speed_never_exceeds_the_limit() {
    for scene in [Scene::Fish, Scene::Mosquitoes] {
        for seed in 0..4 {
            let mut sim = seeded_simulation(scene, seed);
            sim.add_obstacle_at(200.0, 150.0);
            sim.add_light_at(100.0, 100.0);

            for tick in 0..240 {
                // Sweep the pointer to stir up some wind
                let x = (tick as f32 * 7.0) % 400.0;
                sim.pointer_moved(x, 150.0, tick % 60 < 30);
                sim.step(DT);

                for agent in sim.agents() {
                    assert!(
                        agent.speed() <= agent.max_speed + EPS,
                        "{scene} seed {seed}: speed {} > {}",
                        agent.speed(),
                        agent.max_speed
                    );
                    assert!(agent.position.x.is_finite() && agent.position.y.is_finite());
                }
            }
        }
    }
}

#[test]
fn heading_turns_no_faster_than_the_turn_rate() {
    for scene in [Scene::Fish, Scene::Mosquitoes] {
        for seed in 0..4 {
            let mut sim = seeded_simulation(scene, seed);
            sim.add_light_at(200.0, 150.0);

            for _ in 0..180 {
                let before: Vec<(Vec2, f32)> = sim.agents().iter().map(|a| (a.heading, a.speed())).collect();
                sim.step(DT);

                for (agent, (heading, speed)) in sim.agents().iter().zip(before) {
                    // Resting agents have no committed direction
                    if speed <= 1e-3 {
                        continue;
                    }
                    let turned = shortest_angle_delta(heading.angle(), agent.heading.angle()).abs();
                    assert!(
                        turned <= agent.max_turn_rate * DT + EPS,
                        "{scene} seed {seed}: turned {turned} rad in one tick"
                    );
                }
            }
        }
    }
}

#[test]
fn combined_steering_respects_max_force() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut world = StillEnvironment::default();
    world.obstacles.add(Obstacle::new(vec2(50.0, 50.0), 30.0));
    world.lights.add(LightSource::new(vec2(60.0, 40.0), 60.0, 25.0, 0.0));

    for personality in [Personality::Fish, Personality::Swarming, Personality::Circling] {
        for _ in 0..50 {
            let agent = AgentConfig {
                position: vec2(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)),
                personality: Some(personality),
                avoid_obstacles: true,
                ..AgentConfig::mosquito()
            }
            .build(&mut rng)
            .expect("valid config");

            let crowd: Vec<Neighbor> = (0..8)
                .map(|_| Neighbor {
                    position: agent.position + vec2(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0)),
                    velocity: vec2(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)),
                })
                .collect();

            let force = agent.pipeline().combine(&agent, &crowd, &world.view(), &mut rng);
            assert!(force.length() <= agent.max_force + EPS);
        }
    }
}

#[test]
fn separation_is_zero_alone_and_repulsive_in_company() {
    let mut rng = StdRng::seed_from_u64(5);
    let agent = AgentConfig {
        position: vec2(100.0, 100.0),
        velocity: Some(Vec2::ZERO),
        ..AgentConfig::default()
    }
    .build(&mut rng)
    .expect("valid config");
    let rule = Separation::new(1.0, 20.0);

    assert_eq!(rule.compute_force(&agent, &[]), Vec2::ZERO);

    let far = [Neighbor { position: vec2(130.0, 100.0), velocity: Vec2::ZERO }];
    assert_eq!(rule.compute_force(&agent, &far), Vec2::ZERO);

    for _ in 0..100 {
        let offset = vec2(rng.gen_range(-19.0..19.0), rng.gen_range(-19.0..19.0));
        if offset.length() < 0.5 || offset.length() >= 20.0 {
            continue;
        }
        let close = [Neighbor { position: agent.position + offset, velocity: Vec2::ZERO }];
        let force = rule.compute_force(&agent, &close);
        assert!(force.dot(offset) < 0.0, "offset {offset:?} force {force:?}");
    }
}

#[test]
fn obstacle_avoidance_has_a_hard_edge() {
    let mut rng = StdRng::seed_from_u64(8);
    let obstacle = Obstacle::new(vec2(0.0, 0.0), 30.0);
    let agent_radius = 3.0;
    let reach = 30.0 + agent_radius + AVOIDANCE_MARGIN;

    for step in 0..360 {
        let direction = swarm::vector::from_angle((step as f32).to_radians());

        let outside = direction * (reach + 0.01);
        assert_eq!(obstacle.avoidance_force(outside, agent_radius, &mut rng), Vec2::ZERO);

        let inside = direction * (reach - 5.0);
        let force = obstacle.avoidance_force(inside, agent_radius, &mut rng);
        assert!(force.dot(direction) > 0.0);
        assert!(approx_eq(force.length(), 5.0 / AVOIDANCE_MARGIN * 100.0, 1e-2));
    }
}

#[test]
fn config_values_survive_construction() {
    let mut rng = StdRng::seed_from_u64(1);
    let agent = AgentConfig {
        mass: 2.0,
        max_speed: 10.0,
        max_force: 5.0,
        ..AgentConfig::default()
    }
    .build(&mut rng)
    .expect("valid config");

    assert_eq!(agent.mass, 2.0);
    assert_eq!(agent.max_speed, 10.0);
    assert_eq!(agent.max_force, 5.0);
}

#[test]
fn two_resting_agents_push_each_other_apart() {
    let mut rng = StdRng::seed_from_u64(2);
    let world = StillEnvironment::default();

    let make = |x: f32, rng: &mut StdRng| {
        let mut agent = AgentConfig {
            position: vec2(x, 100.0),
            velocity: Some(Vec2::ZERO),
            ..AgentConfig::default()
        }
        .build(rng)
        .expect("valid config");

        let mut pipeline = BehaviorPipeline::new(agent.max_force);
        pipeline.add(Separation::new(1.0, 20.0).into()).expect("empty pipeline");
        *agent.pipeline_mut() = pipeline;
        agent
    };

    let mut left = make(100.0, &mut rng);
    let mut right = make(105.0, &mut rng);
    let (left_before, right_before) = (left.snapshot(), right.snapshot());

    left.update(DT, &[right_before], &world.view(), &mut rng);
    right.update(DT, &[left_before], &world.view(), &mut rng);

    assert!(left.position.x < left_before.position.x);
    assert!(right.position.x > right_before.position.x);
    assert!(left.position.distance(right.position) > 5.0);
}

#[test]
fn lonely_agent_feels_no_cohesion_or_alignment() {
    let mut rng = StdRng::seed_from_u64(3);
    let world = StillEnvironment::default();
    let agent = AgentConfig {
        position: vec2(50.0, 50.0),
        ..AgentConfig::default()
    }
    .build(&mut rng)
    .expect("valid config");

    let mut pipeline = BehaviorPipeline::new(agent.max_force);
    pipeline.add(Cohesion::new(1.0, 60.0).into()).expect("empty pipeline");
    pipeline.add(Alignment::new(1.0, 35.0).into()).expect("new kind");

    assert_eq!(pipeline.combine(&agent, &[], &world.view(), &mut rng), Vec2::ZERO);
}

#[test]
fn wind_dies_when_the_pointer_rests() {
    let mut wind = WindField::new();
    wind.update(vec2(0.0, 0.0), true, DT);
    wind.update(vec2(30.0, 0.0), true, DT);
    assert!(wind.has_wind());

    // A little over two seconds of a still, held pointer
    for _ in 0..(2.1 / DT) as usize {
        wind.update(vec2(30.0, 0.0), true, DT);
    }
    assert_eq!(wind.strength(), 0.0);
    assert!(!wind.has_wind());
}

#[test]
fn circling_on_a_light_center_stays_finite() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut world = StillEnvironment::default();
    world.lights.add(LightSource::new(vec2(80.0, 80.0), 60.0, 25.0, 0.0));

    let agent = AgentConfig {
        position: vec2(80.0, 80.0),
        personality: Some(Personality::Circling),
        ..AgentConfig::mosquito()
    }
    .build(&mut rng)
    .expect("valid config");

    let rule = Circling::default();
    for _ in 0..500 {
        let force = rule.compute_force(&agent, &[], &world.view(), &mut rng);
        assert!(force.x.is_finite() && force.y.is_finite());
        assert!(force.length() < 10.0 * agent.max_force);
    }

    let combined = agent.pipeline().combine(&agent, &[], &world.view(), &mut rng);
    assert!(combined.length() <= agent.max_force + EPS);
}

#[test]
fn paused_world_stands_still() {
    let mut sim = seeded_simulation(Scene::Fish, 9);
    sim.params_mut().pause_simulation = true;
    let before: Vec<Vec2> = sim.agents().iter().map(|a| a.position).collect();

    for _ in 0..30 {
        sim.step(DT);
    }

    let after: Vec<Vec2> = sim.agents().iter().map(|a| a.position).collect();
    assert_eq!(before, after);
    assert_eq!(sim.elapsed(), 0.0);
}

#[test]
fn settings_errors_are_reported_not_swallowed() {
    let mut sim = seeded_simulation(Scene::Mosquitoes, 1);
    assert_eq!(
        sim.set_behavior_weight(BehaviorKind::Separation, 2.0),
        Err(swarm::SwarmError::BehaviorNotFound(BehaviorKind::Separation))
    );
    assert!(matches!(
        sim.set_behavior_weight(BehaviorKind::Circling, -1.0),
        Err(swarm::SwarmError::InvalidConfig(_))
    ));
    assert!(matches!(
        sim.set_behavior_radius(BehaviorKind::Swimming, 10.0),
        Err(swarm::SwarmError::InvalidConfig(_))
    ));
}
