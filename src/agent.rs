/*
 * Agent Module
 *
 * A single fish or mosquito. Each agent owns its physical state, its
 * limits and its behavior pipeline. `update` turns the pipeline output plus
 * environmental forces into motion:
 *
 * 1. Combine the pipeline forces (already clamped to max_force)
 * 2. Add wind, and for jittery personalities a nervous random impulse
 * 3. Re-clamp, then integrate acceleration with mild damping
 * 4. Limit the turn, then the speed
 * 5. Move, refresh heading, wrap around the world and record the trail
 */

use nannou::prelude::{vec2, Vec2};
use rand::Rng;

use crate::environment::Environment;
use crate::error::{SwarmError, SwarmResult};
use crate::path_trace::{PathTrace, DEFAULT_PATH_LENGTH};
use crate::pipeline::{BehaviorPipeline, BehaviorSettings};
use crate::vector::{gaussian_vec, limit_turn, random_unit, SteerVec};

// Velocity retained per 60 Hz reference frame
const DAMPING: f32 = 0.995;
const REFERENCE_FPS: f32 = 60.0;

// Below this speed an agent has no committed direction to turn away from
const REST_SPEED: f32 = 1e-3;

const NERVOUSNESS: f32 = 0.2;
const MIN_WANDER: f32 = 0.1;
const MAX_WANDER: f32 = 1.0;
// How quickly (per second) the wander factor follows its target
const WANDER_RESPONSE: f32 = 2.0;

/// Position and velocity of another agent, captured before anyone moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// The world spans `0..width` by `0..height` and wraps at the edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width / 2.0, self.height / 2.0)
    }

    pub fn random_point(&self, rng: &mut impl Rng) -> Vec2 {
        vec2(
            rng.gen_range(0.0..self.width.max(f32::EPSILON)),
            rng.gen_range(0.0..self.height.max(f32::EPSILON)),
        )
    }

    /// Wraps a point that has left the world by more than `offset` to just
    /// beyond the opposite edge.
    pub fn wrap(&self, point: Vec2, offset: f32) -> Vec2 {
        vec2(
            wrap_axis(point.x, self.width, offset),
            wrap_axis(point.y, self.height, offset),
        )
    }
}

fn wrap_axis(value: f32, extent: f32, offset: f32) -> f32 {
    if value < -offset {
        extent + offset
    } else if value > extent + offset {
        -offset
    } else {
        value
    }
}

/// Which rule set an agent steers with. Fixed for the agent's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Personality {
    Fish,
    Swarming,
    Circling,
}

impl Personality {
    /// Mosquito personalities buzz around nervously.
    pub fn is_jittery(self) -> bool {
        !matches!(self, Personality::Fish)
    }

    pub fn random_mosquito(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            Personality::Swarming
        } else {
            Personality::Circling
        }
    }
}

/// Plain construction parameters. Start from `default()` (a fish) or
/// `mosquito()` and override fields as needed.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub position: Vec2,
    /// Random direction at a random fraction of max speed when `None`.
    pub velocity: Option<Vec2>,
    pub mass: f32,
    pub max_speed: f32,
    pub max_force: f32,
    /// Radians per second.
    pub max_turn_rate: f32,
    pub radius: f32,
    pub perception_radius: f32,
    pub bounds: WorldBounds,
    /// Picked at random between the mosquito personalities when `None`.
    pub personality: Option<Personality>,
    pub avoid_obstacles: bool,
    pub behaviors: BehaviorSettings,
    pub path_length: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: None,
            mass: 1.0,
            max_speed: 50.0,
            max_force: 100.0,
            max_turn_rate: 180f32.to_radians(),
            radius: 4.0,
            perception_radius: 90.0,
            bounds: WorldBounds::default(),
            personality: Some(Personality::Fish),
            avoid_obstacles: false,
            behaviors: BehaviorSettings::default(),
            path_length: DEFAULT_PATH_LENGTH,
        }
    }
}

impl AgentConfig {
    pub fn mosquito() -> Self {
        Self {
            mass: 0.5,
            max_speed: 120.0,
            max_force: 150.0,
            max_turn_rate: 540f32.to_radians(),
            radius: 2.0,
            perception_radius: 35.0,
            personality: None,
            ..Self::default()
        }
    }

    fn validate(&self) -> SwarmResult<()> {
        let scalars = [
            ("mass", self.mass),
            ("max_speed", self.max_speed),
            ("max_force", self.max_force),
            ("max_turn_rate", self.max_turn_rate),
            ("radius", self.radius),
            ("perception_radius", self.perception_radius),
        ];
        for (name, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(SwarmError::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }

        if !(self.bounds.width > 0.0 && self.bounds.height > 0.0)
            || !self.bounds.width.is_finite()
            || !self.bounds.height.is_finite()
        {
            return Err(SwarmError::InvalidConfig(format!(
                "world bounds must be positive, got {}x{}",
                self.bounds.width, self.bounds.height
            )));
        }

        let position_ok = self.position.x.is_finite() && self.position.y.is_finite();
        let velocity_ok = self.velocity.map_or(true, |v| v.x.is_finite() && v.y.is_finite());
        if !position_ok || !velocity_ok {
            return Err(SwarmError::InvalidConfig("position and velocity must be finite".into()));
        }

        Ok(())
    }

    pub fn build(self, rng: &mut impl Rng) -> SwarmResult<Agent> {
        self.validate()?;

        let personality = self
            .personality
            .unwrap_or_else(|| Personality::random_mosquito(rng));

        let velocity = match self.velocity {
            Some(velocity) => velocity.limit(self.max_speed),
            None => random_unit(rng) * (self.max_speed * rng.gen_range(0.5..=1.0)),
        };
        let heading = velocity.try_normalize().unwrap_or(vec2(1.0, 0.0));

        let mut pipeline =
            BehaviorPipeline::for_personality(personality, &self.behaviors, self.max_force, rng);
        if self.avoid_obstacles {
            pipeline.attach_obstacle_avoidance(self.behaviors.avoidance_weight);
        }

        Ok(Agent {
            position: self.position,
            velocity,
            acceleration: Vec2::ZERO,
            heading,
            side: heading.perpendicular(),
            mass: self.mass,
            max_speed: self.max_speed,
            max_force: self.max_force,
            max_turn_rate: self.max_turn_rate,
            radius: self.radius,
            perception_radius: self.perception_radius,
            bounds: self.bounds,
            personality,
            pipeline,
            wander: 0.5,
            path: PathTrace::new(self.path_length),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Unit direction of travel; kept from the last motion while at rest.
    pub heading: Vec2,
    pub side: Vec2,
    pub mass: f32,
    pub max_speed: f32,
    pub max_force: f32,
    pub max_turn_rate: f32,
    pub radius: f32,
    pub perception_radius: f32,
    pub bounds: WorldBounds,
    personality: Personality,
    pipeline: BehaviorPipeline,
    wander: f32,
    path: PathTrace,
}

impl Agent {
    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn pipeline(&self) -> &BehaviorPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut BehaviorPipeline {
        &mut self.pipeline
    }

    pub fn wander_factor(&self) -> f32 {
        self.wander
    }

    pub fn path(&self) -> &PathTrace {
        &self.path
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn snapshot(&self) -> Neighbor {
        Neighbor {
            position: self.position,
            velocity: self.velocity,
        }
    }

    /// Advances the agent by `dt` seconds. `neighbors` must not contain the
    /// agent itself.
    pub fn update(
        &mut self,
        dt: f32,
        neighbors: &[Neighbor],
        environment: &Environment<'_>,
        rng: &mut impl Rng,
    ) {
        if !(dt > 0.0 && dt.is_finite()) {
            return;
        }

        let mut force = self.pipeline.combine(self, neighbors, environment, rng);
        self.pipeline.advance(dt, rng);

        force += environment
            .wind
            .force_at(self.position, environment.pointer, self.mass);
        if self.personality.is_jittery() {
            force += self.nervous_impulse(dt, rng);
        }
        let force = force.limit(self.max_force);

        self.acceleration = if self.mass > 0.0 {
            force / self.mass
        } else {
            Vec2::ZERO
        };

        let previous = self.velocity;
        let mut velocity = previous + self.acceleration * dt;
        velocity *= DAMPING.powf(dt * REFERENCE_FPS);

        if previous.length() > REST_SPEED {
            velocity = limit_turn(previous, velocity, self.max_turn_rate * dt);
        }
        self.velocity = velocity.limit(self.max_speed);

        self.position += self.velocity * dt;

        if let Some(heading) = self.velocity.try_normalize() {
            self.heading = heading;
        }
        self.side = self.heading.perpendicular();

        self.position = self.bounds.wrap(self.position, self.radius);
        self.path.record(self.position, 2.0 * self.radius);
    }

    // Wander drifts towards a speed-dependent target; faster means twitchier
    fn nervous_impulse(&mut self, dt: f32, rng: &mut impl Rng) -> Vec2 {
        let speed_ratio = if self.max_speed > 0.0 {
            self.speed() / self.max_speed
        } else {
            0.0
        };
        let target = 0.2 + 0.6 * speed_ratio;
        let response = (WANDER_RESPONSE * dt).min(1.0);
        self.wander = (self.wander + (target - self.wander) * response).clamp(MIN_WANDER, MAX_WANDER);

        gaussian_vec(rng) * (self.wander * self.max_force * NERVOUSNESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{BehaviorKind, Separation};
    use crate::environment::StillEnvironment;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn config_values_are_carried_over() {
        let mut rng = StdRng::seed_from_u64(3);
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
        assert_eq!(agent.pipeline().max_force(), 5.0);
        assert!(agent.speed() <= 10.0 + 1e-4);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        let negative = AgentConfig {
            mass: -1.0,
            ..AgentConfig::default()
        };
        assert!(matches!(negative.build(&mut rng), Err(SwarmError::InvalidConfig(_))));

        let flat = AgentConfig {
            bounds: WorldBounds::new(0.0, 100.0),
            ..AgentConfig::default()
        };
        assert!(matches!(flat.build(&mut rng), Err(SwarmError::InvalidConfig(_))));
    }

    #[test]
    fn mosquito_config_picks_a_jittery_personality() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let agent = AgentConfig::mosquito().build(&mut rng).expect("valid config");
            assert!(agent.personality().is_jittery());
            assert!(!agent.pipeline().has(BehaviorKind::Separation));
        }
    }

    #[test]
    fn obstacle_avoidance_is_wired_from_config() {
        let mut rng = StdRng::seed_from_u64(3);
        let agent = AgentConfig {
            avoid_obstacles: true,
            ..AgentConfig::default()
        }
        .build(&mut rng)
        .expect("valid config");
        assert!(agent.pipeline().has(BehaviorKind::ObstacleAvoidance));
    }

    #[test]
    fn wrap_moves_to_the_opposite_edge() {
        let bounds = WorldBounds::new(100.0, 50.0);
        assert_eq!(bounds.wrap(vec2(105.0, 10.0), 4.0), vec2(-4.0, 10.0));
        assert_eq!(bounds.wrap(vec2(10.0, -5.0), 4.0), vec2(10.0, 54.0));
        assert_eq!(bounds.wrap(vec2(102.0, 52.0), 4.0), vec2(102.0, 52.0));
    }

    #[test]
    fn zero_mass_does_not_accelerate() {
        let mut rng = StdRng::seed_from_u64(3);
        let world = StillEnvironment::default();
        let mut agent = AgentConfig {
            mass: 0.0,
            position: vec2(100.0, 100.0),
            velocity: Some(Vec2::ZERO),
            ..AgentConfig::default()
        }
        .build(&mut rng)
        .expect("valid config");

        let crowd = [Neighbor {
            position: vec2(105.0, 100.0),
            velocity: Vec2::ZERO,
        }];
        agent.update(DT, &crowd, &world.view(), &mut rng);
        assert_eq!(agent.velocity, Vec2::ZERO);
        assert_eq!(agent.position, vec2(100.0, 100.0));
    }

    #[test]
    fn resting_agent_moves_away_from_a_close_neighbor() {
        let mut rng = StdRng::seed_from_u64(3);
        let world = StillEnvironment::default();
        let mut agent = AgentConfig {
            position: vec2(100.0, 100.0),
            velocity: Some(Vec2::ZERO),
            ..AgentConfig::default()
        }
        .build(&mut rng)
        .expect("valid config");

        let mut pipeline = BehaviorPipeline::new(agent.max_force);
        pipeline.add(Separation::new(1.0, 20.0).into()).expect("empty pipeline");
        *agent.pipeline_mut() = pipeline;

        let crowd = [Neighbor {
            position: vec2(105.0, 100.0),
            velocity: Vec2::ZERO,
        }];
        agent.update(DT, &crowd, &world.view(), &mut rng);

        assert!(agent.position.x < 100.0);
        assert!(agent.heading.x < 0.0);
    }

    #[test]
    fn heading_and_side_stay_orthonormal() {
        let mut rng = StdRng::seed_from_u64(12);
        let world = StillEnvironment::default();
        let mut agent = AgentConfig::default().build(&mut rng).expect("valid config");

        for _ in 0..120 {
            agent.update(DT, &[], &world.view(), &mut rng);
            assert!((agent.heading.length() - 1.0).abs() < 1e-4);
            assert!(agent.heading.dot(agent.side).abs() < 1e-4);
        }
    }

    #[test]
    fn wander_factor_settles_on_the_speed_target() {
        let mut rng = StdRng::seed_from_u64(21);
        let world = StillEnvironment::default();
        let mut agent = AgentConfig {
            position: vec2(100.0, 100.0),
            personality: Some(Personality::Swarming),
            ..AgentConfig::mosquito()
        }
        .build(&mut rng)
        .expect("valid config");
        let max_speed = agent.max_speed;

        for held in [0.0, 0.5, 1.0, 0.25] {
            let speed = held * max_speed;
            // Two seconds at a held speed
            for _ in 0..120 {
                agent.velocity = vec2(speed, 0.0);
                agent.update(DT, &[], &world.view(), &mut rng);
                let wander = agent.wander_factor();
                assert!((MIN_WANDER..=MAX_WANDER).contains(&wander), "wander {wander}");
            }

            let target = 0.2 + 0.6 * held;
            assert!(
                (agent.wander_factor() - target).abs() < 0.02,
                "held {held}: wander {} target {target}",
                agent.wander_factor()
            );
        }
    }

    #[test]
    fn fish_keep_their_wander_factor() {
        let mut rng = StdRng::seed_from_u64(21);
        let world = StillEnvironment::default();
        let mut agent = AgentConfig::default().build(&mut rng).expect("valid config");
        let initial = agent.wander_factor();

        for _ in 0..60 {
            agent.update(DT, &[], &world.view(), &mut rng);
        }
        assert_eq!(agent.wander_factor(), initial);
    }

    #[test]
    fn trail_is_bounded_and_spaced() {
        let mut rng = StdRng::seed_from_u64(12);
        let world = StillEnvironment::default();
        let mut agent = AgentConfig {
            path_length: 8,
            ..AgentConfig::default()
        }
        .build(&mut rng)
        .expect("valid config");

        for _ in 0..600 {
            agent.update(DT, &[], &world.view(), &mut rng);
        }
        assert!(agent.path().len() <= 8);
        assert!(!agent.path().is_empty());
    }
}
