/*
 * Simulation Module
 *
 * Owns the agents, the environment (obstacles, lights, wind), the clock and
 * the random number generator, and runs the per-tick update:
 *
 * 1. Environment phase: advance the clock, update wind and light flicker
 * 2. Snapshot every agent and build neighbor sets from the snapshot
 * 3. Agent phase: update each agent against a read-only environment view
 *
 * Input and rendering collaborators talk to the simulation only through
 * the methods below.
 */

use nannou::prelude::{vec2, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

use crate::agent::{Agent, AgentConfig, Neighbor};
use crate::behavior::{Behavior, BehaviorKind};
use crate::environment::Environment;
use crate::error::{SwarmError, SwarmResult};
use crate::light::{LightSource, LightSourceField};
use crate::neighbors::{find_neighbors, NeighborSearch};
use crate::obstacle::{Obstacle, ObstacleField};
use crate::params::{Scene, SimulationParams};
use crate::scene::{AgentView, LightView, ObstacleView, SceneRenderer, WindView};
use crate::wind::{WindField, WIND_RADIUS};

pub struct Simulation {
    params: SimulationParams,
    agents: Vec<Agent>,
    obstacles: ObstacleField,
    lights: LightSourceField,
    wind: WindField,
    pointer: Vec2,
    pointer_held: bool,
    clock: f64,
    rng: StdRng,
    mean_neighbors: f32,
}

impl Simulation {
    pub fn new(params: SimulationParams) -> SwarmResult<Self> {
        Self::with_rng(params, StdRng::from_entropy())
    }

    /// Reproducible simulation for tests and benchmarks.
    pub fn with_seed(params: SimulationParams, seed: u64) -> SwarmResult<Self> {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: SimulationParams, rng: StdRng) -> SwarmResult<Self> {
        let mut simulation = Self {
            params,
            agents: Vec::new(),
            obstacles: ObstacleField::new(),
            lights: LightSourceField::new(),
            wind: WindField::new(),
            pointer: Vec2::ZERO,
            pointer_held: false,
            clock: 0.0,
            rng,
            mean_neighbors: 0.0,
        };
        simulation.reset()?;
        Ok(simulation)
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Direct access for UI bindings. Call `reset` or
    /// `sync_behavior_settings` afterwards as `detect_changes` dictates.
    pub fn params_mut(&mut self) -> &mut SimulationParams {
        &mut self.params
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Direct agent access, mainly for scripted scenarios.
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn lights(&self) -> &LightSourceField {
        &self.lights
    }

    pub fn wind(&self) -> &WindField {
        &self.wind
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Simulation time in seconds.
    pub fn elapsed(&self) -> f64 {
        self.clock
    }

    /// Average neighbor set size in the last tick.
    pub fn mean_neighbor_count(&self) -> f32 {
        self.mean_neighbors
    }

    /// Replaces the whole agent collection with a fresh population of the
    /// current scene at random positions. Obstacles and lights stay.
    pub fn reset(&mut self) -> SwarmResult<()> {
        let count = self.params.agent_count;
        let mut agents = Vec::with_capacity(count);
        for _ in 0..count {
            let position = self.params.bounds.random_point(&mut self.rng);
            agents.push(self.build_agent(position)?);
        }
        self.agents = agents;
        self.mean_neighbors = 0.0;

        info!(scene = %self.params.scene, agents = count, "simulation reset");
        Ok(())
    }

    /// Switches scene presets and rebuilds the population.
    pub fn set_scene(&mut self, scene: Scene) -> SwarmResult<()> {
        self.params.switch_scene(scene);
        self.reset()
    }

    fn build_agent(&mut self, position: Vec2) -> SwarmResult<Agent> {
        let config = AgentConfig {
            position,
            avoid_obstacles: !self.obstacles.is_empty(),
            ..self.params.agent_config()
        };
        config.build(&mut self.rng)
    }

    pub fn add_agent_at(&mut self, x: f32, y: f32) -> SwarmResult<()> {
        let agent = self.build_agent(vec2(x, y))?;
        debug!(x, y, personality = ?agent.personality(), "agent added");
        self.agents.push(agent);
        Ok(())
    }

    /// Places an obstacle of the configured size. The first obstacle turns
    /// on obstacle avoidance for every agent.
    pub fn add_obstacle_at(&mut self, x: f32, y: f32) {
        let first = self.obstacles.is_empty();
        self.obstacles.add(Obstacle::new(vec2(x, y), self.params.obstacle_radius));

        if first {
            let weight = self.params.behaviors.avoidance_weight;
            for agent in &mut self.agents {
                agent.pipeline_mut().attach_obstacle_avoidance(weight);
            }
        }
        info!(x, y, radius = self.params.obstacle_radius, total = self.obstacles.len(), "obstacle added");
    }

    pub fn clear_obstacles(&mut self) {
        self.obstacles.clear();
        for agent in &mut self.agents {
            agent.pipeline_mut().detach_obstacle_avoidance();
        }
        info!("obstacles cleared");
    }

    pub fn add_light_at(&mut self, x: f32, y: f32) {
        let mut light = LightSource::new(
            vec2(x, y),
            self.params.light_intensity,
            self.params.light_radius,
            self.clock,
        );
        light.update(self.clock);
        self.lights.add(light);
        info!(x, y, total = self.lights.len(), "light added");
    }

    pub fn clear_lights(&mut self) {
        self.lights.clear();
        info!("lights cleared");
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32, pressed: bool) {
        self.pointer = vec2(x, y);
        self.pointer_held = pressed;
    }

    // Fails when agents exist but none of them carries `kind`.
    fn ensure_carried(&self, kind: BehaviorKind) -> SwarmResult<()> {
        if self.agents.is_empty() || self.agents.iter().any(|a| a.pipeline().has(kind)) {
            Ok(())
        } else {
            warn!(%kind, "no agent carries this behavior");
            Err(SwarmError::BehaviorNotFound(kind))
        }
    }

    fn apply_to_kind(
        &mut self,
        kind: BehaviorKind,
        mut apply: impl FnMut(&mut Agent) -> SwarmResult<()>,
    ) -> SwarmResult<()> {
        for agent in self.agents.iter_mut().filter(|a| a.pipeline().has(kind)) {
            apply(agent)?;
        }
        Ok(())
    }

    pub fn set_behavior_weight(&mut self, kind: BehaviorKind, value: f32) -> SwarmResult<()> {
        if !value.is_finite() || value < 0.0 {
            warn!(%kind, value, "rejected behavior weight");
            return Err(SwarmError::InvalidConfig(format!("{kind} weight must be non-negative, got {value}")));
        }
        self.ensure_carried(kind)?;

        let settings = &mut self.params.behaviors;
        match kind {
            BehaviorKind::Separation => settings.separation_weight = value,
            BehaviorKind::Alignment => settings.alignment_weight = value,
            BehaviorKind::Cohesion => settings.cohesion_weight = value,
            BehaviorKind::Swimming => settings.swimming_weight = value,
            BehaviorKind::ObstacleAvoidance => settings.avoidance_weight = value,
            BehaviorKind::SwarmAttraction => settings.swarm_attraction_weight = value,
            BehaviorKind::Circling => settings.circling_weight = value,
        }

        self.apply_to_kind(kind, |agent| agent.pipeline_mut().set_weight(kind, value))
    }

    pub fn set_behavior_radius(&mut self, kind: BehaviorKind, value: f32) -> SwarmResult<()> {
        if !value.is_finite() || value < 0.0 {
            warn!(%kind, value, "rejected behavior radius");
            return Err(SwarmError::InvalidConfig(format!("{kind} radius must be non-negative, got {value}")));
        }
        if !matches!(
            kind,
            BehaviorKind::Separation | BehaviorKind::Alignment | BehaviorKind::Cohesion | BehaviorKind::Circling
        ) {
            return Err(SwarmError::InvalidConfig(format!("{kind} has no radius")));
        }
        self.ensure_carried(kind)?;

        let settings = &mut self.params.behaviors;
        match kind {
            BehaviorKind::Separation => settings.separation_radius = value,
            BehaviorKind::Alignment => settings.alignment_radius = value,
            BehaviorKind::Cohesion => settings.cohesion_radius = value,
            _ => settings.circling_radius = value,
        }

        self.apply_to_kind(kind, |agent| agent.pipeline_mut().set_radius(kind, value))
    }

    /// Pushes the current speed and behavior tuning from the parameters
    /// into every existing agent.
    pub fn sync_behavior_settings(&mut self) {
        let settings = self.params.behaviors.clone();
        let max_speed = self.params.max_speed;

        for agent in &mut self.agents {
            agent.max_speed = max_speed;
            let pipeline = agent.pipeline_mut();
            let tuning = [
                (BehaviorKind::Separation, settings.separation_weight, Some(settings.separation_radius)),
                (BehaviorKind::Alignment, settings.alignment_weight, Some(settings.alignment_radius)),
                (BehaviorKind::Cohesion, settings.cohesion_weight, Some(settings.cohesion_radius)),
                (BehaviorKind::Swimming, settings.swimming_weight, None),
                (BehaviorKind::ObstacleAvoidance, settings.avoidance_weight, None),
                (BehaviorKind::SwarmAttraction, settings.swarm_attraction_weight, None),
                (BehaviorKind::Circling, settings.circling_weight, Some(settings.circling_radius)),
            ];
            for (kind, weight, radius) in tuning {
                if let Ok(behavior) = pipeline.get_mut(kind) {
                    behavior.set_weight(weight);
                    if let Some(radius) = radius {
                        behavior.set_radius(radius);
                    }
                    match behavior {
                        Behavior::Swimming(swimming) => {
                            swimming.amplitude = settings.swimming_amplitude;
                            swimming.frequency = settings.swimming_frequency;
                        }
                        Behavior::Circling(circling) => circling.angular_speed = settings.circling_angular_speed,
                        _ => {}
                    }
                }
            }
        }
        debug!(max_speed, "behavior settings synced");
    }

    /// Drops every trail.
    pub fn clear_paths(&mut self) {
        for agent in &mut self.agents {
            agent.clear_path();
        }
    }

    /// Advances the world by `dt` seconds. Does nothing while paused or for
    /// a non-positive step.
    pub fn step(&mut self, dt: f32) {
        if self.params.pause_simulation || !(dt > 0.0 && dt.is_finite()) {
            return;
        }

        // Environment phase
        self.clock += dt as f64;
        self.wind.update(self.pointer, self.pointer_held, dt);
        self.lights.update(self.clock);

        // Neighbor phase
        let snapshot: Vec<Neighbor> = self.agents.iter().map(Agent::snapshot).collect();
        let radii: Vec<f32> = self.agents.iter().map(|a| a.perception_radius).collect();
        let search = if self.params.enable_spatial_grid {
            NeighborSearch::Grid
        } else {
            NeighborSearch::Pairwise
        };
        let neighbor_sets = find_neighbors(
            &snapshot,
            &radii,
            self.params.bounds,
            search,
            self.params.enable_parallel,
        );

        // Agent phase
        let environment = Environment::new(&self.wind, &self.lights, &self.obstacles, self.pointer, dt);
        for (agent, neighbors) in self.agents.iter_mut().zip(&neighbor_sets) {
            agent.update(dt, neighbors, &environment, &mut self.rng);
        }

        let total: usize = neighbor_sets.iter().map(Vec::len).sum();
        self.mean_neighbors = if self.agents.is_empty() {
            0.0
        } else {
            total as f32 / self.agents.len() as f32
        };
        trace!(
            t = self.clock,
            agents = self.agents.len(),
            mean_neighbors = self.mean_neighbors,
            wind = self.wind.strength(),
            "tick"
        );
    }

    /// Feeds the current state to a renderer: obstacles, lights, trails,
    /// agents, then wind.
    pub fn render(&self, renderer: &mut impl SceneRenderer) {
        for obstacle in self.obstacles.iter().filter(|o| o.visible) {
            renderer.render_obstacle(&ObstacleView {
                position: obstacle.position,
                radius: obstacle.radius,
            });
        }

        for light in self.lights.iter() {
            renderer.render_light(&LightView {
                position: light.position,
                radius: light.radius,
                intensity: light.intensity(),
                flicker: light.flicker_factor(),
            });
        }

        if self.params.show_paths {
            let mut points = Vec::new();
            for agent in &self.agents {
                points.clear();
                points.extend(agent.path().points());
                if points.len() > 1 {
                    renderer.render_path(&points, agent.personality());
                }
            }
        }

        for agent in &self.agents {
            renderer.render_agent(&AgentView {
                position: agent.position,
                heading: agent.heading,
                radius: agent.radius,
                speed: agent.speed(),
                personality: agent.personality(),
            });
        }

        if self.wind.has_wind() {
            renderer.render_wind(&WindView {
                origin: self.pointer,
                direction: self.wind.direction(),
                strength: self.wind.strength(),
                radius: WIND_RADIUS,
            });
        }
    }
}
