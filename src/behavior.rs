/*
 * Behavior Module
 *
 * Each steering rule computes one force from an agent, its neighbor
 * snapshot and the environment. Rules only own their tuning parameters;
 * agent state is always read, never written.
 *
 * The classic boid rules follow Reynolds: Steering = Desired - Velocity.
 */

use nannou::prelude::Vec2;
use rand::Rng;
use std::fmt;

use crate::agent::{Agent, Neighbor};
use crate::environment::Environment;
use crate::mosquito::{Circling, SwarmAttraction};
use crate::vector::SteerVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    Separation,
    Alignment,
    Cohesion,
    Swimming,
    ObstacleAvoidance,
    SwarmAttraction,
    Circling,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 7] = [
        BehaviorKind::Separation,
        BehaviorKind::Alignment,
        BehaviorKind::Cohesion,
        BehaviorKind::Swimming,
        BehaviorKind::ObstacleAvoidance,
        BehaviorKind::SwarmAttraction,
        BehaviorKind::Circling,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BehaviorKind::Separation => "separation",
            BehaviorKind::Alignment => "alignment",
            BehaviorKind::Cohesion => "cohesion",
            BehaviorKind::Swimming => "swimming",
            BehaviorKind::ObstacleAvoidance => "obstacle avoidance",
            BehaviorKind::SwarmAttraction => "swarm attraction",
            BehaviorKind::Circling => "circling",
        }
    }
}

impl fmt::Display for BehaviorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Desired velocity at full speed along `direction`, minus current velocity
fn steer_along(agent: &Agent, direction: Vec2) -> Vec2 {
    if direction.is_zero() {
        return Vec2::ZERO;
    }
    direction.set_length(agent.max_speed) - agent.velocity
}

// Distance to a neighbor if it counts for a rule with the given radius
#[inline]
fn in_range(agent: &Agent, neighbor: &Neighbor, radius: f32) -> Option<f32> {
    let distance = agent.position.distance(neighbor.position);
    (distance > 0.0 && distance < radius).then_some(distance)
}

/// Steer away from crowding neighbors, closer ones weighing more.
#[derive(Debug, Clone, PartialEq)]
pub struct Separation {
    pub weight: f32,
    pub radius: f32,
}

impl Separation {
    pub fn new(weight: f32, radius: f32) -> Self {
        Self { weight, radius }
    }

    pub fn compute_force(&self, agent: &Agent, neighbors: &[Neighbor]) -> Vec2 {
        let mut steering = Vec2::ZERO;
        let mut count = 0;

        for neighbor in neighbors {
            if let Some(distance) = in_range(agent, neighbor, self.radius) {
                // Weight by distance (closer neighbors have more influence)
                let away = (agent.position - neighbor.position).set_length(1.0);
                steering += away / distance;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        steer_along(agent, steering / count as f32)
    }
}

/// Steer towards the average heading of neighbors.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub weight: f32,
    pub radius: f32,
}

impl Alignment {
    pub fn new(weight: f32, radius: f32) -> Self {
        Self { weight, radius }
    }

    pub fn compute_force(&self, agent: &Agent, neighbors: &[Neighbor]) -> Vec2 {
        let mut average = Vec2::ZERO;
        let mut count = 0;

        for neighbor in neighbors {
            if in_range(agent, neighbor, self.radius).is_some() {
                average += neighbor.velocity;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        steer_along(agent, average / count as f32)
    }
}

/// Seek the center of mass of nearby neighbors.
#[derive(Debug, Clone, PartialEq)]
pub struct Cohesion {
    pub weight: f32,
    pub radius: f32,
}

impl Cohesion {
    pub fn new(weight: f32, radius: f32) -> Self {
        Self { weight, radius }
    }

    pub fn compute_force(&self, agent: &Agent, neighbors: &[Neighbor]) -> Vec2 {
        let mut center = Vec2::ZERO;
        let mut count = 0;

        for neighbor in neighbors {
            if in_range(agent, neighbor, self.radius).is_some() {
                center += neighbor.position;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        seek(agent, center / count as f32)
    }
}

/// Steering towards `target` at full speed.
pub fn seek(agent: &Agent, target: Vec2) -> Vec2 {
    steer_along(agent, target - agent.position)
}

/// Tail-beat oscillation: a sideways sway plus a forward thrust pulse.
#[derive(Debug, Clone, PartialEq)]
pub struct Swimming {
    pub weight: f32,
    pub amplitude: f32,
    pub frequency: f32,
    /// Per-agent offset so a school does not beat in lockstep.
    pub phase: f32,
    elapsed: f32,
}

impl Swimming {
    pub fn new(weight: f32, amplitude: f32, frequency: f32, phase: f32) -> Self {
        Self {
            weight,
            amplitude,
            frequency,
            phase,
            elapsed: 0.0,
        }
    }

    pub fn with_random_phase(weight: f32, amplitude: f32, frequency: f32, rng: &mut impl Rng) -> Self {
        Self::new(weight, amplitude, frequency, rng.gen_range(0.0..std::f32::consts::TAU))
    }

    pub fn current_phase(&self) -> f32 {
        self.elapsed * self.frequency + self.phase
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    pub fn reset_time(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn compute_force(&self, agent: &Agent) -> Vec2 {
        let Some(forward) = agent.velocity.try_normalize() else {
            return Vec2::ZERO;
        };

        let phase = self.current_phase();
        let sway = forward.perpendicular() * (phase.sin() * self.amplitude);
        let thrust = forward * (phase.cos().abs() * self.amplitude * 0.5);

        sway + thrust
    }
}

/// Repulsion from every obstacle in the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleAvoidance {
    pub weight: f32,
}

impl ObstacleAvoidance {
    pub fn new(weight: f32) -> Self {
        Self { weight }
    }

    pub fn compute_force(&self, agent: &Agent, environment: &Environment<'_>, rng: &mut impl Rng) -> Vec2 {
        environment
            .obstacles
            .avoidance_force(agent.position, agent.radius, rng)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    Separation(Separation),
    Alignment(Alignment),
    Cohesion(Cohesion),
    Swimming(Swimming),
    ObstacleAvoidance(ObstacleAvoidance),
    SwarmAttraction(SwarmAttraction),
    Circling(Circling),
}

impl Behavior {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Separation(_) => BehaviorKind::Separation,
            Behavior::Alignment(_) => BehaviorKind::Alignment,
            Behavior::Cohesion(_) => BehaviorKind::Cohesion,
            Behavior::Swimming(_) => BehaviorKind::Swimming,
            Behavior::ObstacleAvoidance(_) => BehaviorKind::ObstacleAvoidance,
            Behavior::SwarmAttraction(_) => BehaviorKind::SwarmAttraction,
            Behavior::Circling(_) => BehaviorKind::Circling,
        }
    }

    pub fn weight(&self) -> f32 {
        match self {
            Behavior::Separation(b) => b.weight,
            Behavior::Alignment(b) => b.weight,
            Behavior::Cohesion(b) => b.weight,
            Behavior::Swimming(b) => b.weight,
            Behavior::ObstacleAvoidance(b) => b.weight,
            Behavior::SwarmAttraction(b) => b.weight,
            Behavior::Circling(b) => b.weight,
        }
    }

    pub fn set_weight(&mut self, weight: f32) {
        let weight = weight.max(0.0);
        match self {
            Behavior::Separation(b) => b.weight = weight,
            Behavior::Alignment(b) => b.weight = weight,
            Behavior::Cohesion(b) => b.weight = weight,
            Behavior::Swimming(b) => b.weight = weight,
            Behavior::ObstacleAvoidance(b) => b.weight = weight,
            Behavior::SwarmAttraction(b) => b.weight = weight,
            Behavior::Circling(b) => b.weight = weight,
        }
    }

    /// Influence radius, for the rules that have one. For circling this is
    /// the preferred orbit radius.
    pub fn radius(&self) -> Option<f32> {
        match self {
            Behavior::Separation(b) => Some(b.radius),
            Behavior::Alignment(b) => Some(b.radius),
            Behavior::Cohesion(b) => Some(b.radius),
            Behavior::Circling(b) => Some(b.preferred_radius),
            _ => None,
        }
    }

    /// Returns false when the rule has no radius to set.
    pub fn set_radius(&mut self, radius: f32) -> bool {
        let radius = radius.max(0.0);
        match self {
            Behavior::Separation(b) => b.radius = radius,
            Behavior::Alignment(b) => b.radius = radius,
            Behavior::Cohesion(b) => b.radius = radius,
            Behavior::Circling(b) => b.preferred_radius = radius,
            _ => return false,
        }
        true
    }

    /// Unweighted steering force.
    pub fn compute_force(
        &self,
        agent: &Agent,
        neighbors: &[Neighbor],
        environment: &Environment<'_>,
        rng: &mut impl Rng,
    ) -> Vec2 {
        match self {
            Behavior::Separation(b) => b.compute_force(agent, neighbors),
            Behavior::Alignment(b) => b.compute_force(agent, neighbors),
            Behavior::Cohesion(b) => b.compute_force(agent, neighbors),
            Behavior::Swimming(b) => b.compute_force(agent),
            Behavior::ObstacleAvoidance(b) => b.compute_force(agent, environment, rng),
            Behavior::SwarmAttraction(b) => b.compute_force(agent, neighbors, environment, rng),
            Behavior::Circling(b) => b.compute_force(agent, neighbors, environment, rng),
        }
    }

    /// Advances internal oscillators by one tick.
    pub fn advance(&mut self, dt: f32, rng: &mut impl Rng) {
        match self {
            Behavior::Swimming(b) => b.advance(dt),
            Behavior::Circling(b) => b.advance(dt, rng),
            _ => {}
        }
    }
}

impl From<Separation> for Behavior {
    fn from(b: Separation) -> Self {
        Behavior::Separation(b)
    }
}

impl From<Alignment> for Behavior {
    fn from(b: Alignment) -> Self {
        Behavior::Alignment(b)
    }
}

impl From<Cohesion> for Behavior {
    fn from(b: Cohesion) -> Self {
        Behavior::Cohesion(b)
    }
}

impl From<Swimming> for Behavior {
    fn from(b: Swimming) -> Self {
        Behavior::Swimming(b)
    }
}

impl From<ObstacleAvoidance> for Behavior {
    fn from(b: ObstacleAvoidance) -> Self {
        Behavior::ObstacleAvoidance(b)
    }
}

impl From<SwarmAttraction> for Behavior {
    fn from(b: SwarmAttraction) -> Self {
        Behavior::SwarmAttraction(b)
    }
}

impl From<Circling> for Behavior {
    fn from(b: Circling) -> Self {
        Behavior::Circling(b)
    }
}
