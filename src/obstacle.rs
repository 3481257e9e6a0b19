/*
 * Obstacle Module
 *
 * Static circular exclusion zones. An obstacle never moves an agent itself;
 * it only reports the repulsion an agent at a given point should feel.
 */

use nannou::prelude::{vec2, Vec2};
use rand::Rng;

use crate::vector::SteerVec;

// Distance beyond the combined radii at which repulsion starts
pub const AVOIDANCE_MARGIN: f32 = 20.0;
// Repulsion magnitude when touching the combined radius
pub const AVOIDANCE_STRENGTH: f32 = 100.0;

pub const DEFAULT_OBSTACLE_RADIUS: f32 = 30.0;
pub const MIN_OBSTACLE_RADIUS: f32 = 10.0;
pub const OBSTACLE_RADIUS_STEP: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub position: Vec2,
    pub radius: f32,
    pub visible: bool,
}

impl Obstacle {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius: radius.max(0.0),
            visible: true,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.radius
    }

    pub fn distance_to_edge(&self, point: Vec2) -> f32 {
        (self.position.distance(point) - self.radius).max(0.0)
    }

    /// Repulsion felt by a circle of `agent_radius` centered at `agent_position`.
    ///
    /// Zero beyond `radius + agent_radius + AVOIDANCE_MARGIN`, growing linearly
    /// towards the surface and pointing away from the center. An agent exactly
    /// on the center gets a small random push to break the tie.
    pub fn avoidance_force(&self, agent_position: Vec2, agent_radius: f32, rng: &mut impl Rng) -> Vec2 {
        let to_agent = agent_position - self.position;
        let distance = to_agent.length();
        let reach = self.radius + agent_radius + AVOIDANCE_MARGIN;

        if distance > reach {
            return Vec2::ZERO;
        }

        match to_agent.try_normalize() {
            Some(away) => away * ((reach - distance) / AVOIDANCE_MARGIN) * AVOIDANCE_STRENGTH,
            None => vec2(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5),
        }
    }
}

/// The set of obstacles shared by every agent in a simulation.
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Summed repulsion from every obstacle.
    pub fn avoidance_force(&self, agent_position: Vec2, agent_radius: f32, rng: &mut impl Rng) -> Vec2 {
        self.obstacles
            .iter()
            .fold(Vec2::ZERO, |total, obstacle| {
                total + obstacle.avoidance_force(agent_position, agent_radius, rng)
            })
    }

    pub fn nearest(&self, point: Vec2) -> Option<&Obstacle> {
        self.obstacles.iter().min_by(|a, b| {
            a.distance_to_edge(point)
                .partial_cmp(&b.distance_to_edge(point))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
