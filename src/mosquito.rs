/*
 * Mosquito Behaviors Module
 *
 * The two mosquito personalities. Both mix strong separation, weak
 * cohesion, bounded random wander, occasional chaotic kicks and a light
 * force. Swarm attraction flies straight at the lights; circling splits the
 * light force into a radial part that holds a preferred orbit and a
 * tangential part that drives the orbit around the light.
 */

use nannou::prelude::{vec2, Vec2};
use rand::Rng;

use crate::agent::{Agent, Neighbor};
use crate::environment::Environment;
use crate::light::LightSource;
use crate::vector::{gaussian_vec, random_unit, SteerVec};

// Softening term in the inverse-square separation weighting
const SEPARATION_SOFTENING: f32 = 0.1;

// Inside this distance the orbit force is switched off
const ORBIT_CORE: f32 = 10.0;
// Orbit forces reach this many light radii out
const ORBIT_REACH: f32 = 4.0;
// Weak attraction pulls in from this many light radii
const FAR_ATTRACTION_REACH: f32 = 6.0;
const RADIAL_PULL_SCALE: f32 = 30.0;
const RADIAL_PUSH_SCALE: f32 = 20.0;
const MAX_RADIAL_PULL: f32 = 1.5;
const MAX_RADIAL_PUSH: f32 = 2.0;
// Falloff of the tangential drive away from the preferred radius
const ORBIT_FALLOFF: f32 = 25.0;

/// Normalized inverse-square push away from neighbors inside `radius`.
fn repulsion(agent: &Agent, neighbors: &[Neighbor], radius: f32) -> Vec2 {
    let mut total = Vec2::ZERO;
    let mut count = 0;

    for neighbor in neighbors {
        let away = agent.position - neighbor.position;
        let distance = away.length();
        if distance > 0.0 && distance < radius {
            total += away.set_length(1.0 / (distance * distance + SEPARATION_SOFTENING));
            count += 1;
        }
    }

    if count == 0 {
        return Vec2::ZERO;
    }
    total.set_length(1.0)
}

/// Unit pull towards the centroid of neighbors inside `radius`.
fn centroid_pull(agent: &Agent, neighbors: &[Neighbor], radius: f32) -> Vec2 {
    let mut center = Vec2::ZERO;
    let mut count = 0;

    for neighbor in neighbors {
        let distance = agent.position.distance(neighbor.position);
        if distance > 0.0 && distance < radius {
            center += neighbor.position;
            count += 1;
        }
    }

    if count == 0 {
        return Vec2::ZERO;
    }
    (center / count as f32 - agent.position).set_length(1.0)
}

/// Probability that an event with `rate` occurrences per second fires
/// during a tick of `dt` seconds.
fn chance_in(rate: f32, dt: f32) -> f64 {
    (rate * dt).clamp(0.0, 1.0) as f64
}

/// Gaussian buzz plus a rare impulse in a random direction.
fn wander(rng: &mut impl Rng, intensity: f32, impulse_rate: f32, impulse_scale: f32, dt: f32) -> Vec2 {
    let mut force = gaussian_vec(rng) * intensity;
    if rng.gen_bool(chance_in(impulse_rate, dt)) {
        force += random_unit(rng) * (intensity * impulse_scale);
    }
    force
}

/// Occasional abrupt direction change scaled to the agent's force budget.
fn chaos_kick(agent: &Agent, rng: &mut impl Rng, rate: f32, strength: f32, dt: f32) -> Vec2 {
    if rng.gen_bool(chance_in(rate, dt)) {
        random_unit(rng) * (strength * agent.max_force)
    } else {
        Vec2::ZERO
    }
}

/// Wild swarming drawn straight at the lights.
#[derive(Debug, Clone, PartialEq)]
pub struct SwarmAttraction {
    pub weight: f32,
    pub separation_weight: f32,
    pub cohesion_weight: f32,
    pub wander_weight: f32,
    pub light_weight: f32,
    pub chaos_intensity: f32,
    /// Abrupt direction changes per second.
    pub chaos_rate: f32,
    /// Wander impulses per second.
    pub impulse_rate: f32,
}

impl Default for SwarmAttraction {
    fn default() -> Self {
        Self {
            weight: 1.0,
            separation_weight: 3.0,
            cohesion_weight: 0.3,
            wander_weight: 2.5,
            light_weight: 4.0,
            chaos_intensity: 1.5,
            chaos_rate: 6.0,
            impulse_rate: 1.8,
        }
    }
}

impl SwarmAttraction {
    pub fn new(weight: f32) -> Self {
        Self {
            weight,
            ..Self::default()
        }
    }

    pub fn compute_force(
        &self,
        agent: &Agent,
        neighbors: &[Neighbor],
        environment: &Environment<'_>,
        rng: &mut impl Rng,
    ) -> Vec2 {
        let perception = agent.perception_radius;

        let separation = repulsion(agent, neighbors, perception * 0.8) * self.separation_weight;
        let cohesion = centroid_pull(agent, neighbors, perception * 0.6) * self.cohesion_weight;

        // A slow position-seeded sway keeps individuals from moving in unison
        let intensity = 2.0;
        let seed = agent.position.x + agent.position.y;
        let sway = vec2((seed * 0.1).sin(), (seed * 0.15).cos()) * (intensity * 0.3);
        let buzz = (wander(rng, intensity, self.impulse_rate, 1.5, environment.dt) + sway) * self.wander_weight;

        let light = environment.lights.attraction_force(agent.position) * self.light_weight;
        let chaos = chaos_kick(agent, rng, self.chaos_rate, self.chaos_intensity * 0.8, environment.dt);

        separation + cohesion + buzz + light + chaos
    }
}

/// Holds an orbit around nearby lights instead of diving into them.
#[derive(Debug, Clone, PartialEq)]
pub struct Circling {
    pub weight: f32,
    pub preferred_radius: f32,
    pub angular_speed: f32,
    pub separation_weight: f32,
    pub cohesion_weight: f32,
    pub wander_weight: f32,
    pub orbit_weight: f32,
    pub light_weight: f32,
    pub chaos_intensity: f32,
    /// Abrupt direction changes per second.
    pub chaos_rate: f32,
    /// Wander impulses per second.
    pub impulse_rate: f32,
    /// Expected orbit reversals per second.
    pub reversal_rate: f32,
    orbit_direction: f32,
}

impl Default for Circling {
    fn default() -> Self {
        Self {
            weight: 1.0,
            preferred_radius: 60.0,
            angular_speed: 1.2,
            separation_weight: 2.5,
            cohesion_weight: 0.8,
            wander_weight: 1.5,
            orbit_weight: 5.0,
            light_weight: 2.0,
            chaos_intensity: 0.8,
            chaos_rate: 3.0,
            impulse_rate: 1.2,
            reversal_rate: 0.2,
            orbit_direction: 1.0,
        }
    }
}

impl Circling {
    pub fn new(weight: f32, preferred_radius: f32, angular_speed: f32) -> Self {
        Self {
            weight,
            preferred_radius,
            angular_speed,
            ..Self::default()
        }
    }

    /// +1 for counter-clockwise orbits, -1 for clockwise.
    pub fn orbit_direction(&self) -> f32 {
        self.orbit_direction
    }

    pub fn reverse_orbit(&mut self) {
        self.orbit_direction = -self.orbit_direction;
    }

    pub fn advance(&mut self, dt: f32, rng: &mut impl Rng) {
        if rng.gen_bool(chance_in(self.reversal_rate, dt)) {
            self.reverse_orbit();
        }
    }

    pub fn compute_force(
        &self,
        agent: &Agent,
        neighbors: &[Neighbor],
        environment: &Environment<'_>,
        rng: &mut impl Rng,
    ) -> Vec2 {
        let perception = agent.perception_radius;

        let separation = repulsion(agent, neighbors, perception * 0.7) * self.separation_weight;
        let cohesion = centroid_pull(agent, neighbors, perception) * self.cohesion_weight;
        let buzz = wander(rng, 1.0, self.impulse_rate, 1.0, environment.dt) * self.wander_weight;

        let mut orbit = Vec2::ZERO;
        let mut attraction = Vec2::ZERO;
        for light in environment.lights.iter() {
            orbit += self.orbit_force(agent.position, light);
            attraction += self.far_attraction(agent.position, light);
        }

        let chaos = chaos_kick(agent, rng, self.chaos_rate, self.chaos_intensity * 0.3, environment.dt);

        separation
            + cohesion
            + buzz
            + orbit * self.orbit_weight
            + attraction * self.light_weight
            + chaos
    }

    /// Radial correction towards the preferred radius plus tangential drive.
    pub fn orbit_force(&self, position: Vec2, light: &LightSource) -> Vec2 {
        let to_light = light.position - position;
        let distance = to_light.length();

        if distance <= ORBIT_CORE || distance >= light.radius * ORBIT_REACH {
            return Vec2::ZERO;
        }
        let Some(inward) = to_light.try_normalize() else {
            return Vec2::ZERO;
        };

        let error = distance - self.preferred_radius;
        let radial_strength = if error > 0.0 {
            (error / RADIAL_PULL_SCALE).min(MAX_RADIAL_PULL)
        } else {
            (error / RADIAL_PUSH_SCALE).max(-MAX_RADIAL_PUSH)
        };

        let on_orbit = (-(error.abs()) / ORBIT_FALLOFF).exp();
        let tangential_strength = self.angular_speed * light.intensity() * on_orbit;
        let tangent = inward.perpendicular() * self.orbit_direction;

        inward * radial_strength + tangent * tangential_strength
    }

    // Gentle pull from beyond the orbit so distant mosquitoes find the light
    fn far_attraction(&self, position: Vec2, light: &LightSource) -> Vec2 {
        let to_light = light.position - position;
        let distance = to_light.length();

        if distance <= self.preferred_radius * 1.5 || distance >= light.radius * FAR_ATTRACTION_REACH {
            return Vec2::ZERO;
        }

        to_light.set_length(light.intensity() * 0.5 / (distance + 1.0))
    }
}
