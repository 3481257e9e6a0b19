/*
 * Light Source Module
 *
 * Flickering point lights that mosquitoes are drawn to. Intensity is a pure
 * function of the time elapsed since the light was created, so refreshing
 * it only needs the current simulation clock.
 */

use nannou::prelude::Vec2;

use crate::vector::SteerVec;

pub const DEFAULT_LIGHT_INTENSITY: f32 = 60.0;
pub const DEFAULT_LIGHT_RADIUS: f32 = 25.0;

const FLICKER_FREQUENCY: f64 = 8.0;
const FLICKER_DEPTH: f64 = 0.1;
// Attraction reaches this many light radii out
const ATTRACTION_REACH: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct LightSource {
    pub position: Vec2,
    pub base_intensity: f32,
    pub radius: f32,
    created_at: f64,
    intensity: f32,
}

impl LightSource {
    pub fn new(position: Vec2, intensity: f32, radius: f32, created_at: f64) -> Self {
        Self {
            position,
            base_intensity: intensity,
            radius,
            created_at,
            intensity,
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn created_at(&self) -> f64 {
        self.created_at
    }

    /// Intensity relative to the base, around 1.0.
    pub fn flicker_factor(&self) -> f32 {
        if self.base_intensity == 0.0 {
            1.0
        } else {
            self.intensity / self.base_intensity
        }
    }

    /// Refreshes the flickering intensity for simulation time `now`.
    pub fn update(&mut self, now: f64) {
        let elapsed = (now - self.created_at).max(0.0);
        let flicker = 1.0 + (elapsed * FLICKER_FREQUENCY).sin() * FLICKER_DEPTH;
        self.intensity = (self.base_intensity as f64 * flicker) as f32;
    }

    /// Pull towards the light, falling off with distance and cut off at
    /// three radii. Zero when standing on the light itself.
    pub fn attraction_force(&self, position: Vec2) -> Vec2 {
        let to_light = self.position - position;
        let distance = to_light.length();

        if distance >= self.radius * ATTRACTION_REACH {
            return Vec2::ZERO;
        }

        let strength = self.intensity * self.radius / (distance + 1.0);
        to_light.set_length(strength)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LightSourceField {
    lights: Vec<LightSource>,
}

impl LightSourceField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, light: LightSource) {
        self.lights.push(light);
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LightSource> {
        self.lights.iter()
    }

    pub fn update(&mut self, now: f64) {
        for light in &mut self.lights {
            light.update(now);
        }
    }

    /// Summed attraction of every light in reach.
    pub fn attraction_force(&self, position: Vec2) -> Vec2 {
        self.lights
            .iter()
            .fold(Vec2::ZERO, |total, light| total + light.attraction_force(position))
    }
}
