/*
 * Wind Module
 *
 * Pointer-driven gusts. Dragging with the pointer held creates wind along
 * the drag direction; without fresh input the strength decays exponentially
 * and snaps to zero once it is negligible.
 */

use nannou::prelude::Vec2;

use crate::vector::SteerVec;

pub const MAX_WIND_STRENGTH: f32 = 300.0;
pub const WIND_RADIUS: f32 = 150.0;

// Per-second exponential decay rate; a full-strength gust is gone within two seconds
const WIND_DECAY_RATE: f32 = 3.5;
// Weight kept by the old direction when blending in a new gust
const WIND_SMOOTHING: f32 = 0.7;
// Pointer speed (units/s) below which dragging does not blow
const MIN_POINTER_SPEED: f32 = 10.0;
const SPEED_TO_STRENGTH: f32 = 0.5;
const CALM_THRESHOLD: f32 = 1.0;

#[derive(Debug, Clone, Default)]
pub struct WindField {
    direction: Vec2,
    strength: f32,
    last_pointer: Vec2,
    pointer_held: bool,
}

impl WindField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Unit direction, or zero when calm.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn last_pointer(&self) -> Vec2 {
        self.last_pointer
    }

    pub fn pointer_held(&self) -> bool {
        self.pointer_held
    }

    pub fn has_wind(&self) -> bool {
        self.strength > 0.0
    }

    /// Samples the pointer once per tick.
    pub fn update(&mut self, pointer: Vec2, held: bool, dt: f32) {
        if held && self.pointer_held && dt > 0.0 {
            let movement = pointer - self.last_pointer;
            let pointer_speed = movement.length() / dt;

            if pointer_speed > MIN_POINTER_SPEED {
                if let Some(gust) = movement.try_normalize() {
                    self.blend_direction(gust);
                    let target = (pointer_speed * SPEED_TO_STRENGTH).min(MAX_WIND_STRENGTH);
                    self.strength = self.strength.max(target);
                }
            }
        }

        if dt > 0.0 {
            self.strength *= (-WIND_DECAY_RATE * dt).exp();
        }
        if self.strength < CALM_THRESHOLD {
            self.strength = 0.0;
            self.direction = Vec2::ZERO;
        }

        self.last_pointer = pointer;
        self.pointer_held = held;
    }

    fn blend_direction(&mut self, gust: Vec2) {
        if self.direction.is_zero() {
            self.direction = gust;
            return;
        }

        let blended = self.direction * WIND_SMOOTHING + gust * (1.0 - WIND_SMOOTHING);
        // Opposing gusts can cancel exactly; the fresh one wins then
        self.direction = blended.try_normalize().unwrap_or(gust);
    }

    /// Force on an agent of `mass` at `position`, fading out linearly over
    /// `WIND_RADIUS` around the pointer. Heavier agents resist more.
    pub fn force_at(&self, position: Vec2, pointer: Vec2, mass: f32) -> Vec2 {
        if !self.has_wind() || self.direction.is_zero() {
            return Vec2::ZERO;
        }

        let falloff = (1.0 - position.distance(pointer) / WIND_RADIUS).max(0.0);
        let resistance = 1.0 / (1.0 + mass.max(0.0));

        self.direction * (self.strength * falloff * resistance)
    }
}
