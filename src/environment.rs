/*
 * Environment Module
 *
 * The read-only view of world state handed to every behavior during the
 * per-agent pass. Wind, lights and obstacles are mutated only in the
 * environment phase of a tick, never while agents are being updated.
 */

use nannou::prelude::Vec2;

use crate::light::LightSourceField;
use crate::obstacle::ObstacleField;
use crate::wind::WindField;

// Tick length assumed by views that are not driven by a simulation clock
pub const REFERENCE_DT: f32 = 1.0 / 60.0;

#[derive(Clone, Copy)]
pub struct Environment<'a> {
    pub wind: &'a WindField,
    pub lights: &'a LightSourceField,
    pub obstacles: &'a ObstacleField,
    /// Point the wind is sampled around (the pointer position).
    pub pointer: Vec2,
    /// Length of the tick being evaluated, in seconds.
    pub dt: f32,
}

impl<'a> Environment<'a> {
    pub fn new(
        wind: &'a WindField,
        lights: &'a LightSourceField,
        obstacles: &'a ObstacleField,
        pointer: Vec2,
        dt: f32,
    ) -> Self {
        Self {
            wind,
            lights,
            obstacles,
            pointer,
            dt,
        }
    }
}

/// Owned, empty environment for code that has no world around it.
#[derive(Debug, Clone, Default)]
pub struct StillEnvironment {
    pub wind: WindField,
    pub lights: LightSourceField,
    pub obstacles: ObstacleField,
}

impl StillEnvironment {
    pub fn view(&self) -> Environment<'_> {
        Environment::new(&self.wind, &self.lights, &self.obstacles, Vec2::ZERO, REFERENCE_DT)
    }
}
