/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and simulation statistics to be displayed in the UI.
 *
 * Includes metrics for:
 * - FPS (frames per second) and frame time
 * - Agent, obstacle and light counts
 * - Wind strength
 * - Mean neighbor count from the last tick
 */

use std::time::Duration;

use crate::simulation::Simulation;

// Debug information to display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub agent_count: usize,
    pub obstacle_count: usize,
    pub light_count: usize,
    pub wind_strength: f32,
    pub mean_neighbors: f32,
    pub elapsed: f64,
}

impl DebugInfo {
    // Copy the simulation statistics; fps and frame time come from the host
    pub fn refresh(&mut self, simulation: &Simulation) {
        self.agent_count = simulation.agents().len();
        self.obstacle_count = simulation.obstacles().len();
        self.light_count = simulation.lights().len();
        self.wind_strength = simulation.wind().strength();
        self.mean_neighbors = simulation.mean_neighbor_count();
        self.elapsed = simulation.elapsed();
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Agents: {}", self.agent_count),
            format!("Obstacles: {}", self.obstacle_count),
            format!("Lights: {}", self.light_count),
            format!("Wind: {:.1}", self.wind_strength),
            format!("Mean neighbors: {:.1}", self.mean_neighbors),
            format!("Time: {:.1} s", self.elapsed),
        ]
    }
}
