/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that holds every knob the
 * UI and keyboard can turn: scene choice, population, speed, behavior
 * tuning, environment sizes and performance switches. It also provides the
 * snapshot-based change detection the UI uses to decide what to rebuild.
 */

use std::fmt;
use std::ops::RangeInclusive;

use crate::agent::{AgentConfig, WorldBounds};
use crate::light::{DEFAULT_LIGHT_INTENSITY, DEFAULT_LIGHT_RADIUS};
use crate::obstacle::{DEFAULT_OBSTACLE_RADIUS, MIN_OBSTACLE_RADIUS};
use crate::pipeline::BehaviorSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Fish,
    Mosquitoes,
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scene::Fish => f.write_str("Fish"),
            Scene::Mosquitoes => f.write_str("Mosquitoes"),
        }
    }
}

// Parameters for the simulation that can be adjusted via UI
#[derive(Debug, Clone)]
pub struct SimulationParams {
    pub scene: Scene,
    pub agent_count: usize,
    pub bounds: WorldBounds,
    pub max_speed: f32,
    pub behaviors: BehaviorSettings,
    // Size of the next obstacle placed
    pub obstacle_radius: f32,
    pub light_intensity: f32,
    pub light_radius: f32,
    pub show_paths: bool,
    pub show_debug: bool,
    pub pause_simulation: bool,
    // Performance settings
    pub enable_parallel: bool,
    pub enable_spatial_grid: bool,

    // Internal state for tracking changes
    pub previous_values: Option<ParamSnapshot>,
}

// A snapshot of parameter values used for change detection
#[derive(Debug, Clone, PartialEq)]
struct ParamSnapshot {
    scene: Scene,
    agent_count: usize,
    max_speed: f32,
    behaviors: BehaviorSettings,
    show_paths: bool,
    show_debug: bool,
    pause_simulation: bool,
    enable_parallel: bool,
    enable_spatial_grid: bool,
}

/// What changed since the last snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamChanges {
    /// Scene or population changed; agents must be rebuilt.
    pub rebuild_agents: bool,
    /// Speed or behavior tuning changed; existing agents must be synced.
    pub tuning_changed: bool,
    pub any_changed: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            scene: Scene::Fish,
            agent_count: 50,
            bounds: WorldBounds::default(),
            max_speed: 50.0,
            behaviors: BehaviorSettings::default(),
            obstacle_radius: DEFAULT_OBSTACLE_RADIUS,
            light_intensity: DEFAULT_LIGHT_INTENSITY,
            light_radius: DEFAULT_LIGHT_RADIUS,
            show_paths: false,
            show_debug: false,
            pause_simulation: false,
            enable_parallel: false,
            enable_spatial_grid: true,
            previous_values: None,
        }
    }
}

impl SimulationParams {
    pub fn mosquitoes() -> Self {
        Self {
            scene: Scene::Mosquitoes,
            agent_count: 60,
            max_speed: 120.0,
            ..Self::default()
        }
    }

    pub fn for_scene(scene: Scene) -> Self {
        match scene {
            Scene::Fish => Self::default(),
            Scene::Mosquitoes => Self::mosquitoes(),
        }
    }

    /// Switches to another scene's presets, keeping the world size and the
    /// display and performance switches.
    pub fn switch_scene(&mut self, scene: Scene) {
        let preset = Self::for_scene(scene);
        self.scene = scene;
        self.agent_count = preset.agent_count;
        self.max_speed = preset.max_speed;
        self.behaviors = preset.behaviors;
    }

    /// Construction template for a new agent of the current scene.
    pub fn agent_config(&self) -> AgentConfig {
        let base = match self.scene {
            Scene::Fish => AgentConfig::default(),
            Scene::Mosquitoes => AgentConfig::mosquito(),
        };
        AgentConfig {
            max_speed: self.max_speed,
            bounds: self.bounds,
            behaviors: self.behaviors.clone(),
            ..base
        }
    }

    fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            scene: self.scene,
            agent_count: self.agent_count,
            max_speed: self.max_speed,
            behaviors: self.behaviors.clone(),
            show_paths: self.show_paths,
            show_debug: self.show_debug,
            pause_simulation: self.pause_simulation,
            enable_parallel: self.enable_parallel,
            enable_spatial_grid: self.enable_spatial_grid,
        }
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(self.snapshot());
    }

    // Compare against the last snapshot; nothing has changed without one
    pub fn detect_changes(&self) -> ParamChanges {
        let Some(prev) = &self.previous_values else {
            return ParamChanges::default();
        };
        let current = self.snapshot();

        let rebuild_agents = current.scene != prev.scene || current.agent_count != prev.agent_count;
        let tuning_changed = current.max_speed != prev.max_speed || current.behaviors != prev.behaviors;

        ParamChanges {
            rebuild_agents,
            tuning_changed,
            any_changed: current != *prev,
        }
    }

    // Get parameter ranges for UI sliders
    pub fn get_agent_count_range() -> RangeInclusive<usize> {
        1..=2000
    }

    pub fn get_max_speed_range() -> RangeInclusive<f32> {
        5.0..=300.0
    }

    pub fn get_weight_range() -> RangeInclusive<f32> {
        0.0..=10.0
    }

    pub fn get_radius_range() -> RangeInclusive<f32> {
        5.0..=150.0
    }

    pub fn get_amplitude_range() -> RangeInclusive<f32> {
        0.0..=20.0
    }

    pub fn get_frequency_range() -> RangeInclusive<f32> {
        0.5..=12.0
    }

    pub fn get_obstacle_radius_range() -> RangeInclusive<f32> {
        MIN_OBSTACLE_RADIUS..=150.0
    }
}
