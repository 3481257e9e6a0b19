/*
 * Swarm Simulation - Module Definitions
 *
 * This file defines the module structure for the swarm simulation. The
 * steering engine (agents, behaviors, pipeline, environment, simulation) has
 * no window dependency; app, input, renderer and ui form the nannou host.
 */

// Re-export key components for easier access
pub use agent::{Agent, AgentConfig, Neighbor, Personality, WorldBounds};
pub use behavior::{Behavior, BehaviorKind};
pub use debug::DebugInfo;
pub use environment::Environment;
pub use error::{SwarmError, SwarmResult};
pub use params::{Scene, SimulationParams};
pub use pipeline::{BehaviorPipeline, BehaviorSettings};
pub use scene::SceneRenderer;
pub use simulation::Simulation;

// Steering engine
pub mod agent;
pub mod behavior;
pub mod environment;
pub mod error;
pub mod light;
pub mod mosquito;
pub mod neighbors;
pub mod obstacle;
pub mod path_trace;
pub mod pipeline;
pub mod scene;
pub mod simulation;
pub mod spatial_grid;
pub mod vector;
pub mod wind;

// Configuration and diagnostics
pub mod debug;
pub mod params;

// nannou host
pub mod app;
pub mod input;
pub mod renderer;
pub mod ui;
