/*
 * Input Module
 *
 * This module maps keyboard and mouse events onto simulation commands.
 *
 * Features:
 * - Key actions for pausing, trails, reset and clearing the environment
 * - Key actions for stepping radii, swimming tuning and obstacle size
 * - Left click places an obstacle (fish) or a light (mosquitoes)
 * - Right click or A adds an agent; dragging with the left button blows wind
 */

use nannou::prelude::*;
use nannou::winit::event::WindowEvent;
use tracing::warn;

use crate::app::Model;
use crate::behavior::{Behavior, BehaviorKind};
use crate::error::SwarmResult;
use crate::obstacle::{MIN_OBSTACLE_RADIUS, OBSTACLE_RADIUS_STEP};
use crate::params::Scene;
use crate::simulation::Simulation;

const RADIUS_STEP: f32 = 5.0;
const MIN_RADIUS: f32 = 5.0;
const WEIGHT_STEP: f32 = 0.1;
const AMPLITUDE_STEP: f32 = 0.5;
const MIN_AMPLITUDE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Pause,
    TogglePaths,
    Reset,
    ClearObstacles,
    ClearLights,
    IncreaseSeparation,
    DecreaseSeparation,
    IncreaseAlignment,
    DecreaseAlignment,
    IncreaseCohesion,
    DecreaseCohesion,
    IncreaseSwimming,
    DecreaseSwimming,
    IncreaseAmplitude,
    DecreaseAmplitude,
    IncreaseObstacleSize,
    DecreaseObstacleSize,
    ToggleScene,
    AddAgent,
}

impl KeyAction {
    pub fn from_key(key: Key) -> Option<Self> {
        let action = match key {
            Key::Space => KeyAction::Pause,
            Key::P => KeyAction::TogglePaths,
            Key::R => KeyAction::Reset,
            Key::C => KeyAction::ClearObstacles,
            Key::L => KeyAction::ClearLights,
            Key::Key1 => KeyAction::IncreaseSeparation,
            Key::Key2 => KeyAction::DecreaseSeparation,
            Key::Key3 => KeyAction::IncreaseAlignment,
            Key::Key4 => KeyAction::DecreaseAlignment,
            Key::Key5 => KeyAction::IncreaseCohesion,
            Key::Key6 => KeyAction::DecreaseCohesion,
            Key::Key7 => KeyAction::IncreaseSwimming,
            Key::Key8 => KeyAction::DecreaseSwimming,
            Key::Key9 => KeyAction::IncreaseAmplitude,
            Key::Key0 => KeyAction::DecreaseAmplitude,
            Key::Equals | Key::Plus => KeyAction::IncreaseObstacleSize,
            Key::Minus => KeyAction::DecreaseObstacleSize,
            Key::M => KeyAction::ToggleScene,
            Key::A => KeyAction::AddAgent,
            _ => return None,
        };
        Some(action)
    }

    pub fn description(self) -> &'static str {
        match self {
            KeyAction::Pause => "Pause/resume simulation",
            KeyAction::TogglePaths => "Toggle trails",
            KeyAction::Reset => "Reset agents",
            KeyAction::ClearObstacles => "Clear obstacles",
            KeyAction::ClearLights => "Clear lights",
            KeyAction::IncreaseSeparation => "Increase separation radius",
            KeyAction::DecreaseSeparation => "Decrease separation radius",
            KeyAction::IncreaseAlignment => "Increase alignment radius",
            KeyAction::DecreaseAlignment => "Decrease alignment radius",
            KeyAction::IncreaseCohesion => "Increase cohesion radius",
            KeyAction::DecreaseCohesion => "Decrease cohesion radius",
            KeyAction::IncreaseSwimming => "Increase swimming weight",
            KeyAction::DecreaseSwimming => "Decrease swimming weight",
            KeyAction::IncreaseAmplitude => "Increase swimming amplitude",
            KeyAction::DecreaseAmplitude => "Decrease swimming amplitude",
            KeyAction::IncreaseObstacleSize => "Increase obstacle size",
            KeyAction::DecreaseObstacleSize => "Decrease obstacle size",
            KeyAction::ToggleScene => "Switch between fish and mosquitoes",
            KeyAction::AddAgent => "Add an agent at the pointer",
        }
    }

    pub fn apply(self, simulation: &mut Simulation) -> SwarmResult<()> {
        match self {
            KeyAction::Pause => {
                let params = simulation.params_mut();
                params.pause_simulation = !params.pause_simulation;
                Ok(())
            }
            KeyAction::TogglePaths => {
                let params = simulation.params_mut();
                params.show_paths = !params.show_paths;
                if !params.show_paths {
                    simulation.clear_paths();
                }
                Ok(())
            }
            KeyAction::Reset => simulation.reset(),
            KeyAction::ClearObstacles => {
                simulation.clear_obstacles();
                Ok(())
            }
            KeyAction::ClearLights => {
                simulation.clear_lights();
                Ok(())
            }
            KeyAction::IncreaseSeparation => step_radius(simulation, BehaviorKind::Separation, RADIUS_STEP),
            KeyAction::DecreaseSeparation => step_radius(simulation, BehaviorKind::Separation, -RADIUS_STEP),
            KeyAction::IncreaseAlignment => step_radius(simulation, BehaviorKind::Alignment, RADIUS_STEP),
            KeyAction::DecreaseAlignment => step_radius(simulation, BehaviorKind::Alignment, -RADIUS_STEP),
            KeyAction::IncreaseCohesion => step_radius(simulation, BehaviorKind::Cohesion, RADIUS_STEP),
            KeyAction::DecreaseCohesion => step_radius(simulation, BehaviorKind::Cohesion, -RADIUS_STEP),
            KeyAction::IncreaseSwimming => step_swimming_weight(simulation, WEIGHT_STEP),
            KeyAction::DecreaseSwimming => step_swimming_weight(simulation, -WEIGHT_STEP),
            KeyAction::IncreaseAmplitude => step_amplitude(simulation, AMPLITUDE_STEP),
            KeyAction::DecreaseAmplitude => step_amplitude(simulation, -AMPLITUDE_STEP),
            KeyAction::IncreaseObstacleSize => {
                simulation.params_mut().obstacle_radius += OBSTACLE_RADIUS_STEP;
                Ok(())
            }
            KeyAction::DecreaseObstacleSize => {
                let params = simulation.params_mut();
                params.obstacle_radius = (params.obstacle_radius - OBSTACLE_RADIUS_STEP).max(MIN_OBSTACLE_RADIUS);
                Ok(())
            }
            KeyAction::ToggleScene => {
                let next = match simulation.params().scene {
                    Scene::Fish => Scene::Mosquitoes,
                    Scene::Mosquitoes => Scene::Fish,
                };
                simulation.set_scene(next)
            }
            KeyAction::AddAgent => {
                let pointer = simulation.pointer();
                simulation.add_agent_at(pointer.x, pointer.y)
            }
        }
    }
}

fn step_radius(simulation: &mut Simulation, kind: BehaviorKind, delta: f32) -> SwarmResult<()> {
    let settings = &simulation.params().behaviors;
    let current = match kind {
        BehaviorKind::Separation => settings.separation_radius,
        BehaviorKind::Alignment => settings.alignment_radius,
        _ => settings.cohesion_radius,
    };
    simulation.set_behavior_radius(kind, (current + delta).max(MIN_RADIUS))
}

fn step_swimming_weight(simulation: &mut Simulation, delta: f32) -> SwarmResult<()> {
    let current = simulation.params().behaviors.swimming_weight;
    simulation.set_behavior_weight(BehaviorKind::Swimming, (current + delta).max(0.0))
}

fn step_amplitude(simulation: &mut Simulation, delta: f32) -> SwarmResult<()> {
    let params = simulation.params_mut();
    params.behaviors.swimming_amplitude = (params.behaviors.swimming_amplitude + delta).max(MIN_AMPLITUDE);
    let amplitude = params.behaviors.swimming_amplitude;

    for agent in simulation.agents_mut() {
        if let Ok(Behavior::Swimming(swimming)) = agent.pipeline_mut().get_mut(BehaviorKind::Swimming) {
            swimming.amplitude = amplitude;
        }
    }
    Ok(())
}

// Window coordinates are centered with y up; the world starts at the bottom-left corner
pub fn screen_to_world(app: &App, screen: Point2) -> Vec2 {
    let rect = app.window_rect();
    vec2(screen.x - rect.left(), screen.y - rect.bottom())
}

// Key pressed event handler
pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }
    if let Some(action) = KeyAction::from_key(key) {
        if let Err(error) = action.apply(&mut model.simulation) {
            warn!(?action, %error, "key action failed");
        }
    }
}

// Mouse moved event handler
pub fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    let world = screen_to_world(app, pos);
    let held = model.left_button_held;
    model.simulation.pointer_moved(world.x, world.y, held);
}

// Mouse pressed event handler
pub fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    // Clicks on the UI panel belong to egui
    if model.egui.ctx().is_pointer_over_area() {
        return;
    }

    let world = screen_to_world(app, app.mouse.position());
    match button {
        MouseButton::Left => {
            model.left_button_held = true;
            model.simulation.pointer_moved(world.x, world.y, true);
            match model.simulation.params().scene {
                Scene::Fish => model.simulation.add_obstacle_at(world.x, world.y),
                Scene::Mosquitoes => model.simulation.add_light_at(world.x, world.y),
            }
        }
        MouseButton::Right => {
            if let Err(error) = model.simulation.add_agent_at(world.x, world.y) {
                warn!(%error, "could not add agent");
            }
        }
        _ => {}
    }
}

// Mouse released event handler
pub fn mouse_released(app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.left_button_held = false;
        let world = screen_to_world(app, app.mouse.position());
        model.simulation.pointer_moved(world.x, world.y, false);
    }
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &WindowEvent) {
    model.egui.handle_raw_event(event);
}
