/*
 * Application Module
 *
 * This module defines the nannou application model for the swarm
 * simulation: window creation, the per-frame update (UI, parameter sync,
 * simulation step) and the wiring of input and render callbacks.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{info, warn};

use crate::agent::WorldBounds;
use crate::debug::DebugInfo;
use crate::input;
use crate::params::{Scene, SimulationParams};
use crate::renderer;
use crate::simulation::Simulation;
use crate::ui;

// Steps longer than this are split so a stalled frame cannot tunnel agents
const MAX_STEP: f32 = 1.0 / 30.0;

// Main model for the application
pub struct Model {
    pub simulation: Simulation,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub left_button_held: bool,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    // Get the primary monitor's dimensions
    let monitor = app.primary_monitor().expect("Failed to get primary monitor");
    let monitor_size = monitor.size();

    // Calculate window size based on monitor size (80% of monitor size)
    let window_width = monitor_size.width as f32 * 0.8;
    let window_height = monitor_size.height as f32 * 0.8;

    // Create the main window with dynamic size
    let window_id = app
        .new_window()
        .title("Swarm Simulation")
        .size(window_width as u32, window_height as u32)
        .view(renderer::view)
        .key_pressed(input::key_pressed)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .raw_event(input::raw_window_event)
        .build()
        .expect("Failed to create window");

    let window = app.window(window_id).expect("Window was just created");

    // Create the UI
    let egui = Egui::from_window(&window);

    // The world matches the window so screen and world coordinates differ by an offset
    let rect = window.rect();
    let params = SimulationParams {
        bounds: WorldBounds::new(rect.w(), rect.h()),
        ..SimulationParams::default()
    };
    let simulation = Simulation::new(params).expect("Default parameters are valid");
    info!(width = rect.w(), height = rect.h(), "window created");

    Model {
        simulation,
        egui,
        debug_info: DebugInfo::default(),
        left_button_held: false,
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    // Update debug info
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    // Update UI and apply whatever it changed
    let scene_before = model.simulation.params().scene;
    let requests = ui::update_ui(&mut model.egui, model.simulation.params_mut(), &model.debug_info);
    apply_ui_requests(model, scene_before, requests);

    // Advance the simulation in bounded steps
    let mut remaining = update.since_last.as_secs_f32();
    while remaining > 0.0 {
        let dt = remaining.min(MAX_STEP);
        model.simulation.step(dt);
        remaining -= dt;
    }

    model.debug_info.refresh(&model.simulation);
}

fn apply_ui_requests(model: &mut Model, scene_before: Scene, requests: ui::UiRequests) {
    let simulation = &mut model.simulation;
    let scene = simulation.params().scene;

    let rebuilt = if scene != scene_before {
        simulation.set_scene(scene)
    } else if requests.reset || requests.changes.rebuild_agents {
        simulation.reset()
    } else {
        Ok(())
    };
    if let Err(error) = rebuilt {
        warn!(%error, "could not rebuild agents");
    }

    if requests.changes.tuning_changed {
        simulation.sync_behavior_settings();
    }
    if !simulation.params().show_paths {
        simulation.clear_paths();
    }
    if requests.clear_obstacles {
        simulation.clear_obstacles();
    }
    if requests.clear_lights {
        simulation.clear_lights();
    }
}
