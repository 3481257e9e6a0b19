/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It provides controls for adjusting simulation parameters.
 * Parameter change detection is handled by the SimulationParams struct.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::input::KeyAction;
use crate::params::{ParamChanges, Scene, SimulationParams};

/// What the UI asked for this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiRequests {
    pub changes: ParamChanges,
    pub reset: bool,
    pub clear_obstacles: bool,
    pub clear_lights: bool,
}

// Update the UI and report which parameters changed and which buttons were clicked
pub fn update_ui(egui: &mut Egui, params: &mut SimulationParams, debug_info: &DebugInfo) -> UiRequests {
    let mut requests = UiRequests::default();

    // Take a snapshot of current parameter values for change detection
    params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Simulation Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Scene:");
                ui.selectable_value(&mut params.scene, Scene::Fish, "Fish");
                ui.selectable_value(&mut params.scene, Scene::Mosquitoes, "Mosquitoes");
            });

            ui.collapsing("Population", |ui| {
                ui.add(egui::Slider::new(&mut params.agent_count, SimulationParams::get_agent_count_range()).text("Agents"));
                ui.add(egui::Slider::new(&mut params.max_speed, SimulationParams::get_max_speed_range()).text("Max Speed"));

                if ui.button("Reset Agents").clicked() {
                    requests.reset = true;
                }
            });

            if params.scene == Scene::Fish {
                ui.collapsing("Schooling Behavior", |ui| {
                    let behaviors = &mut params.behaviors;
                    ui.add(egui::Slider::new(&mut behaviors.separation_weight, SimulationParams::get_weight_range()).text("Separation Weight"));
                    ui.add(egui::Slider::new(&mut behaviors.alignment_weight, SimulationParams::get_weight_range()).text("Alignment Weight"));
                    ui.add(egui::Slider::new(&mut behaviors.cohesion_weight, SimulationParams::get_weight_range()).text("Cohesion Weight"));
                    ui.add(egui::Slider::new(&mut behaviors.separation_radius, SimulationParams::get_radius_range()).text("Separation Radius"));
                    ui.add(egui::Slider::new(&mut behaviors.alignment_radius, SimulationParams::get_radius_range()).text("Alignment Radius"));
                    ui.add(egui::Slider::new(&mut behaviors.cohesion_radius, SimulationParams::get_radius_range()).text("Cohesion Radius"));
                    ui.separator();
                    ui.add(egui::Slider::new(&mut behaviors.swimming_weight, SimulationParams::get_weight_range()).text("Swimming Weight"));
                    ui.add(egui::Slider::new(&mut behaviors.swimming_amplitude, SimulationParams::get_amplitude_range()).text("Swimming Amplitude"));
                    ui.add(egui::Slider::new(&mut behaviors.swimming_frequency, SimulationParams::get_frequency_range()).text("Swimming Frequency"));
                });
            }

            if params.scene == Scene::Mosquitoes {
                ui.collapsing("Swarming Behavior", |ui| {
                    let behaviors = &mut params.behaviors;
                    ui.add(egui::Slider::new(&mut behaviors.swarm_attraction_weight, SimulationParams::get_weight_range()).text("Swarm Weight"));
                    ui.add(egui::Slider::new(&mut behaviors.circling_weight, SimulationParams::get_weight_range()).text("Circling Weight"));
                    ui.add(egui::Slider::new(&mut behaviors.circling_radius, SimulationParams::get_radius_range()).text("Orbit Radius"));
                    ui.add(egui::Slider::new(&mut behaviors.circling_angular_speed, SimulationParams::get_frequency_range()).text("Orbit Speed"));
                });
            }

            ui.collapsing("Environment", |ui| {
                ui.add(egui::Slider::new(&mut params.obstacle_radius, SimulationParams::get_obstacle_radius_range()).text("Obstacle Size"));
                ui.add(egui::Slider::new(&mut params.behaviors.avoidance_weight, SimulationParams::get_weight_range()).text("Avoidance Weight"));
                ui.horizontal(|ui| {
                    if ui.button("Clear Obstacles").clicked() {
                        requests.clear_obstacles = true;
                    }
                    if ui.button("Clear Lights").clicked() {
                        requests.clear_lights = true;
                    }
                });
                ui.label("Left click: obstacle (fish) or light (mosquitoes)");
                ui.label("Right click: add agent. Drag: wind");
            });

            ui.collapsing("Performance", |ui| {
                ui.checkbox(&mut params.enable_parallel, "Parallel Neighbor Search");
                ui.checkbox(&mut params.enable_spatial_grid, "Spatial Grid");

                ui.separator();

                // Performance metrics
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Mean neighbors: {:.1}", debug_info.mean_neighbors));
            });

            ui.collapsing("Keys", |ui| {
                for action in [
                    KeyAction::Pause,
                    KeyAction::TogglePaths,
                    KeyAction::Reset,
                    KeyAction::ClearObstacles,
                    KeyAction::ClearLights,
                    KeyAction::ToggleScene,
                    KeyAction::AddAgent,
                ] {
                    ui.label(action.description());
                }
                ui.label("1-6: behavior radii, 7/8: swimming weight, 9/0: amplitude, +/-: obstacle size");
            });

            ui.checkbox(&mut params.show_paths, "Show Trails");
            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
        });

    // Detect parameter changes
    requests.changes = params.detect_changes();
    requests
}

// Draw debug information on the screen
pub fn draw_debug_info(draw: &nannou::Draw, debug_info: &DebugInfo, window_rect: nannou::geom::Rect) {
    let lines = debug_info.lines();

    // Create a background panel in the top-right corner
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 200.0;
    let panel_height = line_height * lines.len() as f32 + margin;
    let panel_x = window_rect.right() - panel_width / 2.0;
    let panel_y = window_rect.top() - panel_height / 2.0;

    // Draw the background panel
    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_y = window_rect.top() - margin;

    for (i, text) in lines.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);

        draw.text(text)
            .x_y(panel_x, y)
            .w(panel_width - margin)
            .left_justify()
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
