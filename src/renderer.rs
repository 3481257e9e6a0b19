/*
 * Renderer Module
 *
 * This module draws the simulation with nannou. The simulation walks its
 * state and feeds plain views to NannouRenderer, which converts world
 * coordinates (origin bottom-left) to window coordinates (origin center).
 */

use nannou::prelude::*;

use crate::agent::Personality;
use crate::app::Model;
use crate::behavior::BehaviorKind;
use crate::scene::{AgentView, LightView, ObstacleView, SceneRenderer, WindView};
use crate::ui;

const FISH_COLOR: (f32, f32, f32) = (0.55, 0.8, 1.0);
const SWARMING_COLOR: (f32, f32, f32) = (0.85, 0.85, 0.8);
const CIRCLING_COLOR: (f32, f32, f32) = (1.0, 0.75, 0.55);

fn personality_color(personality: Personality, alpha: f32) -> Rgba {
    let (r, g, b) = match personality {
        Personality::Fish => FISH_COLOR,
        Personality::Swarming => SWARMING_COLOR,
        Personality::Circling => CIRCLING_COLOR,
    };
    rgba(r, g, b, alpha)
}

pub struct NannouRenderer<'a> {
    draw: &'a Draw,
    // World position of the window center
    offset: Vec2,
}

impl<'a> NannouRenderer<'a> {
    pub fn new(draw: &'a Draw, window_rect: Rect) -> Self {
        Self {
            draw,
            offset: vec2(-window_rect.left(), -window_rect.bottom()),
        }
    }

    #[inline]
    fn to_screen(&self, world: Vec2) -> Point2 {
        world - self.offset
    }
}

impl SceneRenderer for NannouRenderer<'_> {
    fn render_agent(&mut self, agent: &AgentView) {
        let center = self.to_screen(agent.position);
        let color = personality_color(agent.personality, 1.0);

        match agent.personality {
            Personality::Fish => {
                // Triangle pointing along the heading
                let size = agent.radius * 2.0;
                let points = [
                    pt2(size, 0.0),
                    pt2(-size, size / 2.0),
                    pt2(-size, -size / 2.0),
                ];
                self.draw
                    .polygon()
                    .color(color)
                    .points(points)
                    .xy(center)
                    .rotate(agent.heading.y.atan2(agent.heading.x));
            }
            Personality::Swarming | Personality::Circling => {
                self.draw.ellipse().xy(center).radius(agent.radius).color(color);
            }
        }
    }

    fn render_obstacle(&mut self, obstacle: &ObstacleView) {
        self.draw
            .ellipse()
            .xy(self.to_screen(obstacle.position))
            .radius(obstacle.radius)
            .color(rgba(0.35, 0.3, 0.3, 1.0))
            .stroke(rgba(0.6, 0.5, 0.5, 1.0))
            .stroke_weight(1.5);
    }

    fn render_light(&mut self, light: &LightView) {
        let center = self.to_screen(light.position);
        let glow = (0.25 * light.flicker).clamp(0.0, 1.0);

        // Halo over the attraction range, then the bulb
        self.draw
            .ellipse()
            .xy(center)
            .radius(light.radius * 3.0)
            .color(rgba(1.0, 0.9, 0.5, glow * 0.3));
        self.draw
            .ellipse()
            .xy(center)
            .radius(light.radius)
            .color(rgba(1.0, 0.9, 0.5, glow + 0.5));
    }

    fn render_path(&mut self, points: &[Vec2], personality: Personality) {
        let count = points.len() as f32;
        let vertices = points.iter().enumerate().map(|(i, point)| {
            // Older points fade out
            let alpha = 0.05 + 0.45 * (i as f32 / count);
            (self.to_screen(*point), personality_color(personality, alpha))
        });
        self.draw.polyline().weight(1.0).points_colored(vertices);
    }

    fn render_wind(&mut self, wind: &WindView) {
        let origin = self.to_screen(wind.origin);
        self.draw
            .ellipse()
            .xy(origin)
            .radius(wind.radius)
            .no_fill()
            .stroke(rgba(0.5, 0.7, 1.0, 0.3))
            .stroke_weight(1.0);
        self.draw
            .arrow()
            .start(origin)
            .end(origin + wind.direction * (wind.strength * 0.3))
            .color(rgba(0.5, 0.7, 1.0, 0.8))
            .stroke_weight(2.0);
    }
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    // Begin drawing
    let draw = app.draw();

    // Clear the background
    draw.background().color(rgb(0.02, 0.05, 0.1));

    let window_rect = app.window_rect();
    let mut renderer = NannouRenderer::new(&draw, window_rect);
    model.simulation.render(&mut renderer);

    // Draw perception and behavior radii around the first agent
    if model.simulation.params().show_debug {
        if let Some(agent) = model.simulation.agents().first() {
            let center = renderer.to_screen(agent.position);
            draw.ellipse()
                .xy(center)
                .radius(agent.perception_radius)
                .no_fill()
                .stroke(rgba(1.0, 1.0, 1.0, 0.3))
                .stroke_weight(1.0);

            let radii = [
                (BehaviorKind::Separation, RED),
                (BehaviorKind::Alignment, GREEN),
                (BehaviorKind::Cohesion, BLUE),
            ];
            for (kind, color) in radii {
                if let Ok(radius) = agent.pipeline().radius(kind) {
                    draw.ellipse()
                        .xy(center)
                        .radius(radius)
                        .no_fill()
                        .stroke(color)
                        .stroke_weight(1.0);
                }
            }

            // Velocity vector
            draw.arrow()
                .start(center)
                .end(center + agent.velocity * 0.5)
                .color(YELLOW)
                .stroke_weight(2.0);
        }

        ui::draw_debug_info(&draw, &model.debug_info, window_rect);
    }

    // Finish drawing
    draw.to_frame(app, &frame).expect("failed to draw frame");

    // Draw the egui UI
    model.egui.draw_to_frame(&frame).expect("failed to draw egui");
}
