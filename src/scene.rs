/*
 * Scene Module
 *
 * The drawing contract between the simulation and whatever displays it.
 * The simulation hands out plain-data views in world coordinates; it never
 * knows how, or whether, they end up on screen.
 */

use nannou::prelude::Vec2;

use crate::agent::Personality;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub position: Vec2,
    /// Unit direction of travel.
    pub heading: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub personality: Personality,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleView {
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightView {
    pub position: Vec2,
    pub radius: f32,
    pub intensity: f32,
    /// Current intensity relative to the base, around 1.0.
    pub flicker: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindView {
    pub origin: Vec2,
    pub direction: Vec2,
    pub strength: f32,
    pub radius: f32,
}

pub trait SceneRenderer {
    fn render_agent(&mut self, agent: &AgentView);

    fn render_obstacle(&mut self, obstacle: &ObstacleView);

    fn render_light(&mut self, light: &LightView);

    /// Trail points, oldest first. Only called while trails are shown.
    fn render_path(&mut self, _points: &[Vec2], _personality: Personality) {}

    fn render_wind(&mut self, _wind: &WindView) {}
}
