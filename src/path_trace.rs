/*
 * Path Trace Module
 *
 * A bounded buffer of recent positions used to draw trails. Points are only
 * recorded once the agent has moved a minimum distance from the last one.
 */

use nannou::prelude::Vec2;
use std::collections::VecDeque;

pub const DEFAULT_PATH_LENGTH: usize = 50;

#[derive(Debug, Clone)]
pub struct PathTrace {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Default for PathTrace {
    fn default() -> Self {
        Self::new(DEFAULT_PATH_LENGTH)
    }
}

impl PathTrace {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest first.
    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().copied()
    }

    pub fn last(&self) -> Option<Vec2> {
        self.points.back().copied()
    }

    /// Appends `point` if it lies more than `min_spacing` from the last
    /// recorded point. Returns whether it was recorded.
    pub fn record(&mut self, point: Vec2, min_spacing: f32) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if let Some(last) = self.last() {
            if last.distance(point) <= min_spacing {
                return false;
            }
        }

        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
