//! Shared resources: canvas geometry and status messages.

use bevy::prelude::*;

/// The logical drawing surface, a fixed-size region independent of physical
/// pixel size. Canvas coordinates are y-down with the origin at the top
/// left (matching the projection output); world space is y-up centered on
/// the canvas middle.
#[derive(Resource, Clone, Copy)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Canvas {
    pub fn canvas_to_world(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x - self.width / 2.0, self.height / 2.0 - p.y)
    }

    pub fn world_to_canvas(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x + self.width / 2.0, self.height / 2.0 - p.y)
    }

    /// Half-extents of the canvas in world units.
    pub fn half(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Transient status / error message displayed in the bottom bar.
/// `timer` counts down in seconds; the message is visible while `timer > 0`.
#[derive(Resource, Default)]
pub struct StatusMessage {
    pub text: String,
    pub timer: f32,
}

impl StatusMessage {
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.timer = 4.0;
    }
}
