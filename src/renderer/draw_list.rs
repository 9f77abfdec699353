//! Recording surface
//!
//! Stores draw calls instead of rasterizing them. Each `clear` starts a new
//! frame, so the list only ever holds the latest frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Surface;
use crate::sim::Color;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    FillRectRotated {
        center: Vec2,
        size: Vec2,
        angle: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    size: Vec2,
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
            frames: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Frames recorded so far (one per `clear`)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Filled rectangles drawn in a color this frame
    pub fn count_color(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|c| match c {
                DrawCommand::FillRect { color: c, .. } => *c == color,
                DrawCommand::FillRectRotated { color: c, .. } => *c == color,
                DrawCommand::Clear { .. } => false,
            })
            .count()
    }
}

impl Surface for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.frames += 1;
        self.commands.push(DrawCommand::Clear { color });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn fill_rect_rotated(&mut self, center: Vec2, size: Vec2, angle: f32, color: Color) {
        self.commands.push(DrawCommand::FillRectRotated {
            center,
            size,
            angle,
            color,
        });
    }
}
