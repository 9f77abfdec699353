//! Rendering module
//!
//! Render passes are pure reads of simulation state written against the
//! `Surface` trait. The browser build draws onto a canvas 2D context; headless
//! builds and tests record into a `DrawList`.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod draw_list;
pub mod puzzle;
pub mod shooter;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use draw_list::{DrawCommand, DrawList};
pub use puzzle::{render_next_piece, render_puzzle};
pub use shooter::render_shooter;

use glam::Vec2;

use crate::sim::Color;

/// A 2D drawing target addressed in pixels
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> Vec2;

    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    /// Axis-aligned filled rectangle with its top-left corner at `(x, y)`
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);

    /// Filled rectangle of `size` centered on `center`, rotated by `angle`
    /// radians about that center
    fn fill_rect_rotated(&mut self, center: Vec2, size: Vec2, angle: f32, color: Color);
}
