//! Canvas 2D surface for the browser build

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use crate::sim::Color;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    /// Look up a `<canvas>` by element id
    pub fn from_element_id(id: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let canvas = document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let surface = Self::new(canvas);
        if surface.is_none() {
            log::warn!("No 2d context for canvas #{}", id);
        }
        surface
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self, color: Color) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
        if color.a > 0 {
            self.fill_rect(0.0, 0.0, size.x, size.y, color);
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_rect_rotated(&mut self, center: Vec2, size: Vec2, angle: f32, color: Color) {
        self.ctx.save();
        if self.ctx.translate(center.x as f64, center.y as f64).is_err()
            || self.ctx.rotate(angle as f64).is_err()
        {
            self.ctx.restore();
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(
            -(size.x as f64) / 2.0,
            -(size.y as f64) / 2.0,
            size.x as f64,
            size.y as f64,
        );
        self.ctx.restore();
    }
}
