//! `<canvas>` 2D context surface

use std::f64::consts::TAU;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::core::surface::{Glow, Gradient, Point, Rgba, Surface};
use crate::error::{js_error, Error, Result};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up `<canvas id=...>` and take its 2D context
    pub fn from_element_id(id: &str) -> Result<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| Error::Host("no document".into()))?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| Error::Host(format!("no element with id `{id}`")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| Error::Host(format!("element `{id}` is not a canvas")))?;
        Self::new(canvas)
    }

    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| js_error("getContext", e))?
            .ok_or_else(|| Error::Host("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| Error::Host("context is not a CanvasRenderingContext2d".into()))?;
        Ok(Self { canvas, ctx })
    }

    fn build_gradient(&self, gradient: &Gradient) -> Result<CanvasGradient> {
        let g = match *gradient {
            Gradient::Radial { center, inner_radius, outer_radius, .. } => self
                .ctx
                .create_radial_gradient(center.x, center.y, inner_radius, center.x, center.y, outer_radius)
                .map_err(|e| js_error("createRadialGradient", e))?,
            Gradient::Linear { from, to, .. } => {
                self.ctx.create_linear_gradient(from.x, from.y, to.x, to.y)
            }
        };
        for stop in gradient.stops() {
            g.add_color_stop(stop.offset as f32, &stop.color.to_css())
                .map_err(|e| js_error("addColorStop", e))?;
        }
        Ok(g)
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn fill_gradient(&mut self, gradient: &Gradient) {
        match self.build_gradient(gradient) {
            Ok(g) => {
                let (w, h) = self.size();
                self.ctx.set_fill_style_canvas_gradient(&g);
                self.ctx.fill_rect(0.0, 0.0, w as f64, h as f64);
            }
            Err(e) => warn!(error = %e, "Skipping backdrop gradient"),
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba, glow: Option<Glow>) {
        self.ctx.begin_path();
        self.ctx.set_fill_style_str(&color.to_css());
        if let Some(glow) = glow {
            self.ctx.set_shadow_blur(glow.blur);
            self.ctx.set_shadow_color(&glow.color.to_css());
        }
        if let Err(e) = self.ctx.arc(center.x, center.y, radius, 0.0, TAU) {
            warn!(error = ?e, radius, "Skipping particle arc");
        } else {
            self.ctx.fill();
        }
        if glow.is_some() {
            self.ctx.set_shadow_blur(0.0);
        }
    }
}
