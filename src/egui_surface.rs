//! egui painter surface
//!
//! Lets an egui app paint the field behind its widgets:
//!
//! ```ignore
//! let painter = ui.painter_at(rect);
//! field.tick(&mut EguiSurface::new(painter, rect));
//! ctx.request_repaint();
//! ```
//!
//! egui repaints every frame from scratch, so `clear` is a no-op. Gradients
//! become a vertex-coloured triangle fan and the glow hint a pair of faint
//! halo circles.

use egui::epaint::Mesh;
use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke};

use crate::core::surface::{Glow, Gradient, Point, Rgba, Surface};

/// Fan vertices per rect edge
const EDGE_SEGMENTS: usize = 8;

pub struct EguiSurface {
    painter: Painter,
    rect: Rect,
}

impl EguiSurface {
    pub fn new(painter: Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    fn pos(&self, p: Point) -> Pos2 {
        Pos2::new(self.rect.min.x + p.x as f32, self.rect.min.y + p.y as f32)
    }

    /// Rect perimeter in surface coordinates, clockwise from the top-left corner
    fn perimeter(&self) -> Vec<Point> {
        let (w, h) = (self.rect.width() as f64, self.rect.height() as f64);
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ];
        let mut points = Vec::with_capacity(4 * EDGE_SEGMENTS);
        for (i, &a) in corners.iter().enumerate() {
            let b = corners[(i + 1) % corners.len()];
            for s in 0..EDGE_SEGMENTS {
                let t = s as f64 / EDGE_SEGMENTS as f64;
                points.push(Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
            }
        }
        points
    }
}

pub fn color32(c: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.alpha_u8())
}

impl Surface for EguiSurface {
    fn size(&self) -> (u32, u32) {
        (self.rect.width().round() as u32, self.rect.height().round() as u32)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.rect = Rect::from_min_size(self.rect.min, egui::vec2(width as f32, height as f32));
    }

    fn clear(&mut self) {}

    fn fill_gradient(&mut self, gradient: &Gradient) {
        let (w, h) = (self.rect.width() as f64, self.rect.height() as f64);
        let center = Point::new(w / 2.0, h / 2.0);
        let shade = |p: Point| color32(gradient.color_at(gradient.param_at(p)));

        let mut mesh = Mesh::default();
        mesh.colored_vertex(self.pos(center), shade(center));
        let rim = self.perimeter();
        for &p in &rim {
            mesh.colored_vertex(self.pos(p), shade(p));
        }
        let n = rim.len() as u32;
        for i in 0..n {
            mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
        }
        self.painter.add(Shape::mesh(mesh));
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.painter.line_segment(
            [self.pos(from), self.pos(to)],
            Stroke::new(width as f32, color32(color)),
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba, glow: Option<Glow>) {
        let c = self.pos(center);
        if let Some(glow) = glow {
            let halo = [(0.5, 0.15), (0.25, 0.3)];
            for (spread, strength) in halo {
                let r = radius + glow.blur * spread;
                let a = glow.color.a * strength;
                self.painter.circle_filled(c, r as f32, color32(glow.color.with_alpha(a)));
            }
        }
        self.painter.circle_filled(c, radius as f32, color32(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FieldConfig, ParticleField};

    #[test]
    fn test_color_conversion() {
        assert_eq!(color32(Rgba::new(0, 255, 127, 1.0)), Color32::from_rgb(0, 255, 127));
        assert_eq!(color32(Rgba::new(10, 20, 30, 0.0)), Color32::TRANSPARENT);
    }

    #[test]
    fn test_size_follows_rect() {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(800.0, 600.0));
        let mut surface = EguiSurface::new(ctx.layer_painter(egui::LayerId::background()), rect);
        assert_eq!(surface.size(), (800, 600));

        surface.set_size(1024, 768);
        assert_eq!(surface.size(), (1024, 768));
        assert_eq!(surface.rect().min, egui::pos2(10.0, 20.0));
    }

    #[test]
    fn test_tick_paints_shapes() {
        let ctx = egui::Context::default();
        let mut field = ParticleField::with_seed(FieldConfig::portfolio(), 800, 600, 2);
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0));

        let output = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            field.tick(&mut EguiSurface::new(painter, rect));
        });

        // Gradient mesh, 42 grid lines, links, and 3 circles per particle
        assert!(output.shapes.len() >= 1 + 42 + 60 * 3);
    }
}
