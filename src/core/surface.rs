//! 2D drawing surface abstraction
//!
//! The renderer only needs a handful of primitives: clear, full-surface
//! gradient fill, stroked line and filled circle with an optional glow hint.
//! Hosts (canvas, egui) implement [`Surface`]; [`RecordingSurface`] and
//! [`CountingSurface`] are headless implementations.

use serde::{Deserialize, Serialize};

/// Surface-relative point in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Straight RGB with a float alpha in [0, 1], matching CSS `rgba()`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour with a different alpha
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// CSS colour string, e.g. `rgba(0,255,127,0.12)`
    pub fn to_css(self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }

    /// Alpha as an 8-bit channel
    pub fn alpha_u8(self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Component-wise linear interpolation, `t` clamped to [0, 1]
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Gradient filling the whole surface
#[derive(Clone, Debug, PartialEq)]
pub enum Gradient {
    Radial {
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        stops: [ColorStop; 2],
    },
    Linear {
        from: Point,
        to: Point,
        stops: [ColorStop; 2],
    },
}

impl Gradient {
    pub fn stops(&self) -> &[ColorStop; 2] {
        match self {
            Gradient::Radial { stops, .. } | Gradient::Linear { stops, .. } => stops,
        }
    }

    /// Colour at a gradient parameter `t` (0 = first stop, 1 = last stop)
    pub fn color_at(&self, t: f64) -> Rgba {
        let [start, end] = self.stops();
        let span = end.offset - start.offset;
        if span <= f64::EPSILON {
            return if t < end.offset { start.color } else { end.color };
        }
        start.color.lerp(end.color, (t - start.offset) / span)
    }

    /// Gradient parameter of a surface point
    pub fn param_at(&self, p: Point) -> f64 {
        match *self {
            Gradient::Radial { center, inner_radius, outer_radius, .. } => {
                let span = outer_radius - inner_radius;
                if span <= f64::EPSILON {
                    return 1.0;
                }
                ((p.distance(center) - inner_radius) / span).clamp(0.0, 1.0)
            }
            Gradient::Linear { from, to, .. } => {
                let (dx, dy) = (to.x - from.x, to.y - from.y);
                let len_sq = dx * dx + dy * dy;
                if len_sq <= f64::EPSILON {
                    return 1.0;
                }
                (((p.x - from.x) * dx + (p.y - from.y) * dy) / len_sq).clamp(0.0, 1.0)
            }
        }
    }
}

/// Soft glow hint (canvas `shadowBlur` / `shadowColor`)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub blur: f64,
    pub color: Rgba,
}

/// Drawing capability handed to the renderer by its host.
pub trait Surface {
    /// Current pixel dimensions
    fn size(&self) -> (u32, u32);

    /// Resize the backing store (e.g. `canvas.width = innerWidth`)
    fn set_size(&mut self, width: u32, height: u32);

    /// Clear the whole surface
    fn clear(&mut self);

    /// Fill the whole surface with a gradient
    fn fill_gradient(&mut self, gradient: &Gradient);

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba, glow: Option<Glow>);
}

// ============================================================================
// Headless surfaces
// ============================================================================

/// One recorded drawing call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    Gradient(Gradient),
    Line { from: Point, to: Point, color: Rgba, width: f64 },
    Circle { center: Point, radius: f64, color: Rgba, glow: Option<Glow> },
}

/// Surface that records every call, for inspection in tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ops: Vec::new() }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded ops, leaving the log empty
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn fill_gradient(&mut self, gradient: &Gradient) {
        self.ops.push(DrawOp::Gradient(gradient.clone()));
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.ops.push(DrawOp::Line { from, to, color, width });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba, glow: Option<Glow>) {
        self.ops.push(DrawOp::Circle { center, radius, color, glow });
    }
}

/// Per-kind call totals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OpCounts {
    pub clears: u64,
    pub gradients: u64,
    pub lines: u64,
    pub circles: u64,
}

impl OpCounts {
    pub fn total(&self) -> u64 {
        self.clears + self.gradients + self.lines + self.circles
    }
}

/// Surface that only counts calls; used by the headless CLI driver.
#[derive(Debug, Default)]
pub struct CountingSurface {
    width: u32,
    height: u32,
    counts: OpCounts,
}

impl CountingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, counts: OpCounts::default() }
    }

    pub fn counts(&self) -> OpCounts {
        self.counts
    }

    /// Return the totals and reset them
    pub fn take_counts(&mut self) -> OpCounts {
        std::mem::take(&mut self.counts)
    }
}

impl Surface for CountingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.counts.clears += 1;
    }

    fn fill_gradient(&mut self, _gradient: &Gradient) {
        self.counts.gradients += 1;
    }

    fn stroke_line(&mut self, _from: Point, _to: Point, _color: Rgba, _width: f64) {
        self.counts.lines += 1;
    }

    fn fill_circle(&mut self, _center: Point, _radius: f64, _color: Rgba, _glow: Option<Glow>) {
        self.counts.circles += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_formatting() {
        assert_eq!(Rgba::new(0, 255, 127, 0.12).to_css(), "rgba(0,255,127,0.12)");
        assert_eq!(Rgba::new(0, 0, 0, 0.0).to_css(), "rgba(0,0,0,0)");
    }

    #[test]
    fn test_radial_param_and_color() {
        let g = Gradient::Radial {
            center: Point::new(100.0, 100.0),
            inner_radius: 0.0,
            outer_radius: 100.0,
            stops: [
                ColorStop { offset: 0.0, color: Rgba::new(0, 0, 0, 0.0) },
                ColorStop { offset: 1.0, color: Rgba::new(0, 0, 0, 0.4) },
            ],
        };
        assert_eq!(g.param_at(Point::new(100.0, 100.0)), 0.0);
        assert!((g.param_at(Point::new(150.0, 100.0)) - 0.5).abs() < 1e-9);
        // Beyond the outer radius clamps to the last stop
        assert_eq!(g.param_at(Point::new(400.0, 100.0)), 1.0);
        assert!((g.color_at(0.5).a - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_linear_param_projects_onto_axis() {
        let g = Gradient::Linear {
            from: Point::new(0.0, 0.0),
            to: Point::new(0.0, 200.0),
            stops: [
                ColorStop { offset: 0.0, color: Rgba::new(0, 255, 127, 0.0) },
                ColorStop { offset: 1.0, color: Rgba::new(0, 0, 0, 1.0) },
            ],
        };
        // x does not matter for a vertical gradient
        assert!((g.param_at(Point::new(500.0, 50.0)) - 0.25).abs() < 1e-9);
        assert_eq!(g.color_at(1.0), Rgba::new(0, 0, 0, 1.0));
    }

    #[test]
    fn test_counting_surface_take_resets() {
        let mut s = CountingSurface::new(10, 10);
        s.clear();
        s.stroke_line(Point::default(), Point::new(1.0, 1.0), Rgba::new(0, 0, 0, 1.0), 1.0);
        s.stroke_line(Point::default(), Point::new(2.0, 2.0), Rgba::new(0, 0, 0, 1.0), 1.0);
        let counts = s.take_counts();
        assert_eq!(counts.lines, 2);
        assert_eq!(counts.total(), 3);
        assert_eq!(s.counts(), OpCounts::default());
    }
}
