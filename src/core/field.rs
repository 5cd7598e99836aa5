//! Particle field renderer
//!
//! Owns the surface size, the particle set and the grid rotation. One call to
//! [`ParticleField::tick`] draws one complete frame:
//!
//! 1. clear
//! 2. backdrop gradient, then the rotating grid
//! 3. advance and wrap every particle
//! 4. proximity connections (all unordered pairs, O(n²))
//! 5. particle circles with a glow hint

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::config::{Backdrop, FieldConfig, GridConfig};
use super::particle::Particle;
use super::surface::{ColorStop, Glow, Gradient, Point, Surface};
use crate::theme::colors;

/// What one frame drew
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub particles: usize,
    pub connections: usize,
    /// Grid rotation after this frame (radians, unbounded)
    pub rotation: f64,
}

/// Alpha of a connection between two particles `distance` apart.
///
/// `base` at distance 0, falling linearly to 0 at `threshold` and beyond.
#[inline]
pub fn connection_alpha(distance: f64, threshold: f64, base: f64) -> f64 {
    if distance >= threshold {
        0.0
    } else {
        base * (1.0 - distance / threshold)
    }
}

pub struct ParticleField {
    config: FieldConfig,
    width: u32,
    height: u32,
    particles: Vec<Particle>,
    rotation: f64,
    rng: SmallRng,
}

impl ParticleField {
    /// Create a field for a `width × height` surface, seeded from entropy
    pub fn new(config: FieldConfig, width: u32, height: u32) -> Self {
        Self::with_rng(config, width, height, SmallRng::from_entropy())
    }

    /// Deterministic field for tests and reproducible captures
    pub fn with_seed(config: FieldConfig, width: u32, height: u32, seed: u64) -> Self {
        Self::with_rng(config, width, height, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: FieldConfig, width: u32, height: u32, rng: SmallRng) -> Self {
        let mut field = Self {
            config,
            width,
            height,
            particles: Vec::new(),
            rotation: 0.0,
            rng,
        };
        field.init(width, height);
        field
    }

    /// Replace the whole particle set with one sized for `width × height`.
    pub fn init(&mut self, width: u32, height: u32) {
        let count = self.config.particle_count(width, height);
        let (w, h) = (width as f64, height as f64);
        let config = &self.config;
        let rng = &mut self.rng;
        self.particles = (0..count).map(|_| Particle::random(rng, config, w, h)).collect();
        info!(count, width, height, "Particle field initialized");
    }

    /// Store new surface dimensions and regenerate the particle set.
    ///
    /// Old particles are discarded, so two calls with the same size yield
    /// the same count but independently sampled positions.
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!(from = ?(self.width, self.height), to = ?(width, height), "Resizing particle field");
        self.width = width;
        self.height = height;
        self.init(width, height);
    }

    /// Draw one frame onto `surface`
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> FrameReport {
        surface.clear();
        self.draw_backdrop(surface);
        if let Some(grid) = self.config.grid {
            self.rotation += grid.rotation_step;
            self.draw_grid(surface, &grid);
        }

        self.advance();
        let connections = self.draw_connections(surface);
        self.draw_particles(surface);

        FrameReport {
            particles: self.particles.len(),
            connections,
            rotation: self.rotation,
        }
    }

    fn advance(&mut self) {
        let (w, h, m) = (self.width as f64, self.height as f64, self.config.wrap_margin);
        for p in &mut self.particles {
            p.step(w, h, m);
        }
    }

    fn draw_backdrop<S: Surface + ?Sized>(&self, surface: &mut S) {
        let (w, h) = (self.width as f64, self.height as f64);
        let gradient = match self.config.backdrop {
            Backdrop::RadialVignette => Gradient::Radial {
                center: Point::new(w / 2.0, h / 2.0),
                inner_radius: 0.0,
                outer_radius: w.max(h) / 1.2,
                stops: [
                    ColorStop { offset: 0.0, color: colors::VIGNETTE_CENTER },
                    ColorStop { offset: 1.0, color: colors::VIGNETTE_EDGE },
                ],
            },
            Backdrop::LinearWash => Gradient::Linear {
                from: Point::new(0.0, 0.0),
                to: Point::new(0.0, h),
                stops: [
                    ColorStop { offset: 0.0, color: colors::WASH_TOP },
                    ColorStop { offset: 1.0, color: colors::WASH_BOTTOM },
                ],
            },
            Backdrop::None => return,
        };
        surface.fill_gradient(&gradient);
    }

    /// Square lattice of `2 * half_lines + 1` lines per axis, rotated about the centre
    fn draw_grid<S: Surface + ?Sized>(&self, surface: &mut S, grid: &GridConfig) {
        let (w, h) = (self.width as f64, self.height as f64);
        let (cx, cy) = (w / 2.0, h / 2.0);
        let size = w.min(h) * grid.extent_factor;
        let (sin, cos) = self.rotation.sin_cos();
        let place = |x: f64, y: f64| Point::new(cx + x * cos - y * sin, cy + x * sin + y * cos);

        let n = grid.half_lines as i64;
        for i in -n..=n {
            let offset = (i as f64 / n as f64) * size;
            surface.stroke_line(place(offset, -size), place(offset, size), grid.color, grid.line_width);
            surface.stroke_line(place(-size, offset), place(size, offset), grid.color, grid.line_width);
        }
    }

    fn draw_connections<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        let threshold = self.config.link_distance;
        let threshold_sq = threshold * threshold;
        let mut drawn = 0;

        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let (dx, dy) = (a.x - b.x, a.y - b.y);
                let d_sq = dx * dx + dy * dy;
                if d_sq >= threshold_sq {
                    continue;
                }
                let alpha = connection_alpha(d_sq.sqrt(), threshold, self.config.link_alpha);
                surface.stroke_line(
                    a.position(),
                    b.position(),
                    self.config.color.with_alpha(alpha),
                    self.config.link_width,
                );
                drawn += 1;
            }
        }
        drawn
    }

    fn draw_particles<S: Surface + ?Sized>(&self, surface: &mut S) {
        let glow = (self.config.glow_blur > 0.0).then_some(Glow {
            blur: self.config.glow_blur,
            color: self.config.glow_color,
        });
        for p in &self.particles {
            surface.fill_circle(p.position(), p.r, self.config.color.with_alpha(p.alpha), glow);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for hosts that seed or pin particles
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::{DrawOp, RecordingSurface};

    fn field(w: u32, h: u32) -> ParticleField {
        ParticleField::with_seed(FieldConfig::portfolio(), w, h, 42)
    }

    fn still(x: f64, y: f64) -> Particle {
        Particle { x, y, vx: 0.0, vy: 0.0, r: 1.0, alpha: 0.5 }
    }

    #[test]
    fn test_connection_alpha_edges() {
        assert_eq!(connection_alpha(140.0, 140.0, 0.12), 0.0);
        assert_eq!(connection_alpha(200.0, 140.0, 0.12), 0.0);
        assert_eq!(connection_alpha(0.0, 140.0, 0.12), 0.12);
        assert!((connection_alpha(70.0, 140.0, 0.12) - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_connection_alpha_monotonic() {
        let mut prev = f64::INFINITY;
        for step in 0..=280 {
            let a = connection_alpha(step as f64 * 0.5, 140.0, 0.12);
            assert!(a <= prev, "alpha rose at distance {}", step as f64 * 0.5);
            prev = a;
        }
    }

    #[test]
    fn test_init_counts() {
        assert_eq!(field(800, 600).particles().len(), 60);
        assert_eq!(field(2000, 2000).particles().len(), 60);
        assert_eq!(field(0, 0).particles().len(), 60);
        assert_eq!(
            ParticleField::with_seed(FieldConfig::dense(), 2000, 2000, 1).particles().len(),
            60
        );
        assert!(field(140_000, 1000).particles().len() >= 1000);
    }

    #[test]
    fn test_resize_twice_same_count_new_positions() {
        let mut f = field(800, 600);
        f.resize(4000, 4000);
        let first: Vec<Particle> = f.particles().to_vec();
        f.resize(4000, 4000);
        let second = f.particles();

        assert_eq!(f.size(), (4000, 4000));
        assert_eq!(first.len(), 114);
        assert_eq!(first.len(), second.len());
        assert_ne!(first.as_slice(), second);
    }

    #[test]
    fn test_positions_stay_in_overscan_box() {
        let mut f = ParticleField::with_seed(FieldConfig::dense(), 320, 240, 9);
        let mut surface = RecordingSurface::new(320, 240);
        for _ in 0..2000 {
            f.tick(&mut surface);
            surface.take_ops();
            for p in f.particles() {
                assert!((-10.0..=330.0).contains(&p.x), "x out of bounds: {}", p.x);
                assert!((-10.0..=250.0).contains(&p.y), "y out of bounds: {}", p.y);
            }
        }
    }

    #[test]
    fn test_tick_wraps_boundary_particles() {
        let mut f = field(800, 600);
        f.particles_mut()[0] = still(810.0, 300.0);
        f.particles_mut()[1] = still(-10.0, 300.0);
        f.particles_mut()[2] = still(400.0, 610.0);
        f.particles_mut()[3] = still(400.0, -10.0);

        f.tick(&mut RecordingSurface::new(800, 600));

        let p = f.particles();
        assert_eq!(p[0].x, -10.0);
        assert_eq!(p[1].x, 810.0);
        assert_eq!(p[2].y, -10.0);
        assert_eq!(p[3].y, 610.0);
    }

    #[test]
    fn test_frame_draw_order() {
        let mut f = field(800, 600);
        let mut surface = RecordingSurface::new(800, 600);
        let report = f.tick(&mut surface);
        let ops = surface.ops();

        assert_eq!(ops[0], DrawOp::Clear);
        assert!(matches!(ops[1], DrawOp::Gradient(Gradient::Radial { .. })));

        // 21 offsets × 2 axes of grid lines, then links, then circles
        let grid_lines = 42;
        let lines = ops.iter().filter(|op| matches!(op, DrawOp::Line { .. })).count();
        let circles = ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. })).count();
        assert_eq!(lines, grid_lines + report.connections);
        assert_eq!(circles, 60);
        assert_eq!(report.particles, 60);

        let first_circle = ops.iter().position(|op| matches!(op, DrawOp::Circle { .. })).unwrap();
        assert_eq!(first_circle, 2 + lines);
        assert!(ops[first_circle..].iter().all(|op| matches!(op, DrawOp::Circle { .. })));
    }

    #[test]
    fn test_connections_only_below_threshold() {
        let mut f = field(2000, 2000);
        let mut pinned = vec![still(100.0, 100.0), still(170.0, 100.0), still(100.0, 240.0)];
        // Everything else far away on a lattice spaced beyond the threshold
        for i in 0..57 {
            pinned.push(still(400.0 + (i % 8) as f64 * 150.0, 400.0 + (i / 8) as f64 * 150.0));
        }
        f.particles_mut().copy_from_slice(&pinned);

        let mut surface = RecordingSurface::new(2000, 2000);
        let report = f.tick(&mut surface);

        // (0,1) at 70 px links; (0,2) at exactly 140 px does not; (1,2) is ~156 px
        assert_eq!(report.connections, 1);
        let link = surface
            .ops()
            .iter()
            .skip(2 + 42)
            .find_map(|op| match op {
                DrawOp::Line { color, .. } => Some(*color),
                _ => None,
            })
            .unwrap();
        assert!((link.a - 0.06).abs() < 1e-12);
        assert_eq!((link.r, link.g, link.b), (0, 255, 127));
    }

    #[test]
    fn test_grid_rotation_advances_per_tick() {
        let mut f = field(800, 600);
        let mut surface = RecordingSurface::new(800, 600);
        for _ in 0..10 {
            f.tick(&mut surface);
        }
        assert!((f.rotation() - 0.008).abs() < 1e-12);
    }

    #[test]
    fn test_dense_preset_has_no_grid() {
        let mut f = ParticleField::with_seed(FieldConfig::dense(), 800, 600, 3);
        let mut surface = RecordingSurface::new(800, 600);
        let report = f.tick(&mut surface);
        let lines = surface.ops().iter().filter(|op| matches!(op, DrawOp::Line { .. })).count();

        assert_eq!(f.rotation(), 0.0);
        assert_eq!(lines, report.connections);
        assert!(matches!(surface.ops()[1], DrawOp::Gradient(Gradient::Linear { .. })));
    }

    #[test]
    fn test_particles_drawn_with_glow() {
        let mut f = field(800, 600);
        let mut surface = RecordingSurface::new(800, 600);
        f.tick(&mut surface);
        let expected: Vec<f64> = f.particles().iter().map(|p| p.alpha).collect();
        let drawn: Vec<f64> = surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Circle { color, glow, .. } => {
                    assert_eq!(glow.map(|g| g.blur), Some(8.0));
                    Some(color.a)
                }
                _ => None,
            })
            .collect();
        assert_eq!(drawn, expected);
    }
}
