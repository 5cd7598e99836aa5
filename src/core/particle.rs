//! Particle state and boundary wrapping

use rand::Rng;

use super::config::{FieldConfig, Span};
use super::surface::Point;

/// One drifting point of the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    /// px per frame
    pub vx: f64,
    pub vy: f64,
    pub r: f64,
    pub alpha: f64,
}

impl Particle {
    /// Spawn a particle uniformly inside `[0, width) × [0, height)`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, config: &FieldConfig, width: f64, height: f64) -> Self {
        let speed = Span::new(-config.max_speed, config.max_speed);
        Self {
            x: sample(rng, Span::new(0.0, width)),
            y: sample(rng, Span::new(0.0, height)),
            vx: sample(rng, speed),
            vy: sample(rng, speed),
            r: sample(rng, config.radius),
            alpha: sample(rng, config.alpha),
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Advance one frame and wrap around the surface
    #[inline]
    pub fn step(&mut self, width: f64, height: f64, margin: f64) {
        self.x += self.vx;
        self.y += self.vy;
        self.wrap(width, height, margin);
    }

    /// Toroidal wrap with overscan: leaving past one edge re-enters just past
    /// the opposite one. Afterwards both coordinates lie in
    /// `[-margin, extent + margin]`.
    #[inline]
    pub fn wrap(&mut self, width: f64, height: f64, margin: f64) {
        self.x = wrap_axis(self.x, width, margin);
        self.y = wrap_axis(self.y, height, margin);
    }
}

#[inline]
fn wrap_axis(v: f64, extent: f64, margin: f64) -> f64 {
    if v <= -margin {
        extent + margin
    } else if v >= extent + margin {
        -margin
    } else {
        v
    }
}

/// Uniform sample in `[span.min, span.max)`; an empty span yields `min`
fn sample<R: Rng + ?Sized>(rng: &mut R, span: Span) -> f64 {
    span.min + rng.gen::<f64>() * (span.max - span.min)
}
