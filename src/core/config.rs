//! Field configuration and built-in presets
//!
//! Every renderer constant lives here. Two presets ship with the crate:
//! `portfolio` (sparse field, radial vignette, rotating grid) and `dense`
//! (tighter field, faster drift, linear wash, no grid).

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use super::surface::Rgba;
use crate::error::{Error, Result};
use crate::theme::colors;

/// Closed interval `[min, max]` for uniformly sampled particle attributes
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Full-surface gradient drawn under the grid and particles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backdrop {
    /// Transparent centre darkening towards the edges
    #[default]
    RadialVignette,
    /// Top-to-bottom accent wash
    LinearWash,
    None,
}

/// Rotating wire grid overlay
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Radians added to the rotation every frame
    pub rotation_step: f64,
    /// Lines on each side of the centre line, per axis
    pub half_lines: u32,
    /// Half-extent of the lattice as a multiple of `min(width, height)`
    pub extent_factor: f64,
    pub color: Rgba,
    pub line_width: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rotation_step: 0.0008,
            half_lines: 10,
            extent_factor: 1.2,
            color: colors::ACCENT.with_alpha(colors::GRID_ALPHA),
            line_width: 1.0,
        }
    }
}

/// All tunables of the particle field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Lower bound on the particle count, regardless of surface area
    pub min_count: usize,
    /// Surface area (px²) per particle
    pub density_divisor: u64,
    /// Velocity components are drawn from `[-max_speed, max_speed)` px/frame
    pub max_speed: f64,
    pub radius: Span,
    pub alpha: Span,
    /// Overscan past each edge before a particle wraps
    pub wrap_margin: f64,
    /// Pairs closer than this are connected
    pub link_distance: f64,
    /// Connection alpha at distance 0
    pub link_alpha: f64,
    pub link_width: f64,
    pub color: Rgba,
    pub glow_blur: f64,
    pub glow_color: Rgba,
    pub backdrop: Backdrop,
    pub grid: Option<GridConfig>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self::portfolio()
    }
}

impl FieldConfig {
    /// Sparse preset: 1 particle per 140 000 px², slow drift, vignette and grid
    pub fn portfolio() -> Self {
        Self {
            min_count: 60,
            density_divisor: 140_000,
            max_speed: 0.25,
            radius: Span::new(0.6, 2.2),
            alpha: Span::new(0.2, 0.9),
            wrap_margin: 10.0,
            link_distance: 140.0,
            link_alpha: colors::LINK_ALPHA,
            link_width: 1.0,
            color: colors::ACCENT,
            glow_blur: 8.0,
            glow_color: colors::GLOW,
            backdrop: Backdrop::RadialVignette,
            grid: Some(GridConfig::default()),
        }
    }

    /// Dense preset: 1 particle per 90 000 px², faster drift, linear wash, no grid
    pub fn dense() -> Self {
        Self {
            density_divisor: 90_000,
            max_speed: 0.5,
            radius: Span::new(0.8, 2.0),
            alpha: Span::new(0.3, 0.8),
            backdrop: Backdrop::LinearWash,
            grid: None,
            ..Self::portfolio()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Result<Self> {
        name.parse::<Preset>().map(Preset::config)
    }

    /// Parse and validate a JSON config; missing fields fall back to `portfolio`
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Particle count for a surface: `max(min_count, floor(area / density_divisor))`
    pub fn particle_count(&self, width: u32, height: u32) -> usize {
        let area = width as u64 * height as u64;
        let by_area = area / self.density_divisor.max(1);
        (by_area as usize).max(self.min_count)
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: impl Into<String>) -> Result<()> {
            Err(Error::InvalidConfig(msg.into()))
        }

        if self.density_divisor == 0 {
            return invalid("density_divisor must be positive");
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return invalid("max_speed must be a finite non-negative number");
        }
        if !(self.radius.min > 0.0 && self.radius.min <= self.radius.max) {
            return invalid("radius must satisfy 0 < min <= max");
        }
        if !(self.alpha.min > 0.0 && self.alpha.min <= self.alpha.max && self.alpha.max <= 1.0) {
            return invalid("alpha must satisfy 0 < min <= max <= 1");
        }
        if !(self.wrap_margin.is_finite() && self.wrap_margin >= 0.0) {
            return invalid("wrap_margin must be a finite non-negative number");
        }
        if !(self.link_distance.is_finite() && self.link_distance > 0.0) {
            return invalid("link_distance must be positive");
        }
        if !(0.0..=1.0).contains(&self.link_alpha) {
            return invalid("link_alpha must be within [0, 1]");
        }
        if let Some(grid) = &self.grid {
            if !grid.rotation_step.is_finite() {
                return invalid("grid.rotation_step must be finite");
            }
            if grid.half_lines == 0 {
                return invalid("grid.half_lines must be at least 1");
            }
        }
        Ok(())
    }
}

/// Named presets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Portfolio,
    Dense,
}

impl Preset {
    pub const ALL: &'static [Preset] = &[Preset::Portfolio, Preset::Dense];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Portfolio => "portfolio",
            Preset::Dense => "dense",
        }
    }

    pub fn config(self) -> FieldConfig {
        match self {
            Preset::Portfolio => FieldConfig::portfolio(),
            Preset::Dense => FieldConfig::dense(),
        }
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .iter()
            .copied()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for &preset in Preset::ALL {
            assert!(preset.config().validate().is_ok(), "{} should validate", preset.label());
        }
    }

    #[test]
    fn test_particle_count_floor_and_minimum() {
        let cfg = FieldConfig::portfolio();
        assert_eq!(cfg.particle_count(0, 0), 60);
        assert_eq!(cfg.particle_count(800, 600), 60);
        assert_eq!(cfg.particle_count(2000, 2000), 60);
        assert_eq!(FieldConfig::dense().particle_count(2000, 2000), 60);

        // area = divisor * 1000
        assert!(cfg.particle_count(140_000, 1000) >= 1000);
        assert!(FieldConfig::dense().particle_count(90_000, 1000) >= 1000);

        // Just over the minimum: 61 * 140_000 px²
        assert_eq!(cfg.particle_count(61 * 1400, 100), 61);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(FieldConfig::preset("Dense").unwrap(), FieldConfig::dense());
        assert_eq!(FieldConfig::preset(" portfolio ").unwrap(), FieldConfig::portfolio());
        assert!(matches!(FieldConfig::preset("sparkly"), Err(Error::UnknownPreset(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = FieldConfig::from_json(r#"{ "density_divisor": 90000, "grid": null }"#).unwrap();
        assert_eq!(cfg.density_divisor, 90_000);
        assert_eq!(cfg.grid, None);
        assert_eq!(cfg.min_count, 60);
        assert_eq!(cfg.link_distance, 140.0);
    }

    #[test]
    fn test_json_backdrop_and_grid() {
        let cfg = FieldConfig::from_json(
            r#"{ "backdrop": "linear_wash", "grid": { "rotation_step": 0.002 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.backdrop, Backdrop::LinearWash);
        let grid = cfg.grid.unwrap();
        assert_eq!(grid.rotation_step, 0.002);
        assert_eq!(grid.half_lines, 10);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(matches!(
            FieldConfig::from_json(r#"{ "density_divisor": 0 }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            FieldConfig::from_json(r#"{ "alpha": { "min": 0.5, "max": 1.5 } }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            FieldConfig::from_json(r#"{ "radius": { "min": 2.0, "max": 1.0 } }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(FieldConfig::from_json("not json"), Err(Error::Json(_))));
    }
}
