//! Platform-agnostic core - shared by the browser, egui and CLI hosts

pub mod config;
pub mod field;
pub mod frame_loop;
pub mod particle;
pub mod scheduler;
pub mod stats;
pub mod surface;

pub use config::{Backdrop, FieldConfig, GridConfig, Preset, Span};
pub use field::{connection_alpha, FrameReport, ParticleField};
pub use frame_loop::FrameLoop;
pub use particle::Particle;
pub use scheduler::{FrameCallback, FrameId, FrameScheduler, ManualScheduler};
pub use stats::FpsCounter;
pub use surface::{
    ColorStop, CountingSurface, DrawOp, Glow, Gradient, OpCounts, Point, RecordingSurface, Rgba,
    Surface,
};
