//! Tech Field - animated particle-network background
//!
//! Draws drifting points joined by faint lines when close, over a vignette
//! and a slowly rotating wire grid. The renderer is host-agnostic:
//! - browser: `<canvas>` 2D context + `requestAnimationFrame` (`wasm` feature)
//! - egui: paints into a `Painter` (`egui` feature)
//! - native: headless, paced by tokio (`cli` feature, `field-cli` binary)

pub mod core;
pub mod error;
pub mod loop_state;
pub mod theme;
pub mod time;

#[cfg(feature = "egui")]
pub mod egui_surface;

#[cfg(feature = "cli")]
pub mod scheduler_native;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod background_wasm;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod canvas_wasm;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod scheduler_wasm;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub use background_wasm::{start_background, start_background_with_config, TechBackground};

pub use crate::core::{FieldConfig, FrameLoop, ParticleField, Preset, Surface};
pub use error::{Error, Result};
pub use loop_state::LoopState;
