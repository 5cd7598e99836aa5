//! Browser entry points exported to JavaScript
//!
//! ```js
//! import init, { start_background } from "./tech_field.js";
//! await init();
//! const bg = start_background("tech-bg", "portfolio");
//! // on page-content replacement:
//! bg.stop();
//! ```

use std::cell::Cell;
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::canvas_wasm::CanvasSurface;
use crate::core::{FieldConfig, FrameLoop, ParticleField, Surface};
use crate::error::{js_error, Error, Result};
use crate::scheduler_wasm::RafScheduler;
use crate::time::now_seconds;

type CanvasLoop = FrameLoop<CanvasSurface, RafScheduler>;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    // Initialize tracing for browser console
    tracing_wasm::set_as_global_default();
}

/// Running background; stops itself when freed from JS.
#[wasm_bindgen]
pub struct TechBackground {
    frame_loop: Rc<CanvasLoop>,
    window: Window,
    on_resize: Closure<dyn FnMut()>,
    detached: Cell<bool>,
    started_at: f64,
}

#[wasm_bindgen]
impl TechBackground {
    /// Stop drawing and detach the resize listener
    pub fn stop(&self) {
        self.frame_loop.stop();
        if self.detached.replace(true) {
            return;
        }
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())
        {
            warn!(error = ?e, "Failed to remove resize listener");
        }
        info!(uptime_s = now_seconds() - self.started_at, "Background stopped");
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.frame_loop.state().is_running()
    }

    pub fn fps(&self) -> f64 {
        self.frame_loop.fps()
    }

    pub fn frames(&self) -> f64 {
        self.frame_loop.frames() as f64
    }

    pub fn particle_count(&self) -> usize {
        self.frame_loop.particle_count()
    }
}

impl Drop for TechBackground {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start the background on `<canvas id=canvas_id>` with a named preset
/// (`portfolio` when omitted).
#[wasm_bindgen]
pub fn start_background(canvas_id: &str, preset: Option<String>) -> std::result::Result<TechBackground, JsValue> {
    let config = match preset.as_deref() {
        Some(name) => FieldConfig::preset(name)?,
        None => FieldConfig::portfolio(),
    };
    Ok(launch(canvas_id, config)?)
}

/// Start the background with a JSON [`FieldConfig`]
#[wasm_bindgen]
pub fn start_background_with_config(
    canvas_id: &str,
    config_json: &str,
) -> std::result::Result<TechBackground, JsValue> {
    let config = FieldConfig::from_json(config_json)?;
    Ok(launch(canvas_id, config)?)
}

fn launch(canvas_id: &str, config: FieldConfig) -> Result<TechBackground> {
    config.validate()?;
    let window = web_sys::window().ok_or_else(|| Error::Host("no window".into()))?;

    let mut surface = CanvasSurface::from_element_id(canvas_id)?;
    let (width, height) = viewport_size(&window)?;
    surface.set_size(width, height);

    let field = ParticleField::new(config, width, height);
    let frame_loop = Rc::new(FrameLoop::new(field, surface, RafScheduler::new(window.clone())));

    let weak = Rc::downgrade(&frame_loop);
    let resize_window = window.clone();
    let on_resize = Closure::wrap(Box::new(move || {
        let Some(frame_loop) = weak.upgrade() else {
            return;
        };
        match viewport_size(&resize_window) {
            Ok((w, h)) => frame_loop.resize(w, h),
            Err(e) => warn!(error = %e, "Ignoring resize"),
        }
    }) as Box<dyn FnMut()>);
    window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(|e| js_error("addEventListener", e))?;

    frame_loop.start();
    info!(canvas_id, width, height, "Background started");

    Ok(TechBackground {
        frame_loop,
        window,
        on_resize,
        detached: Cell::new(false),
        started_at: now_seconds(),
    })
}

/// `innerWidth × innerHeight` in CSS pixels
fn viewport_size(window: &Window) -> Result<(u32, u32)> {
    let dim = |v: std::result::Result<JsValue, JsValue>, name: &str| -> Result<u32> {
        v.map_err(|e| js_error(name, e))?
            .as_f64()
            .map(|px| px.max(0.0) as u32)
            .ok_or_else(|| Error::Host(format!("{name} is not a number")))
    };
    Ok((dim(window.inner_width(), "innerWidth")?, dim(window.inner_height(), "innerHeight")?))
}
