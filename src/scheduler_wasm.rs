//! `requestAnimationFrame` scheduler

use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::core::scheduler::{FrameCallback, FrameId, FrameScheduler};
use crate::error::{js_error, Result};

pub struct RafScheduler {
    window: Window,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameId> {
        // Freed by wasm-bindgen after its single invocation. A cancelled one
        // stays allocated, but it only owns a weak loop reference.
        let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        self.window
            .request_animation_frame(closure.unchecked_ref())
            .map(FrameId)
            .map_err(|e| js_error("requestAnimationFrame", e))
    }

    fn cancel_frame(&self, id: FrameId) {
        if let Err(e) = self.window.cancel_animation_frame(id.0) {
            warn!(?id, error = ?e, "cancelAnimationFrame failed");
        }
    }
}
