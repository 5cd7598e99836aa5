//! Platform-agnostic time utilities
//!
//! Elapsed time since app start, in seconds.

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Milliseconds since app start, the unit frame timestamps use
pub fn now_millis() -> f64 {
    now_seconds() * 1000.0
}
