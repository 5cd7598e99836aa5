//! Headless CLI: runs the particle field at display cadence and logs stats
//!
//! Run with: cargo run --features cli --bin field-cli
//!
//! Environment:
//! - `TECH_FIELD_PRESET`  `portfolio` (default) or `dense`
//! - `TECH_FIELD_CONFIG`  path to a JSON config, overrides the preset
//! - `TECH_FIELD_SIZE`    surface size as `WIDTHxHEIGHT` (default 1920x1080)
//! - `TECH_FIELD_FPS`     frame rate (default 60)
//! - `TECH_FIELD_FRAMES`  frames to draw, 0 = until Ctrl-C (default 0)

use std::time::Instant;

use tech_field::core::{CountingSurface, FieldConfig, FrameLoop, ParticleField};
use tech_field::scheduler_native::{PacedDriver, DEFAULT_FPS};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_SIZE: (u32, u32) = (1920, 1080);
const STATS_EVERY_SECS: f64 = 5.0;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tech_field=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = load_config()?;
    let (width, height) = match std::env::var("TECH_FIELD_SIZE") {
        Ok(s) => parse_size(&s).ok_or_else(|| format!("TECH_FIELD_SIZE `{s}` is not WIDTHxHEIGHT"))?,
        Err(_) => DEFAULT_SIZE,
    };
    let fps = env_or("TECH_FIELD_FPS", DEFAULT_FPS);
    let max_frames = env_or("TECH_FIELD_FRAMES", 0u64);

    let driver = PacedDriver::new(fps);
    let field = ParticleField::new(config, width, height);
    let frame_loop = FrameLoop::new(field, CountingSurface::new(width, height), driver.scheduler());

    info!(width, height, fps, max_frames, "Starting headless field");
    frame_loop.start();

    let started = Instant::now();
    let mut last_stats = 0.0;
    let mut frames_since = 0u64;
    let on_frame = |frame: u64| {
        frames_since += 1;
        let elapsed = started.elapsed().as_secs_f64();
        if elapsed - last_stats < STATS_EVERY_SECS {
            return;
        }
        let report = frame_loop.last_report();
        let ops = frame_loop.with_surface(|s| s.take_counts());
        info!(
            frame,
            fps = format!("{:.1}", frame_loop.fps()),
            particles = report.particles,
            connections = report.connections,
            "ops/frame" = format!("{:.0}", ops.total() as f64 / frames_since.max(1) as f64),
            "stats"
        );
        last_stats = elapsed;
        frames_since = 0;
    };

    tokio::select! {
        fired = driver.run(max_frames, on_frame) => {
            info!(frames = fired, "Frame budget reached");
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Failed to listen for Ctrl-C");
            }
            info!("Interrupted");
        }
    }

    frame_loop.stop();
    info!(
        frames = frame_loop.frames(),
        secs = format!("{:.1}", started.elapsed().as_secs_f64()),
        "Done"
    );
    Ok(())
}

fn load_config() -> tech_field::Result<FieldConfig> {
    if let Ok(path) = std::env::var("TECH_FIELD_CONFIG") {
        info!(path = %path, "Loading field config");
        return FieldConfig::from_file(path);
    }
    let preset = std::env::var("TECH_FIELD_PRESET").unwrap_or_else(|_| "portfolio".to_string());
    info!(preset = %preset, "Using preset");
    FieldConfig::preset(&preset)
}

fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.trim().split_once(|c: char| c == 'x' || c == 'X')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

fn env_or<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(v) => v.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %v, "Unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("800x600"), Some((800, 600)));
        assert_eq!(parse_size(" 2000 X 2000 "), Some((2000, 2000)));
        assert_eq!(parse_size("800"), None);
        assert_eq!(parse_size("axb"), None);
    }
}
