//! Native frame driver
//!
//! Fires a [`ManualScheduler`] from a tokio interval, standing in for the
//! display refresh. Missed ticks are skipped rather than bunched, the same way
//! a browser drops animation frames under load.

use std::rc::Rc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::core::scheduler::ManualScheduler;
use crate::time::now_millis;

pub const DEFAULT_FPS: f64 = 60.0;

pub struct PacedDriver {
    scheduler: Rc<ManualScheduler>,
    period: Duration,
}

impl PacedDriver {
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            warn!(fps, fallback = DEFAULT_FPS, "Invalid frame rate");
            DEFAULT_FPS
        };
        Self {
            scheduler: Rc::new(ManualScheduler::new()),
            period: Duration::from_secs_f64(1.0 / fps),
        }
    }

    /// Scheduler to hand to the [`FrameLoop`](crate::core::FrameLoop)
    pub fn scheduler(&self) -> Rc<ManualScheduler> {
        self.scheduler.clone()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Fire one frame per period until `max_frames` have run (0 = no limit)
    /// or nothing is pending any more. `on_frame` gets the running frame
    /// count after each frame. Returns the number of frames fired.
    pub async fn run(&self, max_frames: u64, mut on_frame: impl FnMut(u64)) -> u64 {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut fired = 0u64;
        loop {
            interval.tick().await;
            if self.scheduler.fire(now_millis()) == 0 {
                debug!(fired, "No frame pending, driver exiting");
                break;
            }
            fired += 1;
            on_frame(fired);
            if max_frames != 0 && fired >= max_frames {
                break;
            }
        }
        fired
    }
}
