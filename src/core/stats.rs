//! Rolling frame-rate counter fed with frame timestamps

use std::collections::VecDeque;

const WINDOW: usize = 60;

pub struct FpsCounter {
    /// Timestamps in milliseconds, oldest first
    frames: VecDeque<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::with_capacity(WINDOW + 1),
        }
    }

    pub fn tick(&mut self, timestamp_ms: f64) {
        self.frames.push_back(timestamp_ms);
        if self.frames.len() > WINDOW {
            self.frames.pop_front();
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.front(), self.frames.back()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.frames.len() < 2 || elapsed <= 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / (elapsed / 1000.0)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
