//! Frame time sources.

use std::time::{Duration, Instant};

/// Supplies the simulation step once per frame
pub trait Clock {
    /// Seconds since the previous call
    fn delta_seconds(&mut self) -> f32;
}

/// Wall-clock frame timer, deltas capped at `max_step_s`
pub struct FrameClock {
    last: Instant,
    max_step_s: f32,
}

impl FrameClock {
    pub fn new(max_step_s: f32) -> Self {
        Self {
            last: Instant::now(),
            max_step_s,
        }
    }
}

impl Clock for FrameClock {
    fn delta_seconds(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt.min(self.max_step_s)
    }
}

/// Caps the windowed frame rate by spacing frames at least `min_frame` apart
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    min_frame: Duration,
    last_frame: Option<Instant>,
}

impl FramePacer {
    pub fn new(min_frame_s: f32) -> Self {
        Self {
            min_frame: Duration::from_secs_f32(min_frame_s.max(0.0)),
            last_frame: None,
        }
    }

    /// Earliest instant the next frame may start, `None` before the first frame
    pub fn next_due(&self) -> Option<Instant> {
        self.last_frame.map(|last| last + self.min_frame)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.next_due() {
            Some(due) => now >= due,
            None => true,
        }
    }

    /// Record that a frame started at `now`
    pub fn mark(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }
}

/// Constant step, for headless runs and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    step_s: f32,
}

impl FixedClock {
    pub fn new(step_s: f32) -> Self {
        Self {
            step_s: step_s.max(0.0),
        }
    }
}

impl Clock for FixedClock {
    fn delta_seconds(&mut self) -> f32 {
        self.step_s
    }
}
