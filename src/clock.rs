//! Frame clock: accumulates scene time while running, freezes it while paused.

use std::time::{Duration, Instant};

/// Clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Paused,
}

/// Timing of one running tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Scene time in milliseconds (monotonic, frozen while paused)
    pub scene_ms: f64,

    /// Wall time since the previous running tick (milliseconds)
    pub delta_ms: f64,
}

/// Monotonic scene clock driven once per display frame
#[derive(Debug, Clone)]
pub struct Clock {
    state: ClockState,
    last_tick: Instant,
    scene: Duration,
}

impl Clock {
    /// Start a running clock with zero scene time
    pub fn new(now: Instant) -> Self {
        Self {
            state: ClockState::Running,
            last_tick: now,
            scene: Duration::ZERO,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == ClockState::Paused
    }

    /// Current scene time (milliseconds)
    pub fn scene_ms(&self) -> f64 {
        duration_ms(self.scene)
    }

    pub fn pause(&mut self) {
        self.state = ClockState::Paused;
    }

    /// Resume from `now`; the paused interval never reaches scene time
    pub fn resume(&mut self, now: Instant) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
            self.last_tick = now;
        }
    }

    pub fn toggle(&mut self, now: Instant) {
        match self.state {
            ClockState::Running => self.pause(),
            ClockState::Paused => self.resume(now),
        }
    }

    /// Advance by the wall time since the previous tick.
    ///
    /// Returns `None` while paused: callers skip update and draw entirely.
    pub fn tick(&mut self, now: Instant) -> Option<FrameTime> {
        if self.state == ClockState::Paused {
            return None;
        }

        let delta = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.scene += delta;

        Some(FrameTime {
            scene_ms: duration_ms(self.scene),
            delta_ms: duration_ms(delta),
        })
    }
}

/// Whole-millisecond durations convert exactly
fn duration_ms(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}
