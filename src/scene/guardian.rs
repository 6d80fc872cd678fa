//! The guardian: target-seeking damped motion inside a movement rectangle.

use glam::Vec2;

use crate::params::GuardianParams;

#[derive(Debug, Clone)]
pub struct Guardian {
    pub params: GuardianParams,
    pub position: Vec2,
    pub target: Vec2,
    pub velocity: Vec2,

    /// Glow pulse in 0.6..=1.0
    pub glow: f32,
}

impl Guardian {
    /// Guardian at rest on its home position
    pub fn new(params: GuardianParams) -> Self {
        let home = params.clamp(params.home);
        Self {
            params,
            position: home,
            target: home,
            velocity: Vec2::ZERO,
            glow: 1.0,
        }
    }

    /// Seek the target, damp, integrate, then clamp into the rectangle
    pub fn update(&mut self, now_ms: f64) {
        let to_target = self.target - self.position;
        if to_target.length() > self.params.arrive_threshold {
            self.velocity += to_target.normalize() * self.params.acceleration;
        }
        self.velocity *= self.params.damping;
        self.position = self.params.clamp(self.position + self.velocity);

        self.glow = ((now_ms * 0.002) as f32).sin() * 0.2 + 0.8;
    }

    /// Point the guardian at `target`, clamped into the movement rectangle
    pub fn set_target_clamped(&mut self, target: Vec2) {
        self.target = self.params.clamp(target);
    }

    /// Shift the target along `direction` by one movement step.
    ///
    /// The target itself is left unclamped; only the position is bounded.
    pub fn nudge_target(&mut self, direction: Vec2) {
        self.target += direction * self.params.move_step;
    }

    /// Back to home, at rest
    pub fn reset(&mut self) {
        let home = self.params.clamp(self.params.home);
        self.position = home;
        self.target = home;
        self.velocity = Vec2::ZERO;
    }
}
