//! Camera easing and guardian motion parameters.

use glam::Vec2;

/// Camera easing gains and parallax factors
#[derive(Debug, Clone)]
pub struct CameraParams {
    /// Fraction of the remaining zoom distance covered per tick
    pub zoom_gain: f32,

    /// Fraction of the remaining distance to the guardian covered per tick
    pub follow_gain: f32,

    /// Zoom used in normal view
    pub normal_zoom: f32,

    /// Zoom used in birds-eye view (wide shot of the whole scene)
    pub birds_eye_zoom: f32,

    /// Parallax factor for the background star field
    pub star_parallax: f32,

    /// Parallax factor for constellations
    pub constellation_parallax: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            zoom_gain: 0.05,
            follow_gain: 0.03,
            normal_zoom: 1.0,
            birds_eye_zoom: 0.35,
            star_parallax: 0.3,
            constellation_parallax: 0.7,
        }
    }
}

/// Guardian movement parameters (target-seeking damped motion)
#[derive(Debug, Clone)]
pub struct GuardianParams {
    /// Spawn / reset position (world units)
    pub home: Vec2,

    /// Body size (world units), used by the renderer
    pub size: f32,

    /// Acceleration added along the target direction per tick
    pub acceleration: f32,

    /// Multiplicative velocity damping applied every tick
    pub damping: f32,

    /// Distance below which the target counts as reached
    pub arrive_threshold: f32,

    /// Target displacement per tick of held movement input
    pub move_step: f32,

    /// Lower-left corner of the movement rectangle
    pub bounds_min: Vec2,

    /// Upper-right corner of the movement rectangle
    pub bounds_max: Vec2,
}

impl Default for GuardianParams {
    fn default() -> Self {
        Self {
            home: Vec2::new(-150.0, 0.0),
            size: 50.0,
            acceleration: 0.08,
            damping: 0.88,
            arrive_threshold: 2.0,
            move_step: 4.0,
            // Keeps the guardian near the bridge
            bounds_min: Vec2::new(-250.0, -150.0),
            bounds_max: Vec2::new(50.0, 150.0),
        }
    }
}

impl GuardianParams {
    /// Clamp a point into the movement rectangle
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.bounds_min, self.bounds_max)
    }
}
