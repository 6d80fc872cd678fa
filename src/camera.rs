//! Eased 2D camera with per-layer parallax projection.

use glam::{Affine2, Vec2};

use crate::params::CameraParams;

/// Render layer, selecting the parallax factor of the projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Background star field (moves least)
    Stars,
    /// Constellations
    Constellations,
    /// Everything in the foreground (bridge, guardian, rings, ...)
    World,
}

/// Camera system following the guardian with exponential smoothing
#[derive(Debug, Clone)]
pub struct CameraSystem {
    pub params: CameraParams,
    pub position: Vec2,
    pub zoom: f32,
    pub target_zoom: f32,
    birds_eye: bool,
    viewport: Vec2,
}

impl CameraSystem {
    /// Create a camera at the origin for a viewport of `viewport` pixels
    pub fn new(params: CameraParams, viewport: Vec2) -> Self {
        let zoom = params.normal_zoom;
        Self {
            params,
            position: Vec2::ZERO,
            zoom,
            target_zoom: zoom,
            birds_eye: false,
            viewport,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    pub fn is_birds_eye(&self) -> bool {
        self.birds_eye
    }

    /// Switch between the normal and the wide birds-eye zoom target
    pub fn toggle_birds_eye(&mut self) {
        self.birds_eye = !self.birds_eye;
        self.target_zoom = if self.birds_eye {
            self.params.birds_eye_zoom
        } else {
            self.params.normal_zoom
        };
    }

    /// Ease zoom toward its target (first step of every running tick)
    pub fn update_zoom(&mut self) {
        self.zoom += (self.target_zoom - self.zoom) * self.params.zoom_gain;
    }

    /// Ease position toward `focus` (the guardian)
    pub fn follow(&mut self, focus: Vec2) {
        self.position += (focus - self.position) * self.params.follow_gain;
    }

    /// Jump back to the origin (explicit reset only)
    pub fn recenter(&mut self) {
        self.position = Vec2::ZERO;
    }

    /// Parallax factor of a layer
    pub fn parallax(&self, layer: Layer) -> f32 {
        match layer {
            Layer::Stars => self.params.star_parallax,
            Layer::Constellations => self.params.constellation_parallax,
            Layer::World => 1.0,
        }
    }

    /// Project a world point to screen pixels
    ///
    /// `screen = viewport_center + (world - camera * parallax) * zoom`
    pub fn world_to_screen(&self, world: Vec2, layer: Layer) -> Vec2 {
        self.viewport * 0.5 + (world - self.position * self.parallax(layer)) * self.zoom
    }

    /// Inverse projection on the foreground layer (used for pointer clicks)
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.viewport * 0.5) / self.zoom + self.position
    }

    /// Transform mapping local coordinates of an object at `origin` (rotated by
    /// `angle`) to screen pixels on `layer`
    pub fn object_transform(&self, layer: Layer, origin: Vec2, angle: f32) -> Affine2 {
        let screen_origin = self.world_to_screen(origin, layer);
        Affine2::from_scale_angle_translation(Vec2::splat(self.zoom), angle, screen_origin)
    }
}
