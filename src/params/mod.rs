//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers of the scene live here:
//! - Per-tick rates are expressed per display frame (the scene is frame-driven)
//! - Intervals and ages are in scene milliseconds
//! - Positions and sizes are in world units (1 unit = 1 pixel at zoom 1.0)

mod audio;
mod camera;
mod render;
mod scene;

pub use audio::{audio_constants, AudioConfig, FftConfig};
pub use camera::{CameraParams, GuardianParams};
pub use render::RenderConfig;
pub use scene::{
    BackdropParams, BurstParams, EchoMode, EchoParams, ParticleParams, RelicParams, RuneParams,
    SceneParams, TravelerParams,
};
