//! Bifröst Vigil library - guardian, echoes and relics on a frame-driven scene

pub mod audio;
pub mod camera;
pub mod cli;
pub mod clock;
pub mod color;
pub mod input;
pub mod params;
pub mod render;
pub mod runes;
pub mod scene;
