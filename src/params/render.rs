//! Window and surface configuration.

use crate::color::Rgba;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Window title
    pub title: String,

    /// Clear color behind the sky gradient (deep night blue)
    pub clear_color: Rgba,

    /// Segments used to tessellate a full circle
    pub circle_segments: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            title: "Bifröst Vigil".to_string(),
            clear_color: Rgba::rgb8(0x0d, 0x0d, 0x1a),
            circle_segments: 48,
        }
    }
}
