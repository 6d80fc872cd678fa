//! Drawing: scene painter, CPU canvas and the wgpu surface presenting it.

mod canvas;
mod draw;
mod gpu;

pub use canvas::{Canvas, Stop, Vertex};
pub use draw::draw_scene;
pub use gpu::{RenderError, RenderSystem, Uniforms};
