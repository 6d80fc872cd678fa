//! Bifröst Vigil - Heimdall keeps watch over the rainbow bridge
//!
//! Echo rings ripple out from the guardian, runes drift and fade, spectral
//! travelers cross the bridge, and every horn blast leaves a relic behind.

use clap::Parser;
use glam::Vec2;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use bifrost_vigil::audio::{AudioEngine, AudioSystem, SilentAudio};
use bifrost_vigil::cli::Args;
use bifrost_vigil::input::InputState;
use bifrost_vigil::params::{CameraParams, FftConfig, GuardianParams, RenderConfig};
use bifrost_vigil::render::{draw_scene, Canvas, RenderSystem};
use bifrost_vigil::scene::{Command, Scene};

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,
    canvas: Canvas,

    // Simulation
    scene: Scene,
    input: InputState,
    audio: Box<dyn AudioEngine>,

    // Configuration
    render_config: RenderConfig,
}

impl App {
    fn new(args: &Args) -> Self {
        let render_config = args.render_config();
        let viewport = Vec2::new(
            render_config.window_width as f32,
            render_config.window_height as f32,
        );

        let mut scene = Scene::new(
            args.scene_params(),
            CameraParams::default(),
            GuardianParams::default(),
            viewport,
            args.rng(),
            Instant::now(),
        );
        if args.birds_eye {
            scene.camera.toggle_birds_eye();
        }

        // Visuals never depend on sound
        let audio: Box<dyn AudioEngine> =
            match AudioSystem::new(args.audio_config(), FftConfig::default()) {
                Ok(system) => Box::new(system),
                Err(e) => {
                    log::warn!("Audio unavailable, continuing silently: {}", e);
                    Box::new(SilentAudio)
                }
            };

        Self {
            window: None,
            render_system: None,
            canvas: Canvas::new(viewport, render_config.circle_segments),
            scene,
            input: InputState::new(),
            audio,
            render_config,
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title(self.render_config.title.as_str())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Initialize rendering system
        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.render_config,
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = render_system.size();
        self.resize(width, height);

        log::info!("Bifröst Vigil is running ({}x{})", width, height);
        log::info!("Arrows/WASD move, click to target, Space sounds the horn, Esc quits");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        repeat,
                        ..
                    },
                ..
            } => {
                self.input.on_key(key, state == ElementState::Pressed, repeat);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .on_cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.input.on_click(),
            WindowEvent::Focused(false) => self.input.release_all(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let viewport = Vec2::new(width as f32, height as f32);
        self.scene.camera.set_viewport(viewport);
        self.canvas.resize(viewport);
        if let Some(render_system) = self.render_system.as_mut() {
            render_system.resize(width, height);
        }
    }

    /// Advance the scene and render a single frame
    fn render_frame(&mut self) {
        let commands: Vec<Command> = self.input.drain();
        let frame = self
            .scene
            .frame(Instant::now(), commands, self.audio.as_ref());

        // Paused: nothing is drawn
        if frame.is_none() {
            return;
        }

        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        draw_scene(&mut self.canvas, &self.scene);

        match render_system.render(&self.canvas) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_system.reconfigure();
            }
            Err(e) => log::warn!("Dropped frame: {:?}", e),
        }
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    log::info!("Bifröst Vigil - initializing systems");

    let mut app = App::new(&args);
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return;
        }
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
