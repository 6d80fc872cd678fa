//! Keyboard and pointer state turned into scene commands once per frame.

use glam::Vec2;
use std::collections::HashSet;
use winit::keyboard::KeyCode;

use crate::scene::Command;

/// Intensity change per key press
pub const INTENSITY_STEP: f32 = 0.1;

/// Volume change per key press
pub const VOLUME_STEP: f32 = 0.1;

/// Movement direction of a held key (screen axes, y down)
pub fn direction_for_key(key: KeyCode) -> Option<Vec2> {
    match key {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(Vec2::NEG_Y),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(Vec2::Y),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(Vec2::NEG_X),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(Vec2::X),
        _ => None,
    }
}

/// One-shot command bound to a key press
pub fn command_for_key(key: KeyCode) -> Option<Command> {
    let command = match key {
        KeyCode::Space => Command::TriggerBurst,
        KeyCode::KeyV => Command::ToggleBirdsEye,
        KeyCode::KeyP => Command::TogglePause,
        KeyCode::KeyR => Command::Reset,
        KeyCode::Digit1 => Command::SelectMode(0),
        KeyCode::Digit2 => Command::SelectMode(1),
        KeyCode::Digit3 => Command::SelectMode(2),
        KeyCode::Digit4 => Command::SelectMode(3),
        KeyCode::KeyQ => Command::CycleMode(-1),
        KeyCode::KeyE => Command::CycleMode(1),
        KeyCode::Comma => Command::AdjustIntensity(-INTENSITY_STEP),
        KeyCode::Period => Command::AdjustIntensity(INTENSITY_STEP),
        KeyCode::Minus => Command::AdjustVolume(-VOLUME_STEP),
        KeyCode::Equal => Command::AdjustVolume(VOLUME_STEP),
        KeyCode::KeyM => Command::ToggleMute,
        _ => return None,
    };
    Some(command)
}

/// Input collected between frames
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    cursor: Vec2,
    pending: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition; auto-repeat never re-fires one-shot commands
    pub fn on_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) {
        if direction_for_key(key).is_some() {
            if pressed {
                self.held.insert(key);
            } else {
                self.held.remove(&key);
            }
            return;
        }

        if pressed && !repeat {
            if let Some(command) = command_for_key(key) {
                self.pending.push(command);
            }
        }
    }

    pub fn on_cursor_moved(&mut self, position: Vec2) {
        self.cursor = position;
    }

    /// Primary click at the last known cursor position
    pub fn on_click(&mut self) {
        self.pending.push(Command::Click(self.cursor));
    }

    /// Forget held keys (e.g. when the window loses focus)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Commands for this frame, in arrival order, followed by held movement
    pub fn drain(&mut self) -> Vec<Command> {
        let mut commands = std::mem::take(&mut self.pending);

        let direction: Vec2 = self.held.iter().filter_map(|k| direction_for_key(*k)).sum();
        if direction != Vec2::ZERO {
            commands.push(Command::MoveIntent(direction));
        }
        commands
    }
}
