//! Keyboard state
//!
//! Tracks which logical keys are held and which were released since the last
//! frame. Grab and mirror placement fire on release so holding a key does not
//! repeat the action.

use std::collections::HashSet;

use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Grab a painting or pick up a mirror
    Space,
    /// Place a mirror
    M,
    Escape,
}

impl Key {
    /// Map a physical key, if the game uses it
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::ArrowLeft => Some(Key::Left),
            KeyCode::ArrowRight => Some(Key::Right),
            KeyCode::ArrowUp => Some(Key::Up),
            KeyCode::ArrowDown => Some(Key::Down),
            KeyCode::Space => Some(Key::Space),
            KeyCode::KeyM => Some(Key::M),
            KeyCode::Escape => Some(Key::Escape),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.released.insert(key);
        }
    }

    /// Feed a raw keyboard event
    pub fn handle_key(&mut self, code: KeyCode, state: ElementState) {
        let Some(key) = Key::from_key_code(code) else {
            return;
        };
        match state {
            ElementState::Pressed => self.press(key),
            ElementState::Released => self.release(key),
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Released since the last `end_frame`
    pub fn was_released(&self, key: Key) -> bool {
        self.released.contains(&key)
    }

    /// Forget this frame's releases
    pub fn end_frame(&mut self) {
        self.released.clear();
    }

    /// Drop everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.held.clear();
        self.released.clear();
    }

    /// Snapshot for one simulation tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            rotate_left: self.is_held(Key::Left),
            rotate_right: self.is_held(Key::Right),
            forward: self.is_held(Key::Up),
            backward: self.is_held(Key::Down),
            grab: self.was_released(Key::Space),
            place_mirror: self.was_released(Key::M),
        }
    }
}
