//! Client input sampling with edge detection for view toggles

use macroquad::prelude::*;
use shared::{Point, PlayerInput};

/// Raw device state for one frame, before it becomes a [`PlayerInput`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub fire: bool,
    pub toggle_rays: bool,
    pub toggle_hitboxes: bool,
    pub mouse: (f32, f32),
}

impl RawInput {
    /// Reads the keyboard and mouse. Requires a live macroquad context.
    pub fn sample() -> Self {
        Self {
            up: is_key_down(KeyCode::W) || is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::S) || is_key_down(KeyCode::Down),
            left: is_key_down(KeyCode::A) || is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::D) || is_key_down(KeyCode::Right),
            sprint: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
            fire: is_mouse_button_down(MouseButton::Left),
            toggle_rays: is_key_down(KeyCode::R),
            toggle_hitboxes: is_key_down(KeyCode::H),
            mouse: mouse_position(),
        }
    }
}

/// View toggles pressed this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toggles {
    pub rays: bool,
    pub hitboxes: bool,
}

/// Turns raw device state into gameplay input, tracking the previous
/// frame's toggle keys so a held key only fires once.
#[derive(Debug, Default)]
pub struct InputManager {
    prev_key_r: bool,
    prev_key_h: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, raw: RawInput) -> (Toggles, PlayerInput) {
        let toggles = Toggles {
            rays: raw.toggle_rays && !self.prev_key_r,
            hitboxes: raw.toggle_hitboxes && !self.prev_key_h,
        };
        self.prev_key_r = raw.toggle_rays;
        self.prev_key_h = raw.toggle_hitboxes;

        let input = PlayerInput {
            up: raw.up,
            down: raw.down,
            left: raw.left,
            right: raw.right,
            sprint: raw.sprint,
            fire: raw.fire,
            aim: Point::new(raw.mouse.0 as f64, raw.mouse.1 as f64),
        };

        (toggles, input)
    }

    /// Samples the devices and converts in one step.
    pub fn sample(&mut self) -> (Toggles, PlayerInput) {
        self.update(RawInput::sample())
    }
}
