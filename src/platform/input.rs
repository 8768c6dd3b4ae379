//! Keyboard + gamepad merge
//!
//! Raw events are fed in by the host (DOM listeners, or a script in headless
//! runs). Once per frame [`InputHandler::update`] folds everything into an
//! immutable [`InputSnapshot`].

use std::collections::HashSet;

/// Analog stick dead zone
pub const GAMEPAD_THRESHOLD: f32 = 0.2;
/// Characters kept for cheat detection
const CHEAT_BUFFER_LEN: usize = 10;
const CHEAT_GOD: &str = "god";

// Standard gamepad mapping
const BUTTON_A: usize = 0;
const BUTTON_X: usize = 2;
const BUTTON_START: usize = 9;
const DPAD_UP: usize = 12;
const DPAD_DOWN: usize = 13;
const DPAD_LEFT: usize = 14;
const DPAD_RIGHT: usize = 15;

/// Polled gamepad state for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadState {
    pub axes: Vec<f32>,
    pub buttons: Vec<bool>,
}

impl GamepadState {
    fn button(&self, index: usize) -> bool {
        self.buttons.get(index).copied().unwrap_or(false)
    }

    fn axis(&self, index: usize) -> f32 {
        self.axes.get(index).copied().unwrap_or(0.0)
    }

    /// Any button pressed or any stick past the dead zone
    pub fn is_active(&self) -> bool {
        self.buttons.iter().any(|&b| b) || self.axes.iter().any(|a| a.abs() > GAMEPAD_THRESHOLD)
    }
}

/// Logical input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// True only on the frame the pause control goes down
    pub pause: bool,
    pub fast_forward: bool,
    /// Any key held or any gamepad activity
    pub any_key: bool,
    /// The god-mode sequence was typed since the last update
    pub cheat_toggled: bool,
    pub gamepad_active: bool,
}

/// Accumulates raw events between frames
#[derive(Debug, Default)]
pub struct InputHandler {
    keys: HashSet<String>,
    gamepad: Option<GamepadState>,
    key_buffer: String,
    cheat_pending: bool,
    pause_was_down: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(key: &str) -> String {
        if key == " " {
            "Space".to_string()
        } else {
            key.to_string()
        }
    }

    /// Handle a key press (DOM `KeyboardEvent.key` naming)
    pub fn key_down(&mut self, key: &str) {
        self.keys.insert(Self::normalize(key));

        // Single printable characters feed the cheat buffer
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            self.key_buffer.extend(c.to_lowercase());
            let excess = self.key_buffer.chars().count().saturating_sub(CHEAT_BUFFER_LEN);
            if excess > 0 {
                self.key_buffer = self.key_buffer.chars().skip(excess).collect();
            }
            if self.key_buffer.ends_with(CHEAT_GOD) {
                self.cheat_pending = true;
                self.key_buffer.clear();
            }
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.remove(&Self::normalize(key));
    }

    /// Drop all held keys (window blur)
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Latest gamepad poll, `None` when disconnected
    pub fn set_gamepad(&mut self, gamepad: Option<GamepadState>) {
        self.gamepad = gamepad;
    }

    /// Whether the host should suppress the browser default for this key
    pub fn captures(key: &str) -> bool {
        matches!(key, "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | " ")
    }

    fn held(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Merge all sources into this frame's snapshot
    pub fn update(&mut self) -> InputSnapshot {
        let pad = self.gamepad.as_ref();
        let pad_axis = |i: usize| pad.map(|p| p.axis(i)).unwrap_or(0.0);
        let pad_button = |i: usize| pad.map(|p| p.button(i)).unwrap_or(false);

        let gp_left = pad_axis(0) < -GAMEPAD_THRESHOLD || pad_button(DPAD_LEFT);
        let gp_right = pad_axis(0) > GAMEPAD_THRESHOLD || pad_button(DPAD_RIGHT);
        let gp_up = pad_axis(1) < -GAMEPAD_THRESHOLD || pad_button(DPAD_UP);
        let gp_down = pad_axis(1) > GAMEPAD_THRESHOLD || pad_button(DPAD_DOWN);
        let gp_fire = pad_button(BUTTON_A) || pad_button(BUTTON_X);
        let gp_pause = pad_button(BUTTON_START);
        let gamepad_active = pad.is_some_and(GamepadState::is_active);

        let pause_down = self.held("p") || self.held("P") || gp_pause;
        let pause = pause_down && !self.pause_was_down;
        self.pause_was_down = pause_down;

        let cheat_toggled = std::mem::take(&mut self.cheat_pending);

        InputSnapshot {
            left: self.held("ArrowLeft") || self.held("a") || gp_left,
            right: self.held("ArrowRight") || self.held("d") || gp_right,
            up: self.held("ArrowUp") || self.held("w") || gp_up,
            down: self.held("ArrowDown") || self.held("s") || gp_down,
            fire: self.held("Space") || gp_fire,
            pause,
            fast_forward: self.held("f") || self.held("F"),
            any_key: !self.keys.is_empty() || gamepad_active,
            cheat_toggled,
            gamepad_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_and_gamepad_merge() {
        let mut input = InputHandler::new();
        input.key_down("a");
        input.set_gamepad(Some(GamepadState {
            axes: vec![0.0, -0.9],
            buttons: vec![false; 16],
        }));
        let snap = input.update();
        assert!(snap.left);
        assert!(snap.up);
        assert!(!snap.right);
        assert!(snap.any_key);
        assert!(snap.gamepad_active);
    }

    #[test]
    fn test_space_maps_to_fire() {
        let mut input = InputHandler::new();
        input.key_down(" ");
        assert!(input.update().fire);
        input.key_up(" ");
        assert!(!input.update().fire);
    }

    #[test]
    fn test_pause_is_edge_triggered() {
        let mut input = InputHandler::new();
        input.key_down("p");
        assert!(input.update().pause);
        assert!(!input.update().pause);
        input.key_up("p");
        assert!(!input.update().pause);
        input.key_down("P");
        assert!(input.update().pause);
    }

    #[test]
    fn test_cheat_sequence_fires_once() {
        let mut input = InputHandler::new();
        for k in ["x", "G", "o", "d"] {
            input.key_down(k);
            input.key_up(k);
        }
        assert!(input.update().cheat_toggled);
        assert!(!input.update().cheat_toggled);
    }

    #[test]
    fn test_named_keys_do_not_feed_cheat_buffer() {
        let mut input = InputHandler::new();
        input.key_down("g");
        input.key_down("ArrowLeft");
        input.key_down("o");
        input.key_down("d");
        // "ArrowLeft" is ignored so "god" still completes
        assert!(input.update().cheat_toggled);
    }

    #[test]
    fn test_gamepad_dead_zone() {
        let pad = GamepadState {
            axes: vec![0.1, -0.15],
            buttons: vec![false; 16],
        };
        assert!(!pad.is_active());
        let mut input = InputHandler::new();
        input.set_gamepad(Some(pad));
        let snap = input.update();
        assert!(!snap.left && !snap.up && !snap.any_key);
    }
}
