//! Per-step input snapshot.
//!
//! The engine polls its input backend once per frame and hands gameplay an
//! immutable snapshot. Nothing here talks to hardware.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys gameplay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// Reload
    R,
    /// Chase camera
    Alpha1,
    /// Low camera
    Alpha2,
    /// High camera
    Alpha3,
}

/// Input state for one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Strafe axis, -1..1
    pub horizontal: f32,
    /// Forward axis, -1..1
    pub vertical: f32,
    /// Climb axis, -1..1
    pub elevation: f32,
    /// Mouse horizontal delta axis
    pub mouse_x: f32,
    /// Keys that went down this step
    pub keys_down: Vec<KeyCode>,
    /// Primary button went down this step
    pub fire_pressed: bool,
    /// Primary button is currently held
    pub pointer_held: bool,
    /// Pointer position, viewport-normalized with origin bottom-left
    pub pointer_viewport: Vec2,
}

impl InputSnapshot {
    /// Creates an idle snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the movement axes.
    #[must_use]
    pub fn with_axes(mut self, horizontal: f32, vertical: f32, elevation: f32) -> Self {
        self.horizontal = horizontal.clamp(-1.0, 1.0);
        self.vertical = vertical.clamp(-1.0, 1.0);
        self.elevation = elevation.clamp(-1.0, 1.0);
        self
    }

    /// Sets the mouse-X axis.
    #[must_use]
    pub fn with_mouse_x(mut self, mouse_x: f32) -> Self {
        self.mouse_x = mouse_x;
        self
    }

    /// Marks a key as pressed this step.
    #[must_use]
    pub fn with_key(mut self, key: KeyCode) -> Self {
        self.keys_down.push(key);
        self
    }

    /// Marks the primary button as pressed (and held) this step.
    #[must_use]
    pub fn with_fire(mut self) -> Self {
        self.fire_pressed = true;
        self.pointer_held = true;
        self
    }

    /// Sets the pointer position.
    #[must_use]
    pub fn with_pointer(mut self, viewport: Vec2) -> Self {
        self.pointer_viewport = viewport;
        self
    }

    /// Whether `key` went down this step.
    #[must_use]
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_clamped() {
        let input = InputSnapshot::new().with_axes(3.0, -2.0, 0.5);
        assert_eq!(input.horizontal, 1.0);
        assert_eq!(input.vertical, -1.0);
        assert_eq!(input.elevation, 0.5);
    }

    #[test]
    fn test_key_down() {
        let input = InputSnapshot::new().with_key(KeyCode::R);
        assert!(input.key_down(KeyCode::R));
        assert!(!input.key_down(KeyCode::Alpha1));
    }
}
