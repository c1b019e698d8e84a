//! Screen-space geometry shared by gameplay and the overlay.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pixel dimensions of a viewport or render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// Creates a new resolution.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a 720p resolution.
    #[must_use]
    pub const fn hd720() -> Self {
        Self::new(1280, 720)
    }

    /// Whether either dimension is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Full-viewport rectangle anchored at the origin.
    #[must_use]
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    /// Converts a viewport-normalized point (origin bottom-left, 0..1)
    /// into top-down pixel coordinates.
    #[must_use]
    pub fn viewport_to_screen(self, normalized: Vec2) -> Vec2 {
        Vec2::new(
            normalized.x * self.width as f32,
            (1.0 - normalized.y) * self.height as f32,
        )
    }
}

/// Axis-aligned rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width (negative when flipped)
    pub width: f32,
    /// Height (negative when flipped)
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same area with the vertical axis inverted, for backends whose
    /// texture origin is at the bottom.
    #[must_use]
    pub fn flipped_y(self) -> Self {
        Self::new(self.x, self.y + self.height, self.width, -self.height)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Size as a vector.
    #[must_use]
    pub const fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Checks if a point is inside the rectangle.
    #[must_use]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}
