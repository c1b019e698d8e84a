//! Fit and alignment of an artboard inside a frame, and the inverse mapping
//! from screen pixels to artboard-local coordinates.

use drone_common::Rect;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How artboard content is scaled into its frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fit {
    /// Stretch to fill, ignoring aspect ratio
    Fill,
    /// Largest uniform scale that fits entirely
    Contain,
    /// Smallest uniform scale that covers the frame
    Cover,
    /// Match frame width
    FitWidth,
    /// Match frame height
    FitHeight,
    /// Native size
    #[default]
    None,
    /// Like `Contain`, but never upscales
    ScaleDown,
}

/// Anchor of the content within its frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    /// Top-left corner
    #[default]
    TopLeft,
    /// Top edge, centered
    TopCenter,
    /// Top-right corner
    TopRight,
    /// Left edge, centered
    CenterLeft,
    /// Center
    Center,
    /// Right edge, centered
    CenterRight,
    /// Bottom-left corner
    BottomLeft,
    /// Bottom edge, centered
    BottomCenter,
    /// Bottom-right corner
    BottomRight,
}

impl Alignment {
    /// Anchor factors in `-1..=1` on each axis (y grows downward).
    #[must_use]
    pub const fn factors(self) -> Vec2 {
        match self {
            Self::TopLeft => Vec2::new(-1.0, -1.0),
            Self::TopCenter => Vec2::new(0.0, -1.0),
            Self::TopRight => Vec2::new(1.0, -1.0),
            Self::CenterLeft => Vec2::new(-1.0, 0.0),
            Self::Center => Vec2::new(0.0, 0.0),
            Self::CenterRight => Vec2::new(1.0, 0.0),
            Self::BottomLeft => Vec2::new(-1.0, 1.0),
            Self::BottomCenter => Vec2::new(0.0, 1.0),
            Self::BottomRight => Vec2::new(1.0, 1.0),
        }
    }
}

/// Per-axis scale for `fit`.
#[must_use]
pub fn fit_scale(fit: Fit, frame: Vec2, content: Vec2) -> Vec2 {
    if content.x <= 0.0 || content.y <= 0.0 {
        return Vec2::ONE;
    }
    let ratio = frame / content;
    match fit {
        Fit::Fill => ratio,
        Fit::Contain => Vec2::splat(ratio.min_element()),
        Fit::Cover => Vec2::splat(ratio.max_element()),
        Fit::FitWidth => Vec2::splat(ratio.x),
        Fit::FitHeight => Vec2::splat(ratio.y),
        Fit::None => Vec2::ONE,
        Fit::ScaleDown => Vec2::splat(ratio.min_element().min(1.0)),
    }
}

/// Screen position of the content center after fit and alignment.
fn content_center(fit_scale: Vec2, alignment: Alignment, frame: Rect, content: Vec2) -> Vec2 {
    let frame_size = frame.size();
    let slack = frame_size - fit_scale * content;
    frame.origin() + frame_size * 0.5 + alignment.factors() * slack * 0.5
}

/// Maps an artboard-local point to screen pixels.
#[must_use]
pub fn screen_coordinate(
    local: Vec2,
    frame: Rect,
    content: Vec2,
    fit: Fit,
    alignment: Alignment,
) -> Vec2 {
    let scale = fit_scale(fit, frame.size(), content);
    let center = content_center(scale, alignment, frame, content);
    center + (local - content * 0.5) * scale
}

/// Maps a screen pixel to artboard-local coordinates.
#[must_use]
pub fn local_coordinate(
    screen: Vec2,
    frame: Rect,
    content: Vec2,
    fit: Fit,
    alignment: Alignment,
) -> Vec2 {
    let scale = fit_scale(fit, frame.size(), content);
    if scale.x == 0.0 || scale.y == 0.0 {
        return screen - frame.origin();
    }
    let center = content_center(scale, alignment, frame, content);
    (screen - center) / scale + content * 0.5
}
