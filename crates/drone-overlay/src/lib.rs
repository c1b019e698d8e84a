//! # Drone Overlay
//!
//! Multi-layer HUD overlay for Drone Strike.
//!
//! This crate drives several vector-animation layers in lockstep:
//! - Per-layer render targets that follow the viewport size
//! - Pointer routing from screen pixels into each artboard's local space
//! - Reported events forwarded to a single listener, in slot order
//! - A cleanup queue so render resources are only freed from the step loop
//!
//! The animation runtime and the graphics backend sit behind the
//! [`AnimationSdk`](sdk::AnimationSdk) and [`RenderBackend`](render_target::RenderBackend) traits.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod cleanup;
pub mod coordinator;
pub mod error;
pub mod fit;
pub mod layer;
pub mod render_target;
pub mod sdk;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cleanup::*;
    pub use crate::coordinator::*;
    pub use crate::error::*;
    pub use crate::fit::*;
    pub use crate::layer::*;
    pub use crate::render_target::*;
    pub use crate::sdk::*;
}

pub use prelude::*;
