//! # Drone Common
//!
//! Common types, utilities, and shared abstractions for Drone Strike.
//!
//! This crate provides foundational types used across all subsystems:
//! - Screen-space geometry (resolution, rects, viewport mapping)
//! - ID types (EntityId, AssetId)
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
