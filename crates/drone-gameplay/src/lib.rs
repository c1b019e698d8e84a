//! # Drone Gameplay
//!
//! Gameplay systems for Drone Strike.
//!
//! This crate provides the engine-agnostic game logic:
//! - Combat/damage state machine (health, ammo, phase)
//! - Player drone controller with flight, shooting, and camera modes
//! - Laser projectiles
//! - Main map server alarm
//! - Mission checklist and session flags
//! - Collaborator traits for presentation, physics, audio, and particles
//! - Event bus for inter-system communication

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod collaborators;
pub mod combat;
pub mod drone;
pub mod events;
pub mod input;
pub mod map;
pub mod missions;
pub mod projectile;
pub mod session;
pub mod tags;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::collaborators::*;
    pub use crate::combat::*;
    pub use crate::drone::*;
    pub use crate::events::*;
    pub use crate::input::*;
    pub use crate::map::*;
    pub use crate::missions::*;
    pub use crate::projectile::*;
    pub use crate::session::*;
    pub use crate::tags::*;
}

pub use prelude::*;
