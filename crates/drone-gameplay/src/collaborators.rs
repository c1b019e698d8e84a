//! Traits for the engine-side collaborators gameplay drives.
//!
//! Gameplay only issues commands through these. It never reads results back,
//! so every method returns `()`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// UI screen management.
pub trait Presentation {
    /// Shows the in-game HUD screen.
    fn show_active_screen(&mut self);
    /// Shows the "game over" screen.
    fn show_defeat_screen(&mut self);
    /// Shows the "map cleared" screen.
    fn show_cleared_screen(&mut self);
    /// Toggles the red alert indicator. Implementations without one ignore it.
    fn show_alert_indicator(&mut self, visible: bool);
}

/// Rigid body attached to the drone.
pub trait PhysicsBody {
    /// Overrides the linear velocity.
    fn set_velocity(&mut self, velocity: Vec3);
    /// Enables gravity and removes every positional/rotational constraint.
    fn release_constraints(&mut self);
    /// Applies an instantaneous linear impulse.
    fn apply_impulse(&mut self, impulse: Vec3);
    /// Applies an instantaneous angular impulse.
    fn apply_torque_impulse(&mut self, torque: Vec3);
}

/// One-shot sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Player laser fired
    LaserShot,
    /// Enemy laser fired
    EnemyLaserShot,
    /// Server activation alarm
    Alert,
    /// Drone took damage
    Damage,
    /// Drone destroyed
    Death,
}

/// Audio playback sink.
pub trait AudioSink {
    /// Plays a cue once, overlapping anything already playing.
    fn play_one_shot(&mut self, cue: Cue);
}

/// Particle effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vfx {
    /// Explosion burst when the drone is destroyed
    DroneDeath,
}

/// Particle system sink.
pub trait VfxSink {
    /// Starts a particle effect.
    fn trigger(&mut self, effect: Vfx);
}

/// Bundle of collaborators handed to the drone each call.
///
/// Presentation is not optional: a drone without a UI to report its end
/// state to is a wiring bug, so the type does not allow it.
pub struct Effects<'a> {
    /// UI screens
    pub presentation: &'a mut dyn Presentation,
    /// Drone rigid body
    pub physics: &'a mut dyn PhysicsBody,
    /// Sound
    pub audio: &'a mut dyn AudioSink,
    /// Particles
    pub vfx: &'a mut dyn VfxSink,
}

impl std::fmt::Debug for Effects<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effects").finish_non_exhaustive()
    }
}
