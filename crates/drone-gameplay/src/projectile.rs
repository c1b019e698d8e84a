//! Laser bolts fired by the player and by enemies.

use drone_common::EntityId;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::collaborators::{AudioSink, Cue};
use crate::tags::ColliderTag;

/// Player laser speed in units per second.
pub const PLAYER_LASER_SPEED: f32 = 10.0;

/// Enemy laser speed in units per second.
pub const ENEMY_LASER_SPEED: f32 = 5.0;

/// Who fired the bolt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaserKind {
    /// Fired by the player drone
    Player,
    /// Fired by an enemy
    Enemy,
}

impl LaserKind {
    /// Travel speed.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Player => PLAYER_LASER_SPEED,
            Self::Enemy => ENEMY_LASER_SPEED,
        }
    }

    /// Whether touching a collider with `tag` destroys the bolt.
    ///
    /// Player bolts pass through the player. Enemy bolts pass through enemies
    /// and other bolts.
    #[must_use]
    pub const fn destroyed_by(self, tag: ColliderTag) -> bool {
        match self {
            Self::Player => !matches!(tag, ColliderTag::Player),
            Self::Enemy => !matches!(tag, ColliderTag::Enemy | ColliderTag::Laser),
        }
    }
}

/// A bolt in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laser {
    /// Scene ID
    pub id: EntityId,
    /// Shooter
    pub kind: LaserKind,
    /// World position
    pub position: Vec3,
    /// World orientation; the bolt travels along its local +Z
    pub rotation: Quat,
    alive: bool,
}

impl Laser {
    /// Spawns a player bolt.
    #[must_use]
    pub fn player(position: Vec3, rotation: Quat) -> Self {
        Self {
            id: EntityId::new(),
            kind: LaserKind::Player,
            position,
            rotation,
            alive: true,
        }
    }

    /// Spawns an enemy bolt and plays its firing sound.
    pub fn enemy(position: Vec3, rotation: Quat, audio: &mut dyn AudioSink) -> Self {
        audio.play_one_shot(Cue::EnemyLaserShot);
        Self {
            id: EntityId::new(),
            kind: LaserKind::Enemy,
            position,
            rotation,
            alive: true,
        }
    }

    /// World-space travel direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Moves the bolt forward.
    pub fn update(&mut self, dt: f32) {
        if self.alive {
            self.position += self.forward() * dt * self.kind.speed();
        }
    }

    /// Collision callback. Returns `true` if the bolt was destroyed.
    pub fn on_collision(&mut self, tag: ColliderTag) -> bool {
        if self.alive && self.kind.destroyed_by(tag) {
            self.alive = false;
        }
        !self.alive
    }

    /// Whether the bolt is still in flight.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::mock::{Call, Recorder};

    #[test]
    fn test_player_laser_moves_forward() {
        let mut laser = Laser::player(Vec3::ZERO, Quat::IDENTITY);
        laser.update(0.5);
        assert!((laser.position - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_enemy_laser_follows_rotation() {
        let mut audio = Recorder::default();
        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let mut laser = Laser::enemy(Vec3::ZERO, rotation, &mut audio);

        laser.update(1.0);
        assert!((laser.position - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-4);
        assert_eq!(audio.calls, vec![Call::Sound(Cue::EnemyLaserShot)]);
    }

    #[test]
    fn test_player_laser_ignores_player() {
        let mut laser = Laser::player(Vec3::ZERO, Quat::IDENTITY);
        assert!(!laser.on_collision(ColliderTag::Player));
        assert!(laser.on_collision(ColliderTag::Enemy));
        assert!(!laser.is_alive());
    }

    #[test]
    fn test_enemy_laser_passes_enemies_and_lasers() {
        let mut audio = Recorder::default();
        let mut laser = Laser::enemy(Vec3::ZERO, Quat::IDENTITY, &mut audio);
        assert!(!laser.on_collision(ColliderTag::Enemy));
        assert!(!laser.on_collision(ColliderTag::Laser));
        assert!(laser.on_collision(ColliderTag::Untagged));
    }

    #[test]
    fn test_dead_laser_stops() {
        let mut laser = Laser::player(Vec3::ZERO, Quat::IDENTITY);
        laser.on_collision(ColliderTag::LaserObstacle);
        laser.update(1.0);
        assert_eq!(laser.position, Vec3::ZERO);
    }
}
