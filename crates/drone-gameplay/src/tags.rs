//! Collider tags used by trigger and collision callbacks.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tag carried by a scene collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderTag {
    /// The player drone
    Player,
    /// An enemy turret or ship
    Enemy,
    /// A laser bolt
    Laser,
    /// A laser fence that hurts while touched
    LaserObstacle,
    /// First mission checkpoint
    Mission01,
    /// Fourth mission checkpoint
    Mission04,
    /// Anything else
    Untagged,
}

impl ColliderTag {
    /// Scene name of the tag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Player => "Player",
            Self::Enemy => "Enemy",
            Self::Laser => "Laser",
            Self::LaserObstacle => "LaserObstacle",
            Self::Mission01 => "Mission_01",
            Self::Mission04 => "Mission_04",
            Self::Untagged => "Untagged",
        }
    }

    /// Mission checklist slot reached by touching this tag.
    #[must_use]
    pub const fn mission_index(self) -> Option<usize> {
        match self {
            Self::Mission01 => Some(0),
            Self::Mission04 => Some(3),
            _ => None,
        }
    }
}

impl FromStr for ColliderTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Player" => Self::Player,
            "Enemy" => Self::Enemy,
            "Laser" => Self::Laser,
            "LaserObstacle" => Self::LaserObstacle,
            "Mission_01" => Self::Mission01,
            "Mission_04" => Self::Mission04,
            _ => Self::Untagged,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names_round_trip() {
        for tag in [
            ColliderTag::Player,
            ColliderTag::Enemy,
            ColliderTag::Laser,
            ColliderTag::LaserObstacle,
            ColliderTag::Mission01,
            ColliderTag::Mission04,
        ] {
            assert_eq!(tag.name().parse::<ColliderTag>(), Ok(tag));
        }
        assert_eq!("Wall".parse::<ColliderTag>(), Ok(ColliderTag::Untagged));
    }

    #[test]
    fn test_mission_index() {
        assert_eq!(ColliderTag::Mission01.mission_index(), Some(0));
        assert_eq!(ColliderTag::Mission04.mission_index(), Some(3));
        assert_eq!(ColliderTag::Laser.mission_index(), None);
    }
}
