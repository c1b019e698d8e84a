//! Mission checklist shown on the HUD.

use serde::{Deserialize, Serialize};

/// Number of checklist entries on the HUD.
pub const MISSION_COUNT: usize = 4;

/// Cleared flags for each checklist entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionBoard {
    cleared: [bool; MISSION_COUNT],
}

impl MissionBoard {
    /// Creates a board with nothing cleared.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cleared: [false; MISSION_COUNT],
        }
    }

    /// Marks a mission cleared. Returns `true` if it was not cleared before.
    /// Out-of-range indices are ignored.
    pub fn clear(&mut self, index: usize) -> bool {
        match self.cleared.get_mut(index) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            },
            _ => false,
        }
    }

    /// Whether mission `index` is cleared.
    #[must_use]
    pub fn is_cleared(&self, index: usize) -> bool {
        self.cleared.get(index).copied().unwrap_or(false)
    }

    /// First mission not yet cleared.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.cleared.iter().position(|c| !c)
    }

    /// Whether every mission is cleared.
    #[must_use]
    pub fn all_cleared(&self) -> bool {
        self.cleared.iter().all(|c| *c)
    }

    /// All flags in checklist order.
    #[must_use]
    pub const fn flags(&self) -> [bool; MISSION_COUNT] {
        self.cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_once() {
        let mut board = MissionBoard::new();
        assert!(board.clear(3));
        assert!(!board.clear(3));
        assert!(board.is_cleared(3));
        assert!(!board.clear(9));
    }

    #[test]
    fn test_current_mission() {
        let mut board = MissionBoard::new();
        assert_eq!(board.current(), Some(0));
        board.clear(0);
        assert_eq!(board.current(), Some(1));
        for i in 1..MISSION_COUNT {
            board.clear(i);
        }
        assert_eq!(board.current(), None);
        assert!(board.all_cleared());
    }
}
