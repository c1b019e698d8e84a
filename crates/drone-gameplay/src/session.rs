//! Per-session configuration carried between scenes.
//!
//! Tutorial skip flags used to be process-wide. They now live here and are
//! handed to whichever component ends the current run.

use serde::{Deserialize, Serialize};

/// Session-scoped flags that survive scene changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Jump straight to the second tutorial on the next run
    pub skip_to_tutorial_2: bool,
    /// Jump straight to the third tutorial on the next run
    pub skip_to_tutorial_3: bool,
}

impl SessionConfig {
    /// Creates a session with no skips.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            skip_to_tutorial_2: false,
            skip_to_tutorial_3: false,
        }
    }

    /// Clears every tutorial skip. Called whenever a run ends.
    pub fn reset_tutorial_skips(&mut self) {
        self.skip_to_tutorial_2 = false;
        self.skip_to_tutorial_3 = false;
    }

    /// Whether any tutorial skip is armed.
    #[must_use]
    pub const fn has_skip(&self) -> bool {
        self.skip_to_tutorial_2 || self.skip_to_tutorial_3
    }
}
