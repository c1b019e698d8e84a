//! Bridge from gameplay state to the HUD overlay's named controls.

use drone_gameplay::{DroneController, MainMap, MISSION_COUNT};
use drone_overlay::{
    LayerRole, OverlayCoordinator, OverlayResult, RenderBackend, NUMBER_ALERT_COUNT, NUMBER_AMMO,
    NUMBER_HP, TRIGGER_ACTIVE, TRIGGER_CHECKED,
};
use tracing::debug;

/// What the HUD shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudState {
    /// Cleared flag per checklist entry
    pub missions: [bool; MISSION_COUNT],
    /// Server alarm raised
    pub alert: bool,
    /// Current health
    pub health: i32,
    /// Rounds left
    pub ammo: u32,
}

impl HudState {
    /// Reads the HUD-relevant state of the game.
    #[must_use]
    pub fn capture(drone: &DroneController, map: &MainMap) -> Self {
        Self {
            missions: drone.missions().map(|m| m.flags()).unwrap_or_default(),
            alert: map.is_server_activated(),
            health: drone.combat().health(),
            ammo: drone.combat().ammo(),
        }
    }

    /// First checklist entry not yet cleared.
    #[must_use]
    pub fn current_mission(&self) -> Option<usize> {
        self.missions.iter().position(|c| !c)
    }

    /// Value of the health gauge: tens of health points.
    #[must_use]
    pub const fn hp_units(&self) -> i32 {
        self.health / 10
    }
}

/// Pushes [`HudState`] changes into the overlay.
///
/// Only changes are pushed; syncing the same state twice is a no-op.
#[derive(Debug, Default)]
pub struct HudBridge {
    shown: Option<HudState>,
    active_mission: Option<usize>,
}

impl HudBridge {
    /// Creates a bridge that has pushed nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the difference between `state` and what was last shown.
    /// Returns how many controls were updated.
    pub fn sync<B: RenderBackend>(
        &mut self,
        state: &HudState,
        overlay: &mut OverlayCoordinator<B>,
    ) -> usize {
        let previous = self.shown;
        if previous.as_ref() == Some(state) {
            return 0;
        }
        let mut pushed = 0;

        for (index, cleared) in state.missions.iter().enumerate() {
            let was_cleared = previous.is_some_and(|p| p.missions[index]);
            if *cleared && !was_cleared {
                if let Some(role) = LayerRole::mission(index) {
                    pushed += apply(overlay.fire_trigger(role, TRIGGER_CHECKED));
                }
            }
        }

        let current = state.current_mission();
        if current != self.active_mission {
            if let Some(role) = current.and_then(LayerRole::mission) {
                pushed += apply(overlay.fire_trigger(role, TRIGGER_ACTIVE));
            }
            self.active_mission = current;
        }

        if previous.map(|p| p.alert) != Some(state.alert) {
            let count = if state.alert { 1.0 } else { 0.0 };
            pushed += apply(overlay.set_number(LayerRole::AlertCounter, NUMBER_ALERT_COUNT, count));
        }
        if previous.map(|p| p.hp_units()) != Some(state.hp_units()) {
            pushed += apply(overlay.set_number(
                LayerRole::HealthGauge,
                NUMBER_HP,
                state.hp_units() as f32,
            ));
        }
        if previous.map(|p| p.ammo) != Some(state.ammo) {
            pushed += apply(overlay.set_number(
                LayerRole::AmmoCounter,
                NUMBER_AMMO,
                state.ammo as f32,
            ));
        }

        self.shown = Some(*state);
        pushed
    }
}

/// Missing layers and inputs are skipped, not fatal.
fn apply(result: OverlayResult<()>) -> usize {
    match result {
        Ok(()) => 1,
        Err(err) => {
            debug!(%err, "HUD control skipped");
            0
        },
    }
}
