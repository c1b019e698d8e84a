//! The seven overlay layers and their per-layer state.

use drone_common::AssetId;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::fit::{Alignment, Fit};
use crate::render_target::RenderTarget;
use crate::sdk::{Artboard, StateMachine};

/// Trigger fired on the current mission entry.
pub const TRIGGER_ACTIVE: &str = "Is_Active";

/// Trigger fired when a mission entry is completed.
pub const TRIGGER_CHECKED: &str = "Is_Checked";

/// Number input on the alert counter layer.
pub const NUMBER_ALERT_COUNT: &str = "Alert_count";

/// Number input on the health gauge layer.
pub const NUMBER_HP: &str = "hp";

/// Number input on the ammo counter layer.
pub const NUMBER_AMMO: &str = "ammo";

/// Role of an overlay layer. Declaration order is slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LayerRole {
    /// Mission checklist entry 1
    MissionOne,
    /// Mission checklist entry 2
    MissionTwo,
    /// Mission checklist entry 3
    MissionThree,
    /// Mission checklist entry 4
    MissionFour,
    /// Alarm counter
    AlertCounter,
    /// Health gauge
    HealthGauge,
    /// Ammo counter
    AmmoCounter,
}

impl LayerRole {
    /// Number of layers.
    pub const COUNT: usize = 7;

    /// Every role in slot order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::MissionOne,
        Self::MissionTwo,
        Self::MissionThree,
        Self::MissionFour,
        Self::AlertCounter,
        Self::HealthGauge,
        Self::AmmoCounter,
    ];

    /// Slot index.
    #[must_use]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Role at a slot index.
    #[must_use]
    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.get(slot).copied()
    }

    /// Mission checklist role for entry `index` (0-based).
    #[must_use]
    pub fn mission(index: usize) -> Option<Self> {
        match index {
            0..=3 => Self::from_slot(index),
            _ => None,
        }
    }

    /// Screen corner the layer is pinned to.
    #[must_use]
    pub const fn alignment(self) -> Alignment {
        match self {
            Self::AlertCounter | Self::HealthGauge => Alignment::TopRight,
            Self::AmmoCounter => Alignment::BottomRight,
            Self::MissionOne | Self::MissionTwo | Self::MissionThree | Self::MissionFour => {
                Alignment::TopLeft
            },
        }
    }
}

/// One overlay slot.
///
/// A slot without an asset keeps its place but is skipped for drawing and
/// input.
pub struct OverlayLayer {
    pub(crate) role: LayerRole,
    pub(crate) asset: Option<AssetId>,
    pub(crate) artboard: Option<Box<dyn Artboard>>,
    pub(crate) state_machine: Option<Box<dyn StateMachine>>,
    pub(crate) fit: Fit,
    pub(crate) alignment: Alignment,
    /// Present only when the backend cannot draw to screen directly
    pub(crate) target: Option<RenderTarget>,
    /// Cleared after a render target allocation failure
    pub(crate) drawable: bool,
    /// Pointer position in this layer's space, as of the last step
    pub(crate) last_local: Option<Vec2>,
}

impl OverlayLayer {
    /// Creates an empty slot.
    #[must_use]
    pub fn empty(role: LayerRole, fit: Fit) -> Self {
        Self {
            role,
            asset: None,
            artboard: None,
            state_machine: None,
            fit,
            alignment: role.alignment(),
            target: None,
            drawable: false,
            last_local: None,
        }
    }

    /// Fills the slot with a loaded artboard.
    #[must_use]
    pub fn with_artboard(mut self, asset: AssetId, mut artboard: Box<dyn Artboard>) -> Self {
        self.state_machine = artboard.state_machine();
        self.asset = Some(asset);
        self.artboard = Some(artboard);
        self.drawable = true;
        self
    }

    /// Role of the slot.
    #[must_use]
    pub const fn role(&self) -> LayerRole {
        self.role
    }

    /// Asset backing the slot.
    #[must_use]
    pub fn asset(&self) -> Option<&AssetId> {
        self.asset.as_ref()
    }

    /// Screen corner the slot is pinned to.
    #[must_use]
    pub const fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Whether an artboard is loaded.
    #[must_use]
    pub fn has_asset(&self) -> bool {
        self.artboard.is_some()
    }

    /// Whether the artboard has a running state machine.
    #[must_use]
    pub fn has_state_machine(&self) -> bool {
        self.state_machine.is_some()
    }

    /// Whether the slot is currently drawn.
    #[must_use]
    pub const fn is_drawable(&self) -> bool {
        self.drawable
    }

    /// The render target, if the slot has one.
    #[must_use]
    pub const fn render_target(&self) -> Option<&RenderTarget> {
        self.target.as_ref()
    }
}

impl std::fmt::Debug for OverlayLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayLayer")
            .field("role", &self.role)
            .field("asset", &self.asset)
            .field("has_state_machine", &self.state_machine.is_some())
            .field("alignment", &self.alignment)
            .field("target", &self.target)
            .field("drawable", &self.drawable)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_by_slot() {
        let expected = [
            Alignment::TopLeft,
            Alignment::TopLeft,
            Alignment::TopLeft,
            Alignment::TopLeft,
            Alignment::TopRight,
            Alignment::TopRight,
            Alignment::BottomRight,
        ];
        for (slot, alignment) in expected.into_iter().enumerate() {
            let role = LayerRole::from_slot(slot).expect("slot in range");
            assert_eq!(role.alignment(), alignment);
            assert_eq!(role.slot(), slot);
        }
        assert_eq!(LayerRole::from_slot(7), None);
    }

    #[test]
    fn test_mission_roles() {
        assert_eq!(LayerRole::mission(0), Some(LayerRole::MissionOne));
        assert_eq!(LayerRole::mission(3), Some(LayerRole::MissionFour));
        assert_eq!(LayerRole::mission(4), None);
    }

    #[test]
    fn test_empty_slot() {
        let layer = OverlayLayer::empty(LayerRole::AmmoCounter, Fit::None);
        assert!(!layer.has_asset());
        assert!(!layer.is_drawable());
        assert_eq!(layer.alignment(), Alignment::BottomRight);
    }
}
