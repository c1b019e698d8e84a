//! Combat/damage state machine for a single entity.
//!
//! This module tracks:
//! - Health with a floor at zero
//! - Laser ammo and reloading
//! - Game phase (`Active` -> `Defeated` | `Cleared`)
//! - Rate limiting of hazard-area damage
//!
//! The state machine only decides *what* happens. Side effects such as sounds
//! or the game-over screen are driven by the caller from the returned outcome.

use drone_common::{DroneError, DroneResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default maximum health.
pub const DEFAULT_MAX_HEALTH: i32 = 100;

/// Default magazine size.
pub const DEFAULT_MAX_AMMO: u32 = 20;

/// Minimum time between two hazard-area hits, in seconds.
pub const HAZARD_COOLDOWN: f32 = 0.5;

/// Game phase of a combat entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatPhase {
    /// In play
    #[default]
    Active,
    /// Health exhausted (terminal)
    Defeated,
    /// Map objectives completed (terminal)
    Cleared,
}

impl CombatPhase {
    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Where damage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// A laser hit; always applied
    Projectile,
    /// Standing inside a damaging area; rate limited
    HazardArea,
}

/// A single damage notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    /// Damage amount (zero is ignored)
    pub amount: u32,
    /// Damage source
    pub source: DamageSource,
    /// Game time of the hit, in seconds
    pub timestamp: f32,
}

impl DamageEvent {
    /// Creates a damage event.
    #[must_use]
    pub const fn new(amount: u32, source: DamageSource, timestamp: f32) -> Self {
        Self {
            amount,
            source,
            timestamp,
        }
    }

    /// Projectile damage at `timestamp`.
    #[must_use]
    pub const fn projectile(amount: u32, timestamp: f32) -> Self {
        Self::new(amount, DamageSource::Projectile, timestamp)
    }

    /// Hazard-area damage at `timestamp`.
    #[must_use]
    pub const fn hazard(amount: u32, timestamp: f32) -> Self {
        Self::new(amount, DamageSource::HazardArea, timestamp)
    }
}

/// Result of [`CombatEntity::apply_damage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Nothing changed (terminal phase, zero amount, or hazard cooldown)
    Ignored,
    /// Health went down but the entity is still active
    Damaged {
        /// Health after the hit
        health: i32,
    },
    /// This hit moved the entity to `Defeated`. Returned at most once.
    Defeated,
}

impl DamageOutcome {
    /// Whether health changed.
    #[must_use]
    pub const fn was_applied(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Health, ammo, and phase of one combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEntity {
    health: i32,
    max_health: i32,
    ammo: u32,
    max_ammo: u32,
    phase: CombatPhase,
    /// Time of the last applied hazard hit
    last_hazard_damage: Option<f32>,
    hazard_cooldown: f32,
}

impl Default for CombatEntity {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEALTH, DEFAULT_MAX_AMMO)
    }
}

impl CombatEntity {
    /// Creates a full-health, fully loaded entity.
    #[must_use]
    pub fn new(max_health: i32, max_ammo: u32) -> Self {
        let max_health = max_health.max(1);
        Self {
            health: max_health,
            max_health,
            ammo: max_ammo,
            max_ammo,
            phase: CombatPhase::Active,
            last_hazard_damage: None,
            hazard_cooldown: HAZARD_COOLDOWN,
        }
    }

    /// Sets the hazard cooldown window.
    #[must_use]
    pub fn with_hazard_cooldown(mut self, cooldown: f32) -> Self {
        self.hazard_cooldown = cooldown.max(0.0);
        self
    }

    /// Sets the current ammo (clamped to the magazine size).
    #[must_use]
    pub fn with_ammo(mut self, ammo: u32) -> Self {
        self.ammo = ammo.min(self.max_ammo);
        self
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Rounds left in the magazine.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Magazine size.
    #[must_use]
    pub const fn max_ammo(&self) -> u32 {
        self.max_ammo
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> CombatPhase {
        self.phase
    }

    /// Whether the entity is still in play.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.phase, CombatPhase::Active)
    }

    /// Health as a fraction of max health.
    #[must_use]
    pub fn health_percent(&self) -> f32 {
        self.health as f32 / self.max_health as f32
    }

    fn ensure_active(&self, operation: &str) -> DroneResult<()> {
        if self.phase.is_terminal() {
            return Err(DroneError::InvalidTransitionIgnored(format!(
                "{operation} in phase {:?}",
                self.phase
            )));
        }
        Ok(())
    }

    /// Applies a hit.
    ///
    /// Hazard damage within the cooldown of the previous applied hazard hit is
    /// dropped. Health is clamped at zero; reaching zero moves the entity to
    /// [`CombatPhase::Defeated`] and returns [`DamageOutcome::Defeated`] exactly
    /// once.
    pub fn apply_damage(&mut self, event: DamageEvent) -> DamageOutcome {
        if let Err(e) = self.ensure_active("apply_damage") {
            debug!("{e}");
            return DamageOutcome::Ignored;
        }
        if event.amount == 0 {
            return DamageOutcome::Ignored;
        }

        if event.source == DamageSource::HazardArea {
            if let Some(last) = self.last_hazard_damage {
                if event.timestamp - last <= self.hazard_cooldown {
                    return DamageOutcome::Ignored;
                }
            }
            self.last_hazard_damage = Some(event.timestamp);
        }

        let amount = i32::try_from(event.amount).unwrap_or(i32::MAX);
        self.health = self.health.saturating_sub(amount).max(0);

        if self.health == 0 {
            self.phase = CombatPhase::Defeated;
            info!(source = ?event.source, "Combat entity defeated");
            DamageOutcome::Defeated
        } else {
            debug!(health = self.health, amount, source = ?event.source, "Damage applied");
            DamageOutcome::Damaged {
                health: self.health,
            }
        }
    }

    /// Spends one round. Returns whether a shot was fired.
    ///
    /// Silently does nothing when not active, when `shooting_enabled` is
    /// false, or when the magazine is empty.
    pub fn fire(&mut self, shooting_enabled: bool) -> bool {
        if let Err(e) = self.ensure_active("fire") {
            debug!("{e}");
            return false;
        }
        if !shooting_enabled || self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    /// Refills the magazine. Always succeeds, in any phase.
    pub fn reload(&mut self) {
        self.ammo = self.max_ammo;
    }

    /// Moves an active entity to [`CombatPhase::Cleared`].
    ///
    /// Returns `true` only on the call that performed the transition.
    pub fn mark_cleared(&mut self) -> bool {
        if let Err(e) = self.ensure_active("mark_cleared") {
            debug!("{e}");
            return false;
        }
        self.phase = CombatPhase::Cleared;
        info!("Combat entity cleared the map");
        true
    }
}
