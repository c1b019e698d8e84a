//! Main map state: the server alarm and its blinking red overlay.

use serde::{Deserialize, Serialize};
use tracing::info;

/// How long the alarm overlay blinks after activation, in seconds.
pub const ALERT_BLINK_DURATION: f32 = 10.0;

/// Peak alpha of the alarm overlay.
pub const ALERT_MAX_ALPHA: f32 = 0.15;

/// Main map controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainMap {
    server_activated: bool,
    /// Set on the first update after activation
    activation_time: Option<f32>,
    blink_speed: f32,
    alert_alpha: f32,
    skylight_glass_visible: bool,
}

impl Default for MainMap {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl MainMap {
    /// Creates a map with the alarm off.
    #[must_use]
    pub fn new(blink_speed: f32) -> Self {
        Self {
            server_activated: false,
            activation_time: None,
            blink_speed,
            alert_alpha: 0.0,
            skylight_glass_visible: true,
        }
    }

    /// Trips the server alarm.
    pub fn activate_server(&mut self) {
        if !self.server_activated {
            info!("Server activated");
        }
        self.server_activated = true;
    }

    /// Whether the alarm has been tripped.
    #[must_use]
    pub const fn is_server_activated(&self) -> bool {
        self.server_activated
    }

    /// Current alpha of the red alarm overlay.
    #[must_use]
    pub const fn alert_alpha(&self) -> f32 {
        self.alert_alpha
    }

    /// Whether the skylight glass is still in the scene.
    #[must_use]
    pub const fn skylight_glass_visible(&self) -> bool {
        self.skylight_glass_visible
    }

    /// Advances the alarm animation to game time `now`.
    pub fn update(&mut self, now: f32) {
        if !self.server_activated {
            return;
        }
        self.skylight_glass_visible = false;

        let started = *self.activation_time.get_or_insert(now);
        self.alert_alpha = if now - started < ALERT_BLINK_DURATION {
            (now * self.blink_speed).sin().abs() * ALERT_MAX_ALPHA
        } else {
            0.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_map_stays_dark() {
        let mut map = MainMap::default();
        map.update(5.0);
        assert_eq!(map.alert_alpha(), 0.0);
        assert!(map.skylight_glass_visible());
    }

    #[test]
    fn test_alarm_blinks_then_stops() {
        let mut map = MainMap::new(1.0);
        map.activate_server();

        map.update(20.0);
        assert!(!map.skylight_glass_visible());
        let expected = 20.0_f32.sin().abs() * ALERT_MAX_ALPHA;
        assert!((map.alert_alpha() - expected).abs() < 1e-6);

        map.update(25.0);
        assert!(map.alert_alpha() <= ALERT_MAX_ALPHA);

        map.update(30.5);
        assert_eq!(map.alert_alpha(), 0.0);
    }
}
