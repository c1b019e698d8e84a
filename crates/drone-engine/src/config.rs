//! Game configuration.
//!
//! Flight and combat tuning, the headless run's viewport and step rate,
//! logging format, and the HUD overlay assets. Loaded from and saved to TOML.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use drone_common::{AssetId, Resolution};
use drone_gameplay::DroneConfig;
use drone_overlay::{Fit, LayerRole, OverlayConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration file name.
pub const CONFIG_FILE: &str = "drone.toml";

/// Configuration load/save failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem error
    #[error("config io: {0}")]
    Io(#[from] io::Error),

    /// File is not valid TOML for [`GameConfig`]
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be encoded
    #[error("config encode: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Plain,
    /// One JSON object per line
    Json,
}

/// Game configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Viewport ===
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,

    // === Loop ===
    /// Fixed steps per second
    pub step_rate: u32,
    /// Steps to run before exiting
    pub frames: u32,
    /// Seed for the death tumble (None = random)
    pub seed: Option<u64>,
    /// Blink speed of the server alarm overlay
    pub alert_blink_speed: f32,

    // === Logging ===
    /// Log output format
    pub log_format: LogFormat,

    // === Gameplay ===
    /// Drone flight and combat tuning
    pub flight: DroneConfig,

    // === HUD ===
    /// Overlay fit and per-layer assets
    pub overlay: OverlayConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,

            step_rate: 60,
            frames: 600,
            seed: None,
            alert_blink_speed: 1.0,

            log_format: LogFormat::Plain,

            flight: DroneConfig::default(),

            overlay: OverlayConfig {
                fit: Fit::None,
                assets: default_assets(),
            },
        }
    }
}

/// Default asset for every HUD layer.
fn default_assets() -> BTreeMap<LayerRole, AssetId> {
    LayerRole::ALL
        .into_iter()
        .map(|role| {
            let name = match role {
                LayerRole::MissionOne => "hud/mission_1.riv",
                LayerRole::MissionTwo => "hud/mission_2.riv",
                LayerRole::MissionThree => "hud/mission_3.riv",
                LayerRole::MissionFour => "hud/mission_4.riv",
                LayerRole::AlertCounter => "hud/alert.riv",
                LayerRole::HealthGauge => "hud/hp.riv",
                LayerRole::AmmoCounter => "hud/ammo.riv",
            };
            (role, AssetId::new(name))
        })
        .collect()
}

impl GameConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match Self::try_load_from(path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("Failed to load config file: {e}");
                Self::default()
            },
        }
    }

    /// Load configuration, surfacing read and parse errors.
    pub fn try_load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Default configuration file path: `DRONE_CONFIG`, else the working directory.
    pub fn config_path() -> PathBuf {
        std::env::var_os("DRONE_CONFIG").map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from)
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Viewport
        self.viewport_width = self.viewport_width.clamp(320, 7680);
        self.viewport_height = self.viewport_height.clamp(240, 4320);

        // Loop
        self.step_rate = self.step_rate.clamp(10, 240);
        self.alert_blink_speed = self.alert_blink_speed.clamp(0.0, 60.0);

        // Flight
        let flight = &mut self.flight;
        flight.speed = flight.speed.clamp(0.0, 200.0);
        flight.tilt_angle = flight.tilt_angle.clamp(0.0, 45.0);
        flight.mouse_sensitivity = flight.mouse_sensitivity.clamp(0.1, 100.0);
        flight.max_health = flight.max_health.max(1);
        flight.max_ammo = flight.max_ammo.max(1);
        flight.hazard_cooldown = flight.hazard_cooldown.max(0.0);
        flight.death_torque = flight.death_torque.abs();
    }

    /// Viewport as a resolution.
    #[must_use]
    pub const fn viewport(&self) -> Resolution {
        Resolution::new(self.viewport_width, self.viewport_height)
    }

    /// Seconds per fixed step.
    #[must_use]
    pub fn step_dt(&self) -> f32 {
        1.0 / self.step_rate.max(1) as f32
    }
}
