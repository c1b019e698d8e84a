//! Drone Strike engine: configuration, headless services, the HUD bridge,
//! and the fixed-step game loop that ties gameplay to the overlay.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod app;
pub mod config;
pub mod headless;
pub mod hud;

pub use app::{run, RunSummary};
pub use config::{ConfigError, GameConfig, LogFormat};
pub use hud::{HudBridge, HudState};
