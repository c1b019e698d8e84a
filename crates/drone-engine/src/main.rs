//! # Drone Strike
//!
//! Headless entry point: loads `drone.toml` (or `$DRONE_CONFIG`), sets up
//! logging, and runs the scripted sortie with the HUD overlay in lockstep.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use drone_engine::{app, GameConfig, LogFormat};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    let mut config = GameConfig::load();
    config.validate();

    let filter = EnvFilter::from_default_env().add_directive("drone=info".parse()?);
    match config.log_format {
        LogFormat::Plain => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init(),
    }

    info!("Drone Strike starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("  Viewport: {}x{}", config.viewport_width, config.viewport_height);
    info!("  Step rate: {} Hz, {} frames", config.step_rate, config.frames);

    let summary = app::run(&config)?;
    info!(
        phase = ?summary.phase,
        health = summary.health,
        shots = summary.shots,
        "Drone Strike shutdown complete"
    );
    Ok(())
}
