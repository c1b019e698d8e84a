//! Headless game loop.
//!
//! Runs a scripted sortie at a fixed step: the drone flies, shoots, reaches
//! checkpoints, trips the server alarm, and takes fire, while the HUD overlay
//! steps in lockstep on the same clock.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use drone_common::Resolution;
use drone_gameplay::{
    ColliderTag, CombatPhase, DroneController, EventBus, GameEvent, InputSnapshot, KeyCode, Laser,
    MainMap, SessionConfig,
};
use drone_overlay::{OverlayCoordinator, PointerInput};
use glam::{Quat, Vec2};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::headless::{HeadlessBackend, HeadlessRig, HeadlessSdk};
use crate::hud::{HudBridge, HudState};

/// Player bolts are dropped past this distance from the drone.
const LASER_RANGE: f32 = 200.0;

/// A scripted world interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptAction {
    /// Fly through a trigger volume
    Touch(ColliderTag),
    /// Stay inside a trigger volume this step
    Linger(ColliderTag),
    /// The server room is breached
    ActivateServer,
    /// A turret fires at point-blank range
    EnemyShot,
    /// The window is resized to the given fraction of the configured size (percent)
    Resize(u32),
    /// The player reaches the exit
    Exit,
}

/// Actions for step `step` of the demo sortie at `step_rate` steps per second.
#[must_use]
pub fn script_at(step: u32, step_rate: u32) -> Vec<ScriptAction> {
    let rate = step_rate.max(1);
    let second = |s: f32| (s * rate as f32).round() as u32;
    let mut actions = Vec::new();

    if step == second(1.0) {
        actions.push(ScriptAction::Touch(ColliderTag::Mission01));
    }
    if step == second(2.0) {
        actions.push(ScriptAction::ActivateServer);
    }
    if step == second(3.0) {
        actions.push(ScriptAction::EnemyShot);
    }
    if (second(4.0)..second(5.0)).contains(&step) {
        actions.push(ScriptAction::Linger(ColliderTag::LaserObstacle));
    }
    if step == second(5.5) {
        actions.push(ScriptAction::Resize(75));
    }
    if step == second(6.0) {
        actions.push(ScriptAction::Touch(ColliderTag::Mission04));
    }
    if step == second(9.0) {
        actions.push(ScriptAction::Exit);
    }
    actions
}

/// Pilot input for step `step`.
#[must_use]
pub fn input_at(step: u32, step_rate: u32) -> InputSnapshot {
    let rate = step_rate.max(1);
    let t = step as f32 / rate as f32;
    let mut input = InputSnapshot::new()
        .with_axes((t * 0.7).sin(), 1.0, (t * 0.3).cos() * 0.2)
        .with_mouse_x((t * 0.5).sin() * 0.1)
        .with_pointer(Vec2::new(0.5 + 0.4 * (t * 0.9).cos(), 0.5 + 0.4 * (t * 0.9).sin()));

    if step % (rate / 4).max(1) == 0 {
        input = input.with_fire();
    }
    if step == (rate as f32 * 2.5) as u32 {
        input = input.with_key(KeyCode::R);
    }
    // Brief look from the low camera, where shooting is disabled
    if step == rate * 7 {
        input = input.with_key(KeyCode::Alpha2);
    }
    if step == rate * 8 {
        input = input.with_key(KeyCode::Alpha1);
    }
    input
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Steps executed
    pub steps: u32,
    /// Drone phase at the end
    pub phase: CombatPhase,
    /// Health at the end
    pub health: i32,
    /// Rounds left at the end
    pub ammo: u32,
    /// Player lasers fired
    pub shots: u32,
    /// Gameplay events drained from the bus
    pub game_events: usize,
    /// Reported events received from the HUD
    pub hud_events: usize,
    /// HUD layers disabled by failures
    pub overlay_failures: usize,
    /// Textures still allocated after teardown
    pub leaked_textures: usize,
}

/// Runs the sortie described by `config`.
pub fn run(config: &GameConfig) -> Result<RunSummary> {
    let dt = config.step_dt();
    let mut viewport = config.viewport();
    info!(
        frames = config.frames,
        step_rate = config.step_rate,
        width = viewport.width,
        height = viewport.height,
        "Starting headless run"
    );

    let bus = EventBus::default();
    let mut drone = DroneController::new(config.flight.clone(), SessionConfig::new())
        .with_missions()
        .with_event_sender(bus.sender());
    if let Some(seed) = config.seed {
        drone = drone.with_seed(seed);
    }
    let mut map = MainMap::new(config.alert_blink_speed);
    let mut rig = HeadlessRig::new();

    let mut sdk = HeadlessSdk::new(config.overlay.assets.values().cloned());
    let mut overlay =
        OverlayCoordinator::new(HeadlessBackend::default(), &mut sdk, &config.overlay, viewport);
    let mut overlay_failures = overlay.startup_failures().len();

    let hud_events = Rc::new(Cell::new(0_usize));
    let counter = hud_events.clone();
    overlay.set_event_listener(move |event| {
        debug!(name = %event.name, delay = event.seconds_delay, "HUD event");
        counter.set(counter.get() + 1);
    });

    let mut hud = HudBridge::new();
    let mut lasers: Vec<Laser> = Vec::new();
    let mut shots = 0;
    let mut game_events = 0;
    let mut steps = 0;

    drone.start(&mut rig.presentation);

    for step in 0..config.frames {
        let now = step as f32 * dt;
        let input = input_at(step, config.step_rate);

        if let Some(laser) = drone.update(&input, dt, Some(&map), &mut rig.effects()) {
            shots += 1;
            lasers.push(laser);
        }
        drone.late_update(&input);
        map.update(now);

        for action in script_at(step, config.step_rate) {
            match action {
                ScriptAction::Touch(tag) => {
                    drone.on_trigger_enter(tag, now, &mut rig.effects());
                },
                ScriptAction::Linger(tag) => {
                    drone.on_trigger_stay(tag, now, &mut rig.effects());
                },
                ScriptAction::ActivateServer => map.activate_server(),
                ScriptAction::EnemyShot => {
                    let facing = Quat::from_rotation_arc(glam::Vec3::Z, -drone.forward());
                    let mut bolt = Laser::enemy(drone.position(), facing, &mut rig.audio);
                    if bolt.on_collision(ColliderTag::Player) {
                        drone.on_trigger_enter(ColliderTag::Laser, now, &mut rig.effects());
                    }
                },
                ScriptAction::Resize(percent) => {
                    let base = config.viewport();
                    viewport = Resolution::new(
                        base.width * percent / 100,
                        base.height * percent / 100,
                    );
                    info!(width = viewport.width, height = viewport.height, "Viewport resized");
                },
                ScriptAction::Exit => {
                    if drone.map_clear(&mut rig.presentation) {
                        info!("Map cleared");
                    }
                },
            }
        }

        for laser in &mut lasers {
            laser.update(dt);
        }
        let origin = drone.position();
        lasers.retain(|l| l.is_alive() && l.position.distance(origin) < LASER_RANGE);

        hud.sync(&HudState::capture(&drone, &map), &mut overlay);
        let pointer = PointerInput::new(input.pointer_viewport, input.pointer_held);
        let report = overlay.step(viewport, pointer, dt);
        overlay_failures += report.failures.len();
        if !report.reallocated.is_empty() {
            debug!(layers = report.reallocated.len(), "HUD targets reallocated");
        }
        debug!(draws = overlay.draw_commands().len(), "Composited HUD");

        for event in bus.drain() {
            game_events += 1;
            match event {
                GameEvent::Defeated { .. } => warn!("Drone lost"),
                other => debug!(?other, "Game event"),
            }
        }

        steps = step + 1;
        if drone.phase().is_terminal() {
            info!(phase = ?drone.phase(), step, "Run ended");
            break;
        }
    }

    overlay.teardown();
    let summary = RunSummary {
        steps,
        phase: drone.phase(),
        health: drone.combat().health(),
        ammo: drone.combat().ammo(),
        shots,
        game_events,
        hud_events: hud_events.get(),
        overlay_failures,
        leaked_textures: overlay.backend().live_textures(),
    };
    info!(?summary, "Headless run complete");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(42),
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_script_schedule() {
        assert_eq!(script_at(60, 60), vec![ScriptAction::Touch(ColliderTag::Mission01)]);
        assert_eq!(script_at(240, 60), vec![ScriptAction::Linger(ColliderTag::LaserObstacle)]);
        assert!(script_at(300, 60).is_empty());
        assert_eq!(script_at(540, 60), vec![ScriptAction::Exit]);
    }

    #[test]
    fn test_input_fires_and_reloads() {
        assert!(input_at(0, 60).fire_pressed);
        assert!(!input_at(1, 60).fire_pressed);
        assert!(input_at(150, 60).key_down(KeyCode::R));
    }

    #[test]
    fn test_full_sortie_clears_map() {
        let summary = run(&config()).expect("run");

        assert_eq!(summary.phase, CombatPhase::Cleared);
        assert_eq!(summary.steps, 541);
        // Enemy laser plus at least two hazard ticks
        assert!(summary.health <= 70 && summary.health > 0);
        assert!(summary.shots > 0);
        assert!(summary.game_events > 0);
        assert!(summary.hud_events > 0);
        assert_eq!(summary.overlay_failures, 0);
        assert_eq!(summary.leaked_textures, 0);
    }

    #[test]
    fn test_lethal_fire_ends_run() {
        let mut config = config();
        config.flight.laser_damage = 1000;

        let summary = run(&config).expect("run");

        assert_eq!(summary.phase, CombatPhase::Defeated);
        assert_eq!(summary.steps, 181);
        assert_eq!(summary.health, 0);
        assert_eq!(summary.leaked_textures, 0);
    }

    #[test]
    fn test_short_run_stays_active() {
        let config = GameConfig {
            frames: 30,
            ..config()
        };
        let summary = run(&config).expect("run");
        assert_eq!(summary.phase, CombatPhase::Active);
        assert_eq!(summary.steps, 30);
        assert_eq!(summary.health, 100);
    }
}
