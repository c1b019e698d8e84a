//! Player drone controller.
//!
//! Flight, shooting, camera modes, trigger callbacks, and the death sequence.
//! Health, ammo, and phase are owned by an embedded [`CombatEntity`]; this
//! type turns its outcomes into collaborator commands and bus events.

use crossbeam_channel::Sender;
use drone_common::EntityId;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collaborators::{AudioSink, Cue, Effects, Presentation, Vfx};
use crate::combat::{CombatEntity, CombatPhase, DamageEvent, DamageOutcome};
use crate::events::GameEvent;
use crate::input::{InputSnapshot, KeyCode};
use crate::map::MainMap;
use crate::missions::MissionBoard;
use crate::projectile::Laser;
use crate::session::SessionConfig;
use crate::tags::ColliderTag;

/// Tuning values for the player drone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneConfig {
    /// Linear speed at full axis deflection
    pub speed: f32,
    /// Body tilt at full axis deflection, in degrees
    pub tilt_angle: f32,
    /// Yaw degrees per unit of mouse-X
    pub mouse_sensitivity: f32,
    /// Propeller spin, in degrees per second
    pub propeller_speed: f32,
    /// Maximum health
    pub max_health: i32,
    /// Magazine size
    pub max_ammo: u32,
    /// Minimum seconds between hazard hits
    pub hazard_cooldown: f32,
    /// Damage taken from an enemy laser
    pub laser_damage: u32,
    /// Damage taken per hazard tick from a laser fence
    pub obstacle_damage: u32,
    /// Distance in front of the drone where lasers spawn
    pub muzzle_offset: f32,
    /// Upward impulse applied on death
    pub death_impulse: f32,
    /// Maximum absolute torque impulse per axis on death
    pub death_torque: f32,
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            speed: 30.0,
            tilt_angle: 10.0,
            mouse_sensitivity: 10.0,
            propeller_speed: 2000.0,
            max_health: crate::combat::DEFAULT_MAX_HEALTH,
            max_ammo: crate::combat::DEFAULT_MAX_AMMO,
            hazard_cooldown: crate::combat::HAZARD_COOLDOWN,
            laser_damage: 10,
            obstacle_damage: 10,
            muzzle_offset: 0.4,
            death_impulse: 3.0,
            death_torque: 0.02,
        }
    }
}

/// Camera rig placement relative to the drone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraMode {
    /// Behind and above; the only mode that can shoot
    #[default]
    Chase,
    /// Below, looking up
    Low,
    /// Above, looking down
    High,
}

impl CameraMode {
    /// Mode selected by a number key.
    #[must_use]
    pub const fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Alpha1 => Some(Self::Chase),
            KeyCode::Alpha2 => Some(Self::Low),
            KeyCode::Alpha3 => Some(Self::High),
            KeyCode::R => None,
        }
    }

    /// Camera local position.
    #[must_use]
    pub const fn offset(self) -> Vec3 {
        match self {
            Self::Chase | Self::High => Vec3::new(0.0, 16.0, -50.0),
            Self::Low => Vec3::new(0.0, -12.0, -50.0),
        }
    }

    /// Camera local pitch in degrees.
    #[must_use]
    pub const fn pitch_degrees(self) -> f32 {
        match self {
            Self::Chase => 0.0,
            Self::Low => -45.0,
            Self::High => 45.0,
        }
    }

    /// Whether lasers can be fired from this view.
    #[must_use]
    pub const fn allows_shooting(self) -> bool {
        matches!(self, Self::Chase)
    }
}

/// The player drone.
#[derive(Debug)]
pub struct DroneController {
    id: EntityId,
    config: DroneConfig,
    combat: CombatEntity,
    session: SessionConfig,
    /// Present only when a HUD is attached
    missions: Option<MissionBoard>,
    events: Option<Sender<GameEvent>>,
    position: Vec3,
    /// Yaw of the whole drone
    rotation: Quat,
    aircraft_rest: Quat,
    /// Body tilt relative to the drone root
    aircraft_rotation: Quat,
    velocity: Vec3,
    camera_mode: CameraMode,
    propeller_angle: f32,
    control_enabled: bool,
    alert_played: bool,
    damage_audio_played: bool,
    rng: fastrand::Rng,
}

impl DroneController {
    /// Creates a drone at the origin.
    #[must_use]
    pub fn new(config: DroneConfig, session: SessionConfig) -> Self {
        let combat = CombatEntity::new(config.max_health, config.max_ammo)
            .with_hazard_cooldown(config.hazard_cooldown);
        Self {
            id: EntityId::new(),
            config,
            combat,
            session,
            missions: None,
            events: None,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            aircraft_rest: Quat::IDENTITY,
            aircraft_rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            camera_mode: CameraMode::Chase,
            propeller_angle: 0.0,
            control_enabled: true,
            alert_played: false,
            damage_audio_played: false,
            rng: fastrand::Rng::new(),
        }
    }

    /// Seeds the generator used for the death tumble.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Attaches a mission checklist (the HUD overlay is present).
    #[must_use]
    pub fn with_missions(mut self) -> Self {
        self.missions = Some(MissionBoard::new());
        self
    }

    /// Publishes gameplay events to `sender`.
    #[must_use]
    pub fn with_event_sender(mut self, sender: Sender<GameEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Places the drone.
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Enters play and shows the in-game screen.
    pub fn start(&mut self, presentation: &mut dyn Presentation) {
        self.alert_played = false;
        presentation.show_active_screen();
        info!(id = self.id.raw(), "Drone started");
    }

    fn publish(&self, event: GameEvent) {
        if let Some(sender) = &self.events {
            let _ = sender.try_send(event);
        }
    }

    /// Per-frame update. Returns a laser if one was fired this frame.
    pub fn update(
        &mut self,
        input: &InputSnapshot,
        dt: f32,
        map: Option<&MainMap>,
        fx: &mut Effects<'_>,
    ) -> Option<Laser> {
        let mut shot = None;

        if self.control_enabled && self.combat.is_active() {
            let direction =
                Vec3::X * input.horizontal + Vec3::Z * input.vertical + Vec3::Y * input.elevation;
            self.velocity = self.config.speed * (self.rotation * direction);
            fx.physics.set_velocity(self.velocity);
            self.position += self.velocity * dt;

            let tilt = self.config.tilt_angle;
            let tilt_horizontal = Quat::from_rotation_x((input.horizontal * tilt).to_radians());
            let tilt_vertical = Quat::from_rotation_y((-input.vertical * tilt).to_radians());
            self.aircraft_rotation = self.aircraft_rest * tilt_horizontal * tilt_vertical;

            let yaw = (input.mouse_x * self.config.mouse_sensitivity).to_radians();
            self.rotation = (self.rotation * Quat::from_rotation_y(yaw)).normalize();

            if input.fire_pressed {
                shot = self.fire(fx.audio);
            }
            if input.key_down(KeyCode::R) {
                self.reload();
            }
            if let Some(map) = map {
                if map.is_server_activated() && !self.alert_played {
                    fx.audio.play_one_shot(Cue::Alert);
                    self.alert_played = true;
                    self.publish(GameEvent::AlertRaised);
                }
            }
        }

        self.propeller_angle = (self.propeller_angle + self.config.propeller_speed * dt) % 360.0;
        shot
    }

    /// Camera switching, run after [`Self::update`].
    pub fn late_update(&mut self, input: &InputSnapshot) {
        if !self.control_enabled || !self.combat.is_active() {
            return;
        }
        for key in &input.keys_down {
            if let Some(mode) = CameraMode::from_key(*key) {
                self.camera_mode = mode;
                debug!(?mode, "Camera mode changed");
            }
        }
    }

    /// Fires a laser if the current view allows it and ammo remains.
    pub fn fire(&mut self, audio: &mut dyn AudioSink) -> Option<Laser> {
        if !self.combat.fire(self.camera_mode.allows_shooting()) {
            return None;
        }
        audio.play_one_shot(Cue::LaserShot);
        self.publish(GameEvent::ShotFired {
            entity_id: self.id,
            ammo: self.combat.ammo(),
        });
        let muzzle = self.position + self.forward() * self.config.muzzle_offset;
        Some(Laser::player(muzzle, self.rotation))
    }

    /// Refills the magazine.
    pub fn reload(&mut self) {
        self.combat.reload();
        self.publish(GameEvent::Reloaded { entity_id: self.id });
    }

    /// Applies a hit and runs the death sequence if it was fatal.
    pub fn take_damage(&mut self, event: DamageEvent, fx: &mut Effects<'_>) -> DamageOutcome {
        let outcome = self.combat.apply_damage(event);
        if !outcome.was_applied() {
            return outcome;
        }

        fx.audio.play_one_shot(Cue::Damage);
        self.damage_audio_played = true;
        self.publish(GameEvent::Damaged {
            entity_id: self.id,
            amount: event.amount,
            source: event.source,
            health: self.combat.health(),
        });

        if outcome == DamageOutcome::Defeated {
            self.game_over(fx);
        }
        outcome
    }

    /// Trigger-enter callback.
    pub fn on_trigger_enter(
        &mut self,
        tag: ColliderTag,
        now: f32,
        fx: &mut Effects<'_>,
    ) -> DamageOutcome {
        if !self.combat.is_active() {
            return DamageOutcome::Ignored;
        }
        match tag {
            ColliderTag::Laser => {
                self.take_damage(DamageEvent::projectile(self.config.laser_damage, now), fx)
            },
            ColliderTag::Mission01 | ColliderTag::Mission04 => {
                let index = tag.mission_index().unwrap_or_default();
                match self.missions.as_mut() {
                    Some(board) => {
                        if board.clear(index) {
                            info!(index, "Mission cleared");
                            self.publish(GameEvent::MissionCleared { index });
                        }
                    },
                    None => debug!(index, "No HUD attached, mission checkpoint ignored"),
                }
                DamageOutcome::Ignored
            },
            _ => DamageOutcome::Ignored,
        }
    }

    /// Trigger-stay callback, called every physics step while touching.
    pub fn on_trigger_stay(
        &mut self,
        tag: ColliderTag,
        now: f32,
        fx: &mut Effects<'_>,
    ) -> DamageOutcome {
        if tag == ColliderTag::LaserObstacle {
            self.take_damage(DamageEvent::hazard(self.config.obstacle_damage, now), fx)
        } else {
            DamageOutcome::Ignored
        }
    }

    fn game_over(&mut self, fx: &mut Effects<'_>) {
        info!(id = self.id.raw(), "Drone destroyed");

        fx.presentation.show_alert_indicator(false);
        fx.audio.play_one_shot(Cue::Death);
        fx.vfx.trigger(Vfx::DroneDeath);

        fx.physics.release_constraints();
        fx.physics.apply_impulse(Vec3::Y * self.config.death_impulse);
        let torque = self.config.death_torque;
        let mut spin = || (self.rng.f32() * 2.0 - 1.0) * torque;
        let tumble = Vec3::new(spin(), spin(), spin());
        fx.physics.apply_torque_impulse(tumble);

        self.session.reset_tutorial_skips();
        fx.presentation.show_defeat_screen();
        self.publish(GameEvent::Defeated { entity_id: self.id });
    }

    /// Ends the run as a win. Returns `true` only on the first call from play.
    pub fn map_clear(&mut self, presentation: &mut dyn Presentation) -> bool {
        if !self.combat.mark_cleared() {
            return false;
        }
        self.session.reset_tutorial_skips();
        presentation.show_cleared_screen();
        self.publish(GameEvent::MapCleared { entity_id: self.id });
        true
    }

    /// Re-enables flight input.
    pub fn enable_control(&mut self) {
        self.control_enabled = true;
    }

    /// Ignores flight input (cutscenes, menus).
    pub fn disable_control(&mut self) {
        self.control_enabled = false;
    }

    /// Scene ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Combat state.
    #[must_use]
    pub const fn combat(&self) -> &CombatEntity {
        &self.combat
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> CombatPhase {
        self.combat.phase()
    }

    /// Session flags.
    #[must_use]
    pub const fn session(&self) -> &SessionConfig {
        &self.session
    }

    /// Mission checklist, if a HUD is attached.
    #[must_use]
    pub const fn missions(&self) -> Option<&MissionBoard> {
        self.missions.as_ref()
    }

    /// Kinematic position estimate.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Drone yaw.
    #[must_use]
    pub const fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Body tilt relative to the drone root.
    #[must_use]
    pub const fn aircraft_rotation(&self) -> Quat {
        self.aircraft_rotation
    }

    /// Last commanded velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Facing direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Active camera mode.
    #[must_use]
    pub const fn camera_mode(&self) -> CameraMode {
        self.camera_mode
    }

    /// Shared propeller angle in degrees.
    #[must_use]
    pub const fn propeller_angle(&self) -> f32 {
        self.propeller_angle
    }

    /// Whether flight input is accepted.
    #[must_use]
    pub const fn control_enabled(&self) -> bool {
        self.control_enabled
    }

    /// Whether the damage cue has ever played.
    #[must_use]
    pub const fn damage_audio_played(&self) -> bool {
        self.damage_audio_played
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::mock::{Call, Rig};
    use crate::events::EventBus;

    fn drone() -> DroneController {
        DroneController::new(DroneConfig::default(), SessionConfig::new()).with_seed(7)
    }

    #[test]
    fn test_start_shows_active_screen() {
        let mut rig = Rig::default();
        let mut drone = drone();
        drone.start(&mut rig.presentation);
        assert_eq!(rig.presentation.calls, vec![Call::ActiveScreen]);
    }

    #[test]
    fn test_forward_flight_sets_velocity() {
        let mut rig = Rig::default();
        let mut drone = drone();
        let input = InputSnapshot::new().with_axes(0.0, 1.0, 0.0);

        drone.update(&input, 0.1, None, &mut rig.effects());

        assert!((drone.velocity() - Vec3::new(0.0, 0.0, 30.0)).length() < 1e-4);
        assert!((drone.position() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-4);
        assert_eq!(rig.physics.calls.len(), 1);
    }

    #[test]
    fn test_mouse_yaw_rotates_movement() {
        let mut rig = Rig::default();
        let mut drone = drone();

        // 9 units * 10 deg = 90 degrees of yaw
        drone.update(&InputSnapshot::new().with_mouse_x(9.0), 0.0, None, &mut rig.effects());
        drone.update(
            &InputSnapshot::new().with_axes(0.0, 1.0, 0.0),
            0.0,
            None,
            &mut rig.effects(),
        );

        assert!((drone.velocity() - Vec3::new(30.0, 0.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_fire_spawns_laser_at_muzzle() {
        let mut rig = Rig::default();
        let mut drone = drone();

        let laser = drone.update(&InputSnapshot::new().with_fire(), 0.0, None, &mut rig.effects());

        let laser = laser.expect("laser fired");
        assert!((laser.position - Vec3::new(0.0, 0.0, 0.4)).length() < 1e-5);
        assert_eq!(drone.combat().ammo(), 19);
        assert_eq!(rig.audio.count(&Call::Sound(Cue::LaserShot)), 1);
    }

    #[test]
    fn test_low_camera_blocks_shooting() {
        let mut rig = Rig::default();
        let mut drone = drone();

        drone.late_update(&InputSnapshot::new().with_key(KeyCode::Alpha2));
        assert_eq!(drone.camera_mode(), CameraMode::Low);
        assert!(drone.fire(&mut rig.audio).is_none());
        assert_eq!(drone.combat().ammo(), 20);

        drone.late_update(&InputSnapshot::new().with_key(KeyCode::Alpha1));
        assert!(drone.fire(&mut rig.audio).is_some());
    }

    #[test]
    fn test_reload_key() {
        let mut rig = Rig::default();
        let mut drone = drone();
        for _ in 0..5 {
            drone.fire(&mut rig.audio);
        }
        drone.update(&InputSnapshot::new().with_key(KeyCode::R), 0.0, None, &mut rig.effects());
        assert_eq!(drone.combat().ammo(), 20);
    }

    #[test]
    fn test_disabled_control_ignores_input() {
        let mut rig = Rig::default();
        let mut drone = drone();
        drone.disable_control();

        let shot = drone.update(&InputSnapshot::new().with_fire(), 0.5, None, &mut rig.effects());

        assert!(shot.is_none());
        assert!(rig.physics.calls.is_empty());
        assert!(drone.propeller_angle() > 0.0);

        drone.enable_control();
        assert!(drone.control_enabled());
    }

    #[test]
    fn test_three_laser_hits_kill_once() {
        let mut rig = Rig::default();
        let bus = EventBus::new(32);
        let config = DroneConfig {
            laser_damage: 40,
            ..DroneConfig::default()
        };
        let mut drone = DroneController::new(
            config,
            SessionConfig {
                skip_to_tutorial_2: true,
                skip_to_tutorial_3: false,
            },
        )
        .with_seed(1)
        .with_event_sender(bus.sender());

        let mut fx = rig.effects();
        let outcomes: Vec<_> = (0..4)
            .map(|i| drone.on_trigger_enter(ColliderTag::Laser, i as f32, &mut fx))
            .collect();
        drop(fx);

        assert_eq!(
            outcomes,
            vec![
                DamageOutcome::Damaged { health: 60 },
                DamageOutcome::Damaged { health: 20 },
                DamageOutcome::Defeated,
                DamageOutcome::Ignored,
            ]
        );
        assert_eq!(drone.phase(), CombatPhase::Defeated);
        assert_eq!(drone.combat().health(), 0);
        assert!(!drone.session().has_skip());

        assert_eq!(rig.presentation.count(&Call::DefeatScreen), 1);
        assert_eq!(rig.presentation.count(&Call::AlertIndicator(false)), 1);
        assert_eq!(rig.audio.count(&Call::Sound(Cue::Death)), 1);
        assert_eq!(rig.audio.count(&Call::Sound(Cue::Damage)), 3);
        assert_eq!(rig.vfx.count(&Call::Particles(Vfx::DroneDeath)), 1);
        assert_eq!(rig.physics.count(&Call::ReleaseConstraints), 1);
        assert_eq!(rig.physics.count(&Call::Impulse(Vec3::new(0.0, 3.0, 0.0))), 1);

        let torques = rig.physics.torques();
        assert_eq!(torques.len(), 1);
        assert!(torques[0].abs().max_element() <= 0.02);

        let defeats = bus
            .drain()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Defeated { .. }))
            .count();
        assert_eq!(defeats, 1);
    }

    #[test]
    fn test_laser_obstacle_rate_limited() {
        let mut rig = Rig::default();
        let mut drone = drone();
        let mut fx = rig.effects();

        for now in [0.0, 0.1, 0.3, 0.6, 0.7, 1.2] {
            drone.on_trigger_stay(ColliderTag::LaserObstacle, now, &mut fx);
        }
        assert_eq!(drone.combat().health(), 70);
        assert!(drone.damage_audio_played());
    }

    #[test]
    fn test_mission_checkpoints_need_hud() {
        let mut rig = Rig::default();
        let mut without = drone();
        without.on_trigger_enter(ColliderTag::Mission01, 0.0, &mut rig.effects());
        assert!(without.missions().is_none());

        let mut with = drone().with_missions();
        with.on_trigger_enter(ColliderTag::Mission04, 0.0, &mut rig.effects());
        let board = with.missions().expect("hud attached");
        assert!(board.is_cleared(3));
        assert!(!board.is_cleared(0));
    }

    #[test]
    fn test_alert_cue_plays_once() {
        let mut rig = Rig::default();
        let mut drone = drone();
        let mut map = MainMap::default();
        let input = InputSnapshot::new();

        drone.update(&input, 0.1, Some(&map), &mut rig.effects());
        map.activate_server();
        drone.update(&input, 0.1, Some(&map), &mut rig.effects());
        drone.update(&input, 0.1, Some(&map), &mut rig.effects());

        assert_eq!(rig.audio.count(&Call::Sound(Cue::Alert)), 1);
    }

    #[test]
    fn test_map_clear_once() {
        let mut rig = Rig::default();
        let mut drone = drone();

        assert!(drone.map_clear(&mut rig.presentation));
        assert!(!drone.map_clear(&mut rig.presentation));
        assert_eq!(rig.presentation.count(&Call::ClearedScreen), 1);

        let outcome = drone.on_trigger_enter(ColliderTag::Laser, 1.0, &mut rig.effects());
        assert_eq!(outcome, DamageOutcome::Ignored);
        assert_eq!(drone.combat().health(), 100);
    }

    #[test]
    fn test_defeated_drone_freezes_flight() {
        let mut rig = Rig::default();
        let mut drone = drone();
        drone.take_damage(DamageEvent::projectile(100, 0.0), &mut rig.effects());

        let before = rig.physics.calls.len();
        drone.update(
            &InputSnapshot::new().with_axes(1.0, 1.0, 1.0).with_fire(),
            0.1,
            None,
            &mut rig.effects(),
        );
        assert_eq!(rig.physics.calls.len(), before);
        assert!(!drone.map_clear(&mut rig.presentation));
    }
}
