//! Headless stand-ins for the engine services.
//!
//! Without a window there is no GPU, mixer, or physics world. These types
//! take their place: the HUD runtime keeps named inputs and reports trigger
//! firings as events, the backend hands out texture ids, and the gameplay
//! collaborators append every command to a shared log.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use drone_common::{AssetId, Resolution, ResourceError};
use drone_gameplay::{AudioSink, Cue, Effects, PhysicsBody, Presentation, Vfx, VfxSink};
use drone_overlay::{
    Alignment, AnimationSdk, Artboard, EventProperty, LayerRole, RenderBackend, ReportedEvent,
    SdkError, StateMachine, TextureHandle, NUMBER_ALERT_COUNT, NUMBER_AMMO, NUMBER_HP,
    TRIGGER_ACTIVE, TRIGGER_CHECKED,
};
use glam::{Vec2, Vec3};
use parking_lot::Mutex;
use tracing::debug;

/// Artboard size of every headless HUD asset.
pub const ARTBOARD_SIZE: Vec2 = Vec2::new(256.0, 128.0);

/// State machine with the HUD's named inputs.
///
/// Firing a trigger reports an event of the same name on the next advance.
/// A press followed by a release reports `tap` at the release position.
#[derive(Debug, Default)]
pub struct HeadlessMachine {
    numbers: BTreeMap<String, f32>,
    triggers: BTreeSet<String>,
    fired: Vec<String>,
    pressed_at: Option<Vec2>,
    pending: Vec<ReportedEvent>,
    elapsed: f32,
}

impl HeadlessMachine {
    /// Creates a machine with every HUD input.
    #[must_use]
    pub fn hud() -> Self {
        let numbers = [NUMBER_ALERT_COUNT, NUMBER_HP, NUMBER_AMMO]
            .into_iter()
            .map(|n| (n.to_string(), 0.0))
            .collect();
        let triggers = [TRIGGER_ACTIVE, TRIGGER_CHECKED]
            .into_iter()
            .map(str::to_string)
            .collect();
        Self {
            numbers,
            triggers,
            ..Self::default()
        }
    }
}

impl StateMachine for HeadlessMachine {
    fn fire_trigger(&mut self, name: &str) -> bool {
        if !self.triggers.contains(name) {
            return false;
        }
        self.fired.push(name.to_string());
        true
    }

    fn set_number(&mut self, name: &str, value: f32) -> bool {
        match self.numbers.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            },
            None => false,
        }
    }

    fn number(&self, name: &str) -> Option<f32> {
        self.numbers.get(name).copied()
    }

    fn pointer_move(&mut self, _local: Vec2) {}

    fn pointer_down(&mut self, local: Vec2) {
        self.pressed_at = Some(local);
    }

    fn pointer_up(&mut self, local: Vec2) {
        if self.pressed_at.take().is_some() {
            self.pending.push(
                ReportedEvent::new("tap")
                    .with_property("x", EventProperty::Number(local.x))
                    .with_property("y", EventProperty::Number(local.y)),
            );
        }
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        for name in self.fired.drain(..) {
            let elapsed = EventProperty::Number(self.elapsed);
            self.pending
                .push(ReportedEvent::new(name).with_property("elapsed", elapsed));
        }
    }

    fn drain_reported_events(&mut self) -> Vec<ReportedEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Loaded headless artboard.
#[derive(Debug)]
pub struct HeadlessArtboard {
    machine: Option<HeadlessMachine>,
}

impl Artboard for HeadlessArtboard {
    fn size(&self) -> Vec2 {
        ARTBOARD_SIZE
    }

    fn state_machine(&mut self) -> Option<Box<dyn StateMachine>> {
        self.machine
            .take()
            .map(|m| Box::new(m) as Box<dyn StateMachine>)
    }
}

/// Runtime that serves a fixed catalog of asset ids.
#[derive(Debug, Default)]
pub struct HeadlessSdk {
    catalog: BTreeSet<AssetId>,
}

impl HeadlessSdk {
    /// Creates a runtime serving `assets`.
    pub fn new(assets: impl IntoIterator<Item = AssetId>) -> Self {
        Self {
            catalog: assets.into_iter().collect(),
        }
    }
}

impl AnimationSdk for HeadlessSdk {
    fn load_asset(&mut self, id: &AssetId) -> Result<Box<dyn Artboard>, SdkError> {
        if !self.catalog.contains(id) {
            return Err(SdkError::AssetNotFound(id.clone()));
        }
        debug!(asset = %id, "Loaded headless artboard");
        Ok(Box::new(HeadlessArtboard {
            machine: Some(HeadlessMachine::hud()),
        }))
    }
}

/// Backend that only tracks texture ids.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    live: BTreeSet<TextureHandle>,
    bound: BTreeMap<LayerRole, TextureHandle>,
    attached: BTreeSet<LayerRole>,
    /// Flip the final blit vertically
    pub flip_y: bool,
    /// Maximum live textures; allocation beyond it fails
    pub texture_budget: Option<usize>,
    allocations: usize,
}

impl HeadlessBackend {
    /// Textures allocated and not yet released.
    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.live.len()
    }

    /// Allocations over the backend's lifetime.
    #[must_use]
    pub const fn allocations(&self) -> usize {
        self.allocations
    }

    /// Layers with a draw pipeline.
    #[must_use]
    pub fn attached_layers(&self) -> usize {
        self.attached.len()
    }
}

impl RenderBackend for HeadlessBackend {
    fn supports_drawing_to_screen(&self) -> bool {
        false
    }

    fn flip_y(&self) -> bool {
        self.flip_y
    }

    fn attach_layer(&mut self, role: LayerRole, alignment: Alignment) {
        debug!(?role, ?alignment, "Layer attached");
        self.attached.insert(role);
    }

    fn detach_layer(&mut self, role: LayerRole) {
        self.attached.remove(&role);
        self.bound.remove(&role);
    }

    fn allocate_target(&mut self, size: Resolution) -> Result<TextureHandle, ResourceError> {
        if self.texture_budget.is_some_and(|budget| self.live.len() >= budget) {
            return Err(ResourceError::TextureAlloc {
                width: size.width,
                height: size.height,
                reason: "texture budget exhausted".to_string(),
            });
        }
        self.next_id += 1;
        self.allocations += 1;
        let texture = TextureHandle::new(self.next_id);
        self.live.insert(texture);
        Ok(texture)
    }

    fn bind_target(&mut self, role: LayerRole, texture: TextureHandle) {
        self.bound.insert(role, texture);
    }

    fn release_target(&mut self, texture: TextureHandle) {
        if !self.live.remove(&texture) {
            debug!(texture = texture.raw(), "Release of unknown texture ignored");
        }
    }
}

/// Command a gameplay collaborator received.
#[derive(Debug, Clone, PartialEq)]
pub enum FxRecord {
    /// Screen switch
    Screen(&'static str),
    /// Alert indicator toggled
    AlertIndicator(bool),
    /// Velocity override
    Velocity(Vec3),
    /// Constraints released
    Released,
    /// Linear impulse
    Impulse(Vec3),
    /// Angular impulse
    Torque(Vec3),
    /// Sound cue
    Cue(Cue),
    /// Particle burst
    Vfx(Vfx),
}

/// Log shared by the headless collaborators.
pub type FxLog = Arc<Mutex<Vec<FxRecord>>>;

/// Presentation that logs screen switches.
#[derive(Debug, Clone, Default)]
pub struct LogPresentation(FxLog);

impl Presentation for LogPresentation {
    fn show_active_screen(&mut self) {
        self.0.lock().push(FxRecord::Screen("active"));
    }

    fn show_defeat_screen(&mut self) {
        self.0.lock().push(FxRecord::Screen("defeat"));
    }

    fn show_cleared_screen(&mut self) {
        self.0.lock().push(FxRecord::Screen("cleared"));
    }

    fn show_alert_indicator(&mut self, visible: bool) {
        self.0.lock().push(FxRecord::AlertIndicator(visible));
    }
}

/// Physics body that logs commands.
#[derive(Debug, Clone, Default)]
pub struct LogPhysics(FxLog);

impl PhysicsBody for LogPhysics {
    fn set_velocity(&mut self, velocity: Vec3) {
        let mut log = self.0.lock();
        // Collapse the per-step velocity stream
        if let Some(FxRecord::Velocity(last)) = log.last_mut() {
            *last = velocity;
        } else {
            log.push(FxRecord::Velocity(velocity));
        }
    }

    fn release_constraints(&mut self) {
        self.0.lock().push(FxRecord::Released);
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.0.lock().push(FxRecord::Impulse(impulse));
    }

    fn apply_torque_impulse(&mut self, torque: Vec3) {
        self.0.lock().push(FxRecord::Torque(torque));
    }
}

/// Audio sink that logs cues.
#[derive(Debug, Clone, Default)]
pub struct LogAudio(FxLog);

impl AudioSink for LogAudio {
    fn play_one_shot(&mut self, cue: Cue) {
        debug!(?cue, "Cue");
        self.0.lock().push(FxRecord::Cue(cue));
    }
}

/// Particle sink that logs bursts.
#[derive(Debug, Clone, Default)]
pub struct LogVfx(FxLog);

impl VfxSink for LogVfx {
    fn trigger(&mut self, vfx: Vfx) {
        self.0.lock().push(FxRecord::Vfx(vfx));
    }
}

/// The four gameplay collaborators over one log.
#[derive(Debug, Clone)]
pub struct HeadlessRig {
    log: FxLog,
    /// Screens
    pub presentation: LogPresentation,
    /// Rigid body
    pub physics: LogPhysics,
    /// Audio
    pub audio: LogAudio,
    /// Particles
    pub vfx: LogVfx,
}

impl Default for HeadlessRig {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRig {
    /// Creates a rig with an empty log.
    #[must_use]
    pub fn new() -> Self {
        let log = FxLog::default();
        Self {
            presentation: LogPresentation(log.clone()),
            physics: LogPhysics(log.clone()),
            audio: LogAudio(log.clone()),
            vfx: LogVfx(log.clone()),
            log,
        }
    }

    /// Borrows the collaborators for one gameplay call.
    pub fn effects(&mut self) -> Effects<'_> {
        Effects {
            presentation: &mut self.presentation,
            physics: &mut self.physics,
            audio: &mut self.audio,
            vfx: &mut self.vfx,
        }
    }

    /// Copy of everything logged so far.
    #[must_use]
    pub fn records(&self) -> Vec<FxRecord> {
        self.log.lock().clone()
    }

    /// Number of `record` entries.
    #[must_use]
    pub fn count(&self, record: &FxRecord) -> usize {
        self.log.lock().iter().filter(|r| *r == record).count()
    }
}
