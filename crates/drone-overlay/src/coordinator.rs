//! Multi-layer overlay coordinator.
//!
//! Owns the seven HUD layers and runs them in lockstep. Each step, in order:
//!
//! 1. Run queued cleanup tasks
//! 2. Resize render targets whose viewport changed
//! 3. Map the pointer into each layer's local space and forward moves
//! 4. Forward press/release transitions
//! 5. Advance every state machine
//! 6. Dispatch reported events to the listener, in slot order
//!
//! A failing layer is disabled and reported; it never aborts the step.

use std::collections::BTreeMap;

use drone_common::{AssetId, Rect, Resolution};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cleanup::{CleanupHandle, CleanupQueue};
use crate::error::{OverlayError, OverlayResult};
use crate::fit::{local_coordinate, Fit};
use crate::layer::{LayerRole, OverlayLayer};
use crate::render_target::{RenderBackend, RenderTarget, TextureHandle};
use crate::sdk::{AnimationSdk, ReportedEvent, StateMachine};

/// Overlay settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Fit applied to every layer
    pub fit: Fit,
    /// Asset for each layer; missing roles stay empty
    pub assets: BTreeMap<LayerRole, AssetId>,
}

/// Pointer input for one step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    /// Viewport-normalized position, origin bottom-left
    pub viewport_position: Vec2,
    /// Primary button held
    pub pressed: bool,
}

impl PointerInput {
    /// Creates a pointer sample.
    #[must_use]
    pub const fn new(viewport_position: Vec2, pressed: bool) -> Self {
        Self {
            viewport_position,
            pressed,
        }
    }
}

/// Pointer state carried between steps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Pointer in top-down screen pixels, as of the last step
    pub last_screen_position: Option<Vec2>,
    /// Whether the last step saw the button held
    pub is_pressed: bool,
}

/// What a step did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Cleanup tasks run before the step
    pub cleanup_tasks: usize,
    /// Layers whose render target was reallocated
    pub reallocated: Vec<LayerRole>,
    /// Layers that received a pointer move
    pub moved: Vec<LayerRole>,
    /// A press was forwarded
    pub pointer_down: bool,
    /// A release was forwarded
    pub pointer_up: bool,
    /// Reported events handed to the listener
    pub events_dispatched: usize,
    /// Layers disabled during this step
    pub failures: Vec<OverlayError>,
}

/// One textured quad for the compositing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Source layer
    pub role: LayerRole,
    /// Texture to draw
    pub texture: TextureHandle,
    /// Destination in screen pixels
    pub rect: Rect,
}

/// Single subscriber for reported events.
pub type EventListener = Box<dyn FnMut(ReportedEvent)>;

/// The overlay coordinator.
pub struct OverlayCoordinator<B: RenderBackend + 'static> {
    backend: B,
    layers: BTreeMap<LayerRole, OverlayLayer>,
    pointer: PointerState,
    viewport: Resolution,
    cleanup: CleanupQueue<B>,
    listener: Option<EventListener>,
    startup_failures: Vec<OverlayError>,
    torn_down: bool,
}

impl<B: RenderBackend + 'static> OverlayCoordinator<B> {
    /// Loads every configured asset and sets up the layers.
    ///
    /// Slots whose asset is missing or fails to load stay empty. When the
    /// backend cannot draw to screen, each loaded layer gets a render target
    /// sized to `viewport`.
    pub fn new(
        mut backend: B,
        sdk: &mut dyn AnimationSdk,
        config: &OverlayConfig,
        viewport: Resolution,
    ) -> Self {
        let offscreen = !backend.supports_drawing_to_screen();
        let mut layers = BTreeMap::new();
        let mut startup_failures = Vec::new();

        for role in LayerRole::ALL {
            let mut layer = OverlayLayer::empty(role, config.fit);

            if let Some(asset) = config.assets.get(&role) {
                match sdk.load_asset(asset) {
                    Ok(artboard) => layer = layer.with_artboard(asset.clone(), artboard),
                    Err(source) => {
                        let err = OverlayError::Asset { role, source };
                        warn!(%err, "Overlay layer left empty");
                        startup_failures.push(err);
                    },
                }
            }

            backend.attach_layer(role, layer.alignment());

            if offscreen && layer.has_asset() {
                let mut target = RenderTarget::new();
                if viewport.is_empty() {
                    debug!(?role, "Render target deferred until the viewport has an area");
                } else if let Err(source) = target.ensure_size(role, viewport, &mut backend) {
                    let err = OverlayError::RenderTarget { role, source };
                    warn!(%err, "Overlay layer disabled");
                    layer.drawable = false;
                    startup_failures.push(err);
                }
                layer.target = Some(target);
            }

            layers.insert(role, layer);
        }

        let loaded = layers.values().filter(|l| l.has_asset()).count();
        info!(loaded, offscreen, "Overlay initialized");

        Self {
            backend,
            layers,
            pointer: PointerState::default(),
            viewport,
            cleanup: CleanupQueue::new(),
            listener: None,
            startup_failures,
            torn_down: false,
        }
    }

    /// Installs the event listener, replacing any previous one.
    pub fn set_event_listener(&mut self, listener: impl FnMut(ReportedEvent) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Producer handle for deferring releases from other contexts.
    #[must_use]
    pub fn cleanup_handle(&self) -> CleanupHandle<B> {
        self.cleanup.handle()
    }

    /// Runs one step.
    pub fn step(&mut self, viewport: Resolution, pointer: PointerInput, dt: f32) -> StepReport {
        let mut report = StepReport::default();
        if self.torn_down {
            debug!("Step after teardown ignored");
            return report;
        }

        report.cleanup_tasks = self.cleanup.drain(&mut self.backend);
        self.viewport = viewport;

        // A minimized window keeps its targets until it has an area again
        let resizable = !viewport.is_empty();
        for layer in self.layers.values_mut() {
            if !resizable || !layer.drawable {
                continue;
            }
            if let Some(target) = layer.target.as_mut() {
                match target.ensure_size(layer.role, viewport, &mut self.backend) {
                    Ok(true) => report.reallocated.push(layer.role),
                    Ok(false) => {},
                    Err(source) => {
                        let err = OverlayError::RenderTarget {
                            role: layer.role,
                            source,
                        };
                        warn!(%err, "Overlay layer disabled");
                        layer.drawable = false;
                        report.failures.push(err);
                    },
                }
            }
        }

        let screen = viewport.viewport_to_screen(pointer.viewport_position);
        let frame = viewport.rect();
        let press = pointer.pressed && !self.pointer.is_pressed;
        let release = !pointer.pressed && self.pointer.is_pressed;

        for layer in self.layers.values_mut() {
            if let (Some(artboard), Some(machine)) =
                (layer.artboard.as_ref(), layer.state_machine.as_mut())
            {
                let local =
                    local_coordinate(screen, frame, artboard.size(), layer.fit, layer.alignment);
                if layer.last_local != Some(local) {
                    machine.pointer_move(local);
                    layer.last_local = Some(local);
                    report.moved.push(layer.role);
                }
                if press {
                    machine.pointer_down(local);
                } else if release {
                    machine.pointer_up(local);
                }
            }
        }

        self.pointer.last_screen_position = Some(screen);
        self.pointer.is_pressed = pointer.pressed;
        report.pointer_down = press;
        report.pointer_up = release;

        for machine in self.layers.values_mut().filter_map(|l| l.state_machine.as_mut()) {
            machine.advance(dt);
        }

        let listener = &mut self.listener;
        for layer in self.layers.values_mut() {
            if let Some(machine) = layer.state_machine.as_mut() {
                for event in machine.drain_reported_events() {
                    report.events_dispatched += 1;
                    match listener.as_mut() {
                        Some(listener) => listener(event),
                        None => {
                            debug!(role = ?layer.role, name = %event.name, "Event dropped");
                        },
                    }
                }
            }
        }

        report
    }

    fn machine_mut(&mut self, role: LayerRole) -> OverlayResult<&mut (dyn StateMachine + 'static)> {
        self.layers
            .get_mut(&role)
            .and_then(|l| l.state_machine.as_deref_mut())
            .ok_or(OverlayError::NoStateMachine { role })
    }

    /// Fires a named trigger on a layer.
    pub fn fire_trigger(&mut self, role: LayerRole, name: &str) -> OverlayResult<()> {
        if self.machine_mut(role)?.fire_trigger(name) {
            Ok(())
        } else {
            Err(OverlayError::UnknownInput {
                role,
                name: name.to_string(),
            })
        }
    }

    /// Sets a named number on a layer.
    pub fn set_number(&mut self, role: LayerRole, name: &str, value: f32) -> OverlayResult<()> {
        if self.machine_mut(role)?.set_number(name, value) {
            Ok(())
        } else {
            Err(OverlayError::UnknownInput {
                role,
                name: name.to_string(),
            })
        }
    }

    /// Reads a named number from a layer.
    pub fn number(&self, role: LayerRole, name: &str) -> OverlayResult<f32> {
        let machine = self
            .layers
            .get(&role)
            .and_then(|l| l.state_machine.as_deref())
            .ok_or(OverlayError::NoStateMachine { role })?;
        machine.number(name).ok_or_else(|| OverlayError::UnknownInput {
            role,
            name: name.to_string(),
        })
    }

    /// Compositing pass: one full-viewport quad per drawable offscreen layer.
    #[must_use]
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        if self.viewport.is_empty() {
            return Vec::new();
        }
        let rect = if self.backend.flip_y() {
            self.viewport.rect().flipped_y()
        } else {
            self.viewport.rect()
        };
        self.layers
            .values()
            .filter(|l| l.drawable)
            .filter_map(|l| {
                let texture = l.target.as_ref()?.texture()?;
                Some(DrawCommand {
                    role: l.role,
                    texture,
                    rect,
                })
            })
            .collect()
    }

    /// Releases every render target and detaches every layer.
    ///
    /// Queued cleanup runs first so nothing is released twice or leaked.
    /// Calling this again is a no-op.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let drained = self.cleanup.drain(&mut self.backend);
        for layer in self.layers.values_mut() {
            if let Some(target) = layer.target.as_mut() {
                target.release(&mut self.backend);
            }
            self.backend.detach_layer(layer.role);
            layer.state_machine = None;
            layer.drawable = false;
        }
        self.torn_down = true;
        info!(drained, "Overlay torn down");
    }

    /// Layer in a slot.
    #[must_use]
    pub fn layer(&self, role: LayerRole) -> Option<&OverlayLayer> {
        self.layers.get(&role)
    }

    /// All layers in slot order.
    pub fn layers(&self) -> impl Iterator<Item = &OverlayLayer> {
        self.layers.values()
    }

    /// Pointer state after the last step.
    #[must_use]
    pub const fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    /// Viewport of the last step.
    #[must_use]
    pub const fn viewport(&self) -> Resolution {
        self.viewport
    }

    /// Load and allocation failures from construction.
    #[must_use]
    pub fn startup_failures(&self) -> &[OverlayError] {
        &self.startup_failures
    }

    /// Whether [`Self::teardown`] has run.
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// The graphics backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: RenderBackend + 'static> Drop for OverlayCoordinator<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<B: RenderBackend + std::fmt::Debug + 'static> std::fmt::Debug for OverlayCoordinator<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayCoordinator")
            .field("backend", &self.backend)
            .field("layers", &self.layers)
            .field("pointer", &self.pointer)
            .field("viewport", &self.viewport)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{NUMBER_HP, TRIGGER_CHECKED};
    use crate::render_target::backend_mock::{BackendCall, MockBackend};
    use crate::sdk::mock::{MockSdk, Received};
    use crate::sdk::EventProperty;
    use std::cell::RefCell;
    use std::rc::Rc;

    const ALERT: &str = "hud/alert";
    const HEALTH: &str = "hud/health";
    const AMMO: &str = "hud/ammo";
    const MISSION: &str = "hud/mission1";

    fn config() -> OverlayConfig {
        let mut assets = BTreeMap::new();
        assets.insert(LayerRole::MissionOne, AssetId::new(MISSION));
        assets.insert(LayerRole::AlertCounter, AssetId::new(ALERT));
        assets.insert(LayerRole::HealthGauge, AssetId::new(HEALTH));
        assets.insert(LayerRole::AmmoCounter, AssetId::new(AMMO));
        OverlayConfig {
            fit: Fit::None,
            assets,
        }
    }

    fn sdk() -> MockSdk {
        MockSdk::default()
            .with_asset(MISSION)
            .with_asset(ALERT)
            .with_asset(HEALTH)
            .with_asset(AMMO)
    }

    fn overlay(backend: MockBackend, sdk: &mut MockSdk) -> OverlayCoordinator<MockBackend> {
        OverlayCoordinator::new(backend, sdk, &config(), Resolution::hd720())
    }

    fn at(x: f32, y: f32) -> PointerInput {
        PointerInput::new(Vec2::new(x, y), false)
    }

    #[test]
    fn test_setup_attaches_every_slot() {
        let mut sdk = sdk();
        let overlay = overlay(MockBackend::default(), &mut sdk);

        let attached = overlay
            .backend()
            .calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Attach(..)))
            .count();
        assert_eq!(attached, LayerRole::COUNT);
        assert_eq!(overlay.backend().allocations(), 4);
        assert_eq!(overlay.layers().count(), LayerRole::COUNT);

        let empty = overlay.layer(LayerRole::MissionTwo).expect("slot exists");
        assert!(!empty.has_asset());
        assert!(empty.render_target().is_none());
        assert!(overlay.startup_failures().is_empty());
    }

    #[test]
    fn test_alignment_passed_to_backend() {
        let mut sdk = sdk();
        let overlay = overlay(MockBackend::default(), &mut sdk);
        assert!(overlay.backend().calls.contains(&BackendCall::Attach(
            LayerRole::AmmoCounter,
            crate::fit::Alignment::BottomRight
        )));
    }

    #[test]
    fn test_direct_to_screen_has_no_targets() {
        let mut sdk = sdk();
        let backend = MockBackend::direct();
        let mut overlay = overlay(backend, &mut sdk);

        let report = overlay.step(Resolution::new(800, 600), at(0.5, 0.5), 0.016);
        assert!(report.reallocated.is_empty());
        assert_eq!(overlay.backend().allocations(), 0);
        assert!(overlay.draw_commands().is_empty());
    }

    #[test]
    fn test_pointer_move_only_on_change() {
        let mut sdk = sdk();
        let recorder = sdk.recorder(HEALTH);
        let mut overlay = overlay(MockBackend::default(), &mut sdk);

        let first = overlay.step(Resolution::hd720(), at(0.5, 0.5), 0.016);
        assert_eq!(first.moved.len(), 4);
        let second = overlay.step(Resolution::hd720(), at(0.5, 0.5), 0.016);
        assert!(second.moved.is_empty());
        let third = overlay.step(Resolution::hd720(), at(0.6, 0.5), 0.016);
        assert_eq!(third.moved.len(), 4);

        assert_eq!(recorder.moves(), 2);
    }

    #[test]
    fn test_pointer_local_coordinates_per_layer() {
        let mut sdk = sdk();
        let mission = sdk.recorder(MISSION);
        let health = sdk.recorder(HEALTH);
        let mut overlay = overlay(MockBackend::default(), &mut sdk);

        // Top-right pixel of a 1280x720 viewport
        overlay.step(Resolution::hd720(), at(1.0, 1.0), 0.0);

        assert_eq!(mission.received()[0], Received::Move(Vec2::new(1280.0, 0.0)));
        assert_eq!(health.received()[0], Received::Move(Vec2::new(200.0, 0.0)));
    }

    #[test]
    fn test_press_and_release() {
        let mut sdk = sdk();
        let recorder = sdk.recorder(AMMO);
        let mut overlay = overlay(MockBackend::default(), &mut sdk);
        let here = Vec2::new(0.2, 0.2);

        let down = overlay.step(Resolution::hd720(), PointerInput::new(here, true), 0.0);
        let held = overlay.step(Resolution::hd720(), PointerInput::new(here, true), 0.0);
        let up = overlay.step(Resolution::hd720(), PointerInput::new(here, false), 0.0);
        let idle = overlay.step(Resolution::hd720(), PointerInput::new(here, false), 0.0);

        assert!(down.pointer_down && !down.pointer_up);
        assert!(!held.pointer_down && !held.pointer_up);
        assert!(up.pointer_up && !up.pointer_down);
        assert!(!idle.pointer_down && !idle.pointer_up);

        let received = recorder.received();
        let downs = received.iter().filter(|r| matches!(r, Received::Down(_))).count();
        let ups = received.iter().filter(|r| matches!(r, Received::Up(_))).count();
        assert_eq!((downs, ups), (1, 1));
    }

    #[test]
    fn test_advance_then_events_in_slot_order() {
        let mut sdk = sdk();
        let mission = sdk.recorder(MISSION);
        let ammo = sdk.recorder(AMMO);
        let mut overlay = overlay(MockBackend::default(), &mut sdk);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        overlay.set_event_listener(move |event| sink.borrow_mut().push(event));

        ammo.emit(ReportedEvent::new("reload_tap"));
        mission.emit(
            ReportedEvent::new("checked").with_property("index", EventProperty::Number(0.0)),
        );
        mission.emit(ReportedEvent::new("pulse"));

        let report = overlay.step(Resolution::hd720(), at(0.1, 0.1), 0.25);
        assert_eq!(report.events_dispatched, 3);

        let names: Vec<String> = seen.borrow().iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["checked", "pulse", "reload_tap"]);
        assert_eq!(
            seen.borrow()[0].properties.get("index"),
            Some(&EventProperty::Number(0.0))
        );
        assert!(mission.received().contains(&Received::Advance(0.25)));

        let again = overlay.step(Resolution::hd720(), at(0.1, 0.1), 0.25);
        assert_eq!(again.events_dispatched, 0);
    }

    #[test]
    fn test_resize_once_per_change() {
        let mut sdk = sdk();
        let mut overlay = overlay(MockBackend::default(), &mut sdk);
        assert_eq!(overlay.backend().allocations(), 4);

        for _ in 0..3 {
            let report = overlay.step(Resolution::hd720(), at(0.0, 0.0), 0.016);
            assert!(report.reallocated.is_empty());
        }

        let bigger = Resolution::new(1920, 1080);
        let report = overlay.step(bigger, at(0.0, 0.0), 0.016);
        assert_eq!(report.reallocated.len(), 4);
        overlay.step(bigger, at(0.0, 0.0), 0.016);
        overlay.step(bigger, at(0.0, 0.0), 0.016);

        assert_eq!(overlay.backend().allocations(), 8);
        assert_eq!(overlay.backend().releases().len(), 4);
    }

    #[test]
    fn test_minimized_viewport_keeps_layers() {
        let mut sdk = sdk();
        let mut overlay = overlay(MockBackend::default(), &mut sdk);

        let minimized = overlay.step(Resolution::new(0, 0), at(0.5, 0.5), 0.016);
        assert!(minimized.failures.is_empty());
        assert!(minimized.reallocated.is_empty());
        assert!(overlay.draw_commands().is_empty());
        assert!(overlay.layers().all(|l| !l.has_asset() || l.is_drawable()));
        assert!(overlay.backend().releases().is_empty());

        let restored = overlay.step(Resolution::new(1024, 768), at(0.5, 0.5), 0.016);
        assert!(restored.failures.is_empty());
        assert_eq!(restored.reallocated.len(), 4);
        assert_eq!(overlay.draw_commands().len(), 4);
    }

    #[test]
    fn test_minimized_startup_allocates_later() {
        let mut sdk = sdk();
        let overlay_config = config();
        let mut overlay = OverlayCoordinator::new(
            MockBackend::default(),
            &mut sdk,
            &overlay_config,
            Resolution::new(1280, 0),
        );
        assert!(overlay.startup_failures().is_empty());
        assert_eq!(overlay.backend().allocations(), 0);

        let report = overlay.step(Resolution::hd720(), at(0.5, 0.5), 0.016);
        assert_eq!(report.reallocated.len(), 4);
        assert_eq!(overlay.draw_commands().len(), 4);
    }

    #[test]
    fn test_allocation_failure_isolated() {
        let mut sdk = sdk();
        let backend = MockBackend::failing_after(4);
        let mut overlay = overlay(backend, &mut sdk);
        let health = sdk.recorder(HEALTH);

        // Every resize now fails
        let report = overlay.step(Resolution::new(800, 600), at(0.3, 0.3), 0.1);
        assert_eq!(report.failures.len(), 4);
        assert!(overlay.draw_commands().is_empty());

        // Input and time still flow
        assert!(health.received().contains(&Received::Advance(0.1)));

        let later = overlay.step(Resolution::new(640, 480), at(0.3, 0.3), 0.1);
        assert!(later.failures.is_empty());
        assert!(later.reallocated.is_empty());
    }

    #[test]
    fn test_startup_allocation_failure() {
        let mut sdk = sdk();
        let backend = MockBackend::failing_after(2);
        let overlay = overlay(backend, &mut sdk);

        assert_eq!(overlay.startup_failures().len(), 2);
        assert_eq!(overlay.draw_commands().len(), 2);
        assert!(overlay.layer(LayerRole::MissionOne).expect("slot").is_drawable());
        assert!(!overlay.layer(LayerRole::AmmoCounter).expect("slot").is_drawable());
    }

    #[test]
    fn test_broken_asset_leaves_slot_empty() {
        let mut sdk = MockSdk::default()
            .with_asset(MISSION)
            .with_asset(ALERT)
            .with_asset(HEALTH)
            .with_broken(AMMO);
        let mut overlay = overlay(MockBackend::default(), &mut sdk);

        assert_eq!(overlay.startup_failures().len(), 1);
        assert_eq!(overlay.startup_failures()[0].role(), LayerRole::AmmoCounter);
        assert!(!overlay.layer(LayerRole::AmmoCounter).expect("slot").has_asset());

        let report = overlay.step(Resolution::hd720(), at(0.5, 0.5), 0.016);
        assert_eq!(report.moved.len(), 3);
    }

    #[test]
    fn test_named_controls_pass_through() {
        let mut sdk = sdk();
        let mission = sdk.recorder(MISSION);
        let mut overlay = overlay(MockBackend::default(), &mut sdk);

        overlay
            .set_number(LayerRole::HealthGauge, NUMBER_HP, 7.0)
            .expect("hp exists");
        assert_eq!(overlay.number(LayerRole::HealthGauge, NUMBER_HP), Ok(7.0));

        overlay
            .fire_trigger(LayerRole::MissionOne, TRIGGER_CHECKED)
            .expect("trigger exists");
        assert!(mission
            .received()
            .contains(&Received::Trigger(TRIGGER_CHECKED.to_string())));

        assert!(matches!(
            overlay.fire_trigger(LayerRole::MissionOne, "nope"),
            Err(OverlayError::UnknownInput { .. })
        ));
        assert_eq!(
            overlay.set_number(LayerRole::MissionThree, NUMBER_HP, 1.0),
            Err(OverlayError::NoStateMachine {
                role: LayerRole::MissionThree
            })
        );
    }

    #[test]
    fn test_draw_commands_flip() {
        let mut sdk = sdk();
        let backend = MockBackend::flipping();
        let overlay = overlay(backend, &mut sdk);

        let commands = overlay.draw_commands();
        assert_eq!(commands.len(), 4);
        assert_eq!(commands[0].role, LayerRole::MissionOne);
        assert_eq!(commands[0].rect, Rect::new(0.0, 720.0, 1280.0, -720.0));
    }

    #[test]
    fn test_cleanup_runs_before_resize() {
        let mut sdk = sdk();
        let mut overlay = overlay(MockBackend::default(), &mut sdk);
        let handle = overlay.cleanup_handle();

        std::thread::spawn(move || {
            handle.release_texture(TextureHandle::new(99));
        })
        .join()
        .expect("worker panicked");

        let before = overlay.backend().calls.len();
        let report = overlay.step(Resolution::new(1024, 768), at(0.0, 0.0), 0.0);
        assert_eq!(report.cleanup_tasks, 1);
        assert_eq!(
            overlay.backend().calls[before],
            BackendCall::Release(TextureHandle::new(99))
        );
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut sdk = sdk();
        let mut overlay = overlay(MockBackend::default(), &mut sdk);
        overlay.cleanup_handle().release_texture(TextureHandle::new(42));

        overlay.teardown();

        let releases = overlay.backend().releases();
        assert_eq!(releases[0], TextureHandle::new(42));
        assert_eq!(releases.len(), 5);
        let detached = overlay
            .backend()
            .calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Detach(_)))
            .count();
        assert_eq!(detached, LayerRole::COUNT);

        let calls = overlay.backend().calls.len();
        overlay.teardown();
        let report = overlay.step(Resolution::hd720(), at(0.5, 0.5), 0.016);
        assert_eq!(report, StepReport::default());
        assert_eq!(overlay.backend().calls.len(), calls);
        assert!(overlay.is_torn_down());
    }
}
