//! Seam to the vector-animation runtime.
//!
//! The overlay never looks inside an artboard. It loads one per layer, asks it
//! for a state machine, and then only forwards input, time, and named
//! control values.

use std::collections::BTreeMap;

use drone_common::AssetId;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the animation runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    /// No asset with this id
    #[error("asset not found: {0}")]
    AssetNotFound(AssetId),

    /// Runtime-specific load failure
    #[error("failed to load {asset}: {reason}")]
    Load {
        /// Asset being loaded
        asset: AssetId,
        /// Runtime-provided reason
        reason: String,
    },
}

/// Value attached to a reported event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventProperty {
    /// Boolean property
    Bool(bool),
    /// Numeric property
    Number(f32),
    /// String property
    String(String),
}

/// Semantic event emitted by a state machine while advancing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedEvent {
    /// Event name as authored
    pub name: String,
    /// Seconds between the event and the end of the advance that produced it
    pub seconds_delay: f32,
    /// Custom properties
    pub properties: BTreeMap<String, EventProperty>,
}

impl ReportedEvent {
    /// Creates an event with no properties.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            seconds_delay: 0.0,
            properties: BTreeMap::new(),
        }
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: EventProperty) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// A running state machine instance.
pub trait StateMachine {
    /// Fires the named trigger input. Returns `false` if it does not exist.
    fn fire_trigger(&mut self, name: &str) -> bool;
    /// Sets the named number input. Returns `false` if it does not exist.
    fn set_number(&mut self, name: &str, value: f32) -> bool;
    /// Reads the named number input.
    fn number(&self, name: &str) -> Option<f32>;
    /// Pointer moved to an artboard-local position.
    fn pointer_move(&mut self, local: Vec2);
    /// Pointer pressed at an artboard-local position.
    fn pointer_down(&mut self, local: Vec2);
    /// Pointer released at an artboard-local position.
    fn pointer_up(&mut self, local: Vec2);
    /// Advances animation time.
    fn advance(&mut self, dt: f32);
    /// Takes every event reported since the last call, in emission order.
    fn drain_reported_events(&mut self) -> Vec<ReportedEvent>;
}

/// A loaded artboard.
pub trait Artboard {
    /// Authored size in artboard units.
    fn size(&self) -> Vec2;
    /// Instantiates the default state machine, if the artboard has one.
    fn state_machine(&mut self) -> Option<Box<dyn StateMachine>>;
}

/// The animation runtime itself.
pub trait AnimationSdk {
    /// Loads an asset and returns its first artboard.
    fn load_asset(&mut self, id: &AssetId) -> Result<Box<dyn Artboard>, SdkError>;
}
