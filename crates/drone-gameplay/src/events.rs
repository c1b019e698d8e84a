//! Event bus for inter-system communication.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use drone_common::EntityId;

use crate::combat::DamageSource;

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A laser left the drone
    ShotFired {
        /// Shooter
        entity_id: EntityId,
        /// Rounds left
        ammo: u32,
    },
    /// Magazine refilled
    Reloaded {
        /// Entity ID
        entity_id: EntityId,
    },
    /// Entity took damage
    Damaged {
        /// Entity ID
        entity_id: EntityId,
        /// Damage amount
        amount: u32,
        /// Damage source
        source: DamageSource,
        /// Health after the hit
        health: i32,
    },
    /// Entity destroyed
    Defeated {
        /// Entity ID
        entity_id: EntityId,
    },
    /// All objectives done
    MapCleared {
        /// Entity ID
        entity_id: EntityId,
    },
    /// A mission checkpoint was reached
    MissionCleared {
        /// Checklist slot
        index: usize,
    },
    /// The server alarm went off
    AlertRaised,
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: GameEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<GameEvent> {
        self.sender.clone()
    }
}
