//! Overlay error types.

use drone_common::{DroneError, ResourceError};
use thiserror::Error;

use crate::layer::LayerRole;
use crate::sdk::SdkError;

/// Failures isolated to a single overlay layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    /// Render target (re)allocation failed; the layer stops drawing
    #[error("layer {role:?}: {source}")]
    RenderTarget {
        /// Affected layer
        role: LayerRole,
        /// Backend failure
        source: ResourceError,
    },

    /// The layer's asset could not be loaded; the slot stays empty
    #[error("layer {role:?}: {source}")]
    Asset {
        /// Affected layer
        role: LayerRole,
        /// Runtime failure
        source: SdkError,
    },

    /// The layer has no state machine to receive a named control
    #[error("layer {role:?} has no state machine")]
    NoStateMachine {
        /// Affected layer
        role: LayerRole,
    },

    /// The state machine has no input with that name
    #[error("layer {role:?} has no input named {name}")]
    UnknownInput {
        /// Affected layer
        role: LayerRole,
        /// Input name
        name: String,
    },
}

impl OverlayError {
    /// Layer the failure belongs to.
    #[must_use]
    pub const fn role(&self) -> LayerRole {
        match self {
            Self::RenderTarget { role, .. }
            | Self::Asset { role, .. }
            | Self::NoStateMachine { role }
            | Self::UnknownInput { role, .. } => *role,
        }
    }
}

impl From<OverlayError> for DroneError {
    fn from(err: OverlayError) -> Self {
        match err {
            OverlayError::RenderTarget { source, .. } => Self::ResourceAllocation(source),
            other => Self::MissingCollaborator(other.to_string()),
        }
    }
}

/// Result type for overlay operations.
pub type OverlayResult<T> = Result<T, OverlayError>;
