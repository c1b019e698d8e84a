//! Error types for Drone Strike.

use thiserror::Error;

/// Top-level error type shared by the gameplay and overlay crates.
///
/// None of these ever abort a frame. Callers log them and degrade the
/// affected feature.
#[derive(Debug, Error)]
pub enum DroneError {
    /// A render resource could not be (re)allocated
    #[error("resource allocation failed: {0}")]
    ResourceAllocation(#[from] ResourceError),

    /// An expected external collaborator is absent
    #[error("missing collaborator: {0}")]
    MissingCollaborator(String),

    /// Operation attempted from a terminal or ineligible state
    #[error("transition ignored: {0}")]
    InvalidTransitionIgnored(String),
}

/// Render resource errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// Texture allocation failed
    #[error("texture allocation failed ({width}x{height}): {reason}")]
    TextureAlloc {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Backend-provided reason
        reason: String,
    },

    /// Attempted to size a target to an empty viewport
    #[error("viewport has zero area")]
    EmptyViewport,
}

/// Result type alias for Drone Strike operations.
pub type DroneResult<T> = Result<T, DroneError>;
