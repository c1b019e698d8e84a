//! Offscreen render targets that track the viewport size.

use drone_common::{Resolution, ResourceError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cleanup::CleanupHandle;
use crate::fit::Alignment;
use crate::layer::LayerRole;

/// Opaque handle to a backend texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextureHandle(u64);

impl TextureHandle {
    /// Creates a handle from a backend id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the backend id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Graphics backend the overlay draws through.
pub trait RenderBackend {
    /// Whether layers can be drawn straight to the screen without an
    /// intermediate texture.
    fn supports_drawing_to_screen(&self) -> bool;
    /// Whether the final blit must flip the vertical axis.
    fn flip_y(&self) -> bool;
    /// Creates a draw pipeline for a layer, pinned to `alignment`.
    fn attach_layer(&mut self, role: LayerRole, alignment: Alignment);
    /// Removes a layer's draw pipeline.
    fn detach_layer(&mut self, role: LayerRole);
    /// Allocates a color target.
    fn allocate_target(&mut self, size: Resolution) -> Result<TextureHandle, ResourceError>;
    /// Points a layer's draw pipeline at `texture`.
    fn bind_target(&mut self, role: LayerRole, texture: TextureHandle);
    /// Frees a color target.
    fn release_target(&mut self, texture: TextureHandle);
}

/// Render target that follows the viewport size.
///
/// The cached size makes the per-step check O(1); the texture is only
/// reallocated when the viewport actually changed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenderTarget {
    texture: Option<TextureHandle>,
    size: Option<Resolution>,
}

impl RenderTarget {
    /// Creates a target with no texture yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            texture: None,
            size: None,
        }
    }

    /// Current texture.
    #[must_use]
    pub const fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    /// Size of the current texture.
    #[must_use]
    pub const fn size(&self) -> Option<Resolution> {
        self.size
    }

    /// Reallocates the texture if `viewport` differs from the cached size.
    ///
    /// Returns `Ok(true)` when a new texture was bound. On error the old
    /// texture is already released and the target is left empty.
    pub fn ensure_size<B: RenderBackend + ?Sized>(
        &mut self,
        role: LayerRole,
        viewport: Resolution,
        backend: &mut B,
    ) -> Result<bool, ResourceError> {
        if self.size == Some(viewport) && self.texture.is_some() {
            return Ok(false);
        }

        self.release(backend);
        if viewport.is_empty() {
            return Err(ResourceError::EmptyViewport);
        }

        let texture = backend.allocate_target(viewport)?;
        backend.bind_target(role, texture);
        self.texture = Some(texture);
        self.size = Some(viewport);
        debug!(?role, width = viewport.width, height = viewport.height, "Render target allocated");
        Ok(true)
    }

    /// Frees the texture now. Must be called from the step loop.
    pub fn release<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(texture) = self.texture.take() {
            backend.release_target(texture);
        }
        self.size = None;
    }
}

impl<B: RenderBackend + 'static> CleanupHandle<B> {
    /// Queues a texture release for the next step.
    pub fn release_texture(&self, texture: TextureHandle) -> bool {
        self.enqueue(move |backend: &mut B| backend.release_target(texture))
    }
}
