//! Offscreen shadow surface.
//!
//! Owns the fallback shadow's pixel buffer and the knobs the host UI
//! pokes at. Setters only mark the surface dirty; regeneration happens
//! on an explicit `update()` so the host controls when the (relatively
//! expensive) rebuild runs.

use tracing::debug;

use crate::config::UmbraConfig;
use crate::error::Result;
use crate::shadow::blob;

pub struct ShadowSurface {
    pixels: Option<Vec<u8>>,
    size: u32,
    intensity: f32,
    enabled: bool,
    dynamic_enabled: bool,
    needs_update: bool,
}

impl ShadowSurface {
    /// Create an uninitialized surface; call [`init`](Self::init)
    /// before sampling it.
    pub fn new(config: &UmbraConfig) -> Self {
        Self {
            pixels: None,
            size: blob::clamp_size(config.shadow_size),
            intensity: config.intensity.clamp(0.0, 1.0),
            enabled: true,
            dynamic_enabled: config.dynamic_capture,
            needs_update: true,
        }
    }

    /// Allocate the pixel buffer. Safe to call again after
    /// [`destroy`](Self::destroy).
    pub fn init(&mut self) -> Result<()> {
        self.needs_update = true;
        self.update()
    }

    /// Release the pixel buffer. Idempotent: destroying an already
    /// destroyed surface is a no-op.
    pub fn destroy(&mut self) {
        if self.pixels.take().is_some() {
            debug!("Shadow surface destroyed");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.pixels.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.needs_update = true;
        }
    }

    pub fn dynamic_enabled(&self) -> bool {
        self.dynamic_enabled
    }

    pub fn set_dynamic_enabled(&mut self, enabled: bool) {
        self.dynamic_enabled = enabled;
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        let intensity = intensity.clamp(0.0, 1.0);
        if self.intensity != intensity {
            self.intensity = intensity;
            self.needs_update = true;
        }
    }

    pub fn shadow_size(&self) -> u32 {
        self.size
    }

    /// Requested sizes are clamped into the blob generator's safe
    /// range; the buffer itself is reallocated on the next `update()`.
    pub fn set_shadow_size(&mut self, size: u32) {
        let size = blob::clamp_size(size);
        if self.size != size {
            self.size = size;
            self.needs_update = true;
        }
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Regenerate the pixel buffer if anything changed since the last
    /// update. Allocate-then-swap: on failure the previous buffer and
    /// size remain in place.
    pub fn update(&mut self) -> Result<()> {
        if !self.needs_update && self.pixels.is_some() {
            return Ok(());
        }
        let pixels = blob::generate(self.size, self.intensity)?;
        self.pixels = Some(pixels);
        self.needs_update = false;
        debug!(
            "Shadow surface updated: {}x{} at intensity {:.2}",
            self.size, self.size, self.intensity
        );
        Ok(())
    }

    /// The current pixel buffer, or `None` before init / after destroy.
    pub fn pixels(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }
}
