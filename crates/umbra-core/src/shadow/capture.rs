//! Per-frame silhouette capture.
//!
//! The renderer is a black box: its draw batches carry no entity tags,
//! so the only way to find the player's geometry is to correlate each
//! batch's transform translation with the player position read out of
//! RAM. Batches that land within tolerance are projected into an
//! offscreen target as a flat black silhouette; when no correlation is
//! available the procedural blob serves as the shadow instead.
//!
//! The tolerance is a tuning constant, not a proof. Too tight and valid
//! player batches go unclassified, leaving the previous frame's
//! silhouette on screen; too loose and nearby scenery gets baked into
//! the shadow. Both failure modes are cosmetic and self-correct on the
//! next classified frame.

use tracing::{debug, trace};

use crate::config::UmbraConfig;
use crate::error::{Error, Result};
use crate::memory::ReadMemory;
use crate::profile::LayoutProfile;
use crate::shadow::blob;
use crate::shadow::surface::ShadowSurface;
use crate::state::TrackedGameState;

/// Fraction by which the batch bounding box is expanded before
/// projection, so the silhouette doesn't touch the texture border.
const PADDING_FRACTION: f32 = 0.15;

/// Per-frame classification progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Frame not started or no batch inspected yet.
    Idle,
    /// Batches inspected this frame, none classified as the player.
    AwaitingMatch,
    /// At least one batch classified; the target holds this frame's
    /// silhouette.
    Captured,
}

/// One draw call's worth of geometry. Borrowed from the render loop for
/// the duration of the call, never persisted.
pub struct CaptureBatch<'a> {
    /// Post-transform vertex positions; consecutive triplets form
    /// triangles.
    pub vertices: &'a [[f32; 3]],
    /// Translation column of the batch's active transform.
    pub translation: [f32; 3],
}

/// Which buffer the composite step should sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowSource {
    /// The captured silhouette target.
    Dynamic,
    /// The procedural radial blob.
    Procedural,
}

/// Bindable view of the shadow texture for the composite step.
pub struct ShadowTexture<'a> {
    pub source: ShadowSource,
    pub size: u32,
    pub pixels: &'a [u8],
}

/// Axis-aligned bounds of a batch in the X/Y plane.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    fn of(vertices: &[[f32; 3]]) -> Option<Self> {
        let mut iter = vertices.iter().filter(|v| v[0].is_finite() && v[1].is_finite());
        let first = iter.next()?;
        let mut bounds = Self {
            min_x: first[0],
            min_y: first[1],
            max_x: first[0],
            max_y: first[1],
        };
        for v in iter {
            bounds.min_x = bounds.min_x.min(v[0]);
            bounds.min_y = bounds.min_y.min(v[1]);
            bounds.max_x = bounds.max_x.max(v[0]);
            bounds.max_y = bounds.max_y.max(v[1]);
        }
        Some(bounds)
    }

    /// Expand by `fraction` of each dimension, then force a square
    /// aspect ratio around the same center.
    fn padded_square(self, fraction: f32) -> Self {
        let width = (self.max_x - self.min_x) * (1.0 + 2.0 * fraction);
        let height = (self.max_y - self.min_y) * (1.0 + 2.0 * fraction);
        // Degenerate batches (a point, a vertical sliver) still get a
        // non-zero region to land in.
        let side = width.max(height).max(1e-3);
        let cx = (self.min_x + self.max_x) / 2.0;
        let cy = (self.min_y + self.max_y) / 2.0;
        Self {
            min_x: cx - side / 2.0,
            min_y: cy - side / 2.0,
            max_x: cx + side / 2.0,
            max_y: cy + side / 2.0,
        }
    }

    /// Linearly map a vertex into pixel coordinates of a `size`-wide
    /// square target.
    fn to_pixels(&self, v: &[f32; 3], size: f32) -> (f32, f32) {
        let side = self.max_x - self.min_x;
        (
            (v[0] - self.min_x) / side * size,
            (v[1] - self.min_y) / side * size,
        )
    }
}

/// Offscreen RGBA8 render target for the captured silhouette.
struct SilhouetteTarget {
    pixels: Vec<u8>,
    size: u32,
}

impl SilhouetteTarget {
    fn empty() -> Self {
        Self {
            pixels: Vec::new(),
            size: 0,
        }
    }

    /// Allocate-then-swap resize; on failure the previous buffer and
    /// size stay in place.
    fn resize(&mut self, size: u32) -> Result<()> {
        let byte_count = (size as usize)
            .checked_mul(size as usize)
            .and_then(|n| n.checked_mul(blob::BYTES_PER_PIXEL))
            .ok_or(Error::AllocationFailure {
                requested: usize::MAX,
            })?;
        let pixels = vec![0u8; byte_count];
        self.pixels = pixels;
        self.size = size;
        Ok(())
    }

    fn release(&mut self) {
        self.pixels = Vec::new();
        self.size = 0;
    }

    fn is_allocated(&self) -> bool {
        !self.pixels.is_empty()
    }

    /// Clear to fully transparent.
    fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Rasterize a flat-shaded black triangle, accumulating alpha
    /// additively. No depth test.
    fn fill_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), alpha: u8) {
        let size = self.size as i64;
        let min_x = a.0.min(b.0).min(c.0).floor().max(0.0) as i64;
        let min_y = a.1.min(b.1).min(c.1).floor().max(0.0) as i64;
        let max_x = (a.0.max(b.0).max(c.0).ceil() as i64).min(size - 1);
        let max_y = (a.1.max(b.1).max(c.1).ceil() as i64).min(size - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let edge = |p: (f32, f32), q: (f32, f32), x: f32, y: f32| -> f32 {
            (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0)
        };

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let w0 = edge(b, c, px, py);
                let w1 = edge(c, a, px, py);
                let w2 = edge(a, b, px, py);
                // Accept both windings; the renderer makes no promises.
                let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                    || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                if inside {
                    let idx = ((y * size + x) as usize) * blob::BYTES_PER_PIXEL;
                    let dst = &mut self.pixels[idx + 3];
                    *dst = dst.saturating_add(alpha);
                }
            }
        }
    }
}

/// Correlates tracked state with the draw stream and serves the shadow
/// texture for compositing.
pub struct ShadowCaptureEngine {
    config: UmbraConfig,
    profile: LayoutProfile,
    surface: ShadowSurface,
    target: SilhouetteTarget,
    state: CaptureState,
    captured_this_frame: bool,
    captured_last_frame: bool,
}

impl ShadowCaptureEngine {
    pub fn new(config: UmbraConfig, profile: LayoutProfile) -> Self {
        let surface = ShadowSurface::new(&config);
        Self {
            config,
            profile,
            surface,
            target: SilhouetteTarget::empty(),
            state: CaptureState::Idle,
            captured_this_frame: false,
            captured_last_frame: false,
        }
    }

    /// Allocate the fallback surface and the silhouette target. Safe to
    /// call again after [`destroy`](Self::destroy).
    pub fn init(&mut self) -> Result<()> {
        self.surface.init()?;
        self.target.resize(self.surface.shadow_size())?;
        Ok(())
    }

    /// Release both pixel buffers. Idempotent.
    pub fn destroy(&mut self) {
        self.surface.destroy();
        self.target.release();
        self.captured_this_frame = false;
        self.captured_last_frame = false;
        self.state = CaptureState::Idle;
    }

    /// Frame-begin signal from the renderer.
    pub fn begin_frame(&mut self) {
        self.captured_last_frame = self.captured_this_frame;
        self.captured_this_frame = false;
        self.state = CaptureState::Idle;
    }

    /// Inspect one draw batch against the tracked player position.
    ///
    /// First match wins the clear: the target is wiped to transparent
    /// exactly once per frame, and every further classified batch
    /// accumulates into it so a multi-batch character composites
    /// whole.
    pub fn inspect_batch<R: ReadMemory>(
        &mut self,
        reader: &R,
        tracked: &TrackedGameState,
        batch: &CaptureBatch<'_>,
    ) {
        if self.state == CaptureState::Idle {
            self.state = CaptureState::AwaitingMatch;
        }
        if !self.surface.dynamic_enabled() || !self.target.is_allocated() {
            return;
        }
        let Some(player) = self.player_position(reader, tracked) else {
            return;
        };

        let dx = batch.translation[0] - player[0];
        let dy = batch.translation[1] - player[1];
        let dz = batch.translation[2] - player[2];
        let distance = (dx * dx + dy * dy + dz * dz).sqrt();
        if !(distance < self.config.match_tolerance) {
            trace!(
                "Batch at distance {:.2} not classified (tolerance {:.2})",
                distance, self.config.match_tolerance
            );
            return;
        }

        if !self.captured_this_frame {
            self.target.clear();
            self.captured_this_frame = true;
            self.state = CaptureState::Captured;
            debug!("Player batch classified at distance {:.2}", distance);
        }
        self.project(batch);
    }

    /// Select the texture the composite step samples this frame.
    ///
    /// The dynamic silhouette is served only when capture is enabled,
    /// the session has observed a valid player pointer, the pointer is
    /// currently non-zero, and this frame or the immediately preceding
    /// one classified a batch. Everything else falls back to the
    /// procedural blob. Returns `None` when the shadow is disabled or
    /// not initialized.
    pub fn shadow_texture(
        &self,
        tracked: &TrackedGameState,
        session_saw_player: bool,
    ) -> Option<ShadowTexture<'_>> {
        if !self.surface.is_enabled() {
            return None;
        }
        let fallback = self.surface.pixels()?;

        let dynamic = self.surface.dynamic_enabled()
            && session_saw_player
            && tracked.player_pointer != 0
            && (self.captured_this_frame || self.captured_last_frame)
            && self.target.is_allocated();

        if dynamic {
            Some(ShadowTexture {
                source: ShadowSource::Dynamic,
                size: self.target.size,
                pixels: &self.target.pixels,
            })
        } else {
            Some(ShadowTexture {
                source: ShadowSource::Procedural,
                size: self.surface.shadow_size(),
                pixels: fallback,
            })
        }
    }

    /// Apply pending setting changes: regenerate the fallback and, if
    /// the size changed, reallocate the silhouette target.
    pub fn update(&mut self) -> Result<()> {
        self.surface.update()?;
        if self.target.size != self.surface.shadow_size() {
            self.target.resize(self.surface.shadow_size())?;
        }
        Ok(())
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn captured_this_frame(&self) -> bool {
        self.captured_this_frame
    }

    /// Raw silhouette target contents (for upload or inspection).
    pub fn silhouette_pixels(&self) -> &[u8] {
        &self.target.pixels
    }

    // Setting accessors delegate to the surface; setters only mark it
    // dirty, regeneration waits for `update()`.

    pub fn is_enabled(&self) -> bool {
        self.surface.is_enabled()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.surface.set_enabled(enabled);
    }

    pub fn intensity(&self) -> f32 {
        self.surface.intensity()
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.surface.set_intensity(intensity);
    }

    pub fn shadow_size(&self) -> u32 {
        self.surface.shadow_size()
    }

    pub fn set_shadow_size(&mut self, size: u32) {
        self.surface.set_shadow_size(size);
    }

    pub fn dynamic_enabled(&self) -> bool {
        self.surface.dynamic_enabled()
    }

    pub fn set_dynamic_enabled(&mut self, enabled: bool) {
        self.surface.set_dynamic_enabled(enabled);
    }

    pub fn needs_update(&self) -> bool {
        self.surface.needs_update()
    }

    /// Dereference the tracked player pointer at the profile's X/Y/Z
    /// offsets. Every read is bounds-checked; any failure, or a
    /// non-finite coordinate (sentinel fills decode to NaN), means no
    /// position this batch.
    fn player_position<R: ReadMemory>(
        &self,
        reader: &R,
        tracked: &TrackedGameState,
    ) -> Option<[f32; 3]> {
        let pointer = tracked.player_pointer;
        if pointer == 0 || pointer < self.config.min_player_address {
            return None;
        }
        let x = reader.read_f32(pointer + self.profile.player_x).ok()?;
        let y = reader.read_f32(pointer + self.profile.player_y).ok()?;
        let z = reader.read_f32(pointer + self.profile.player_z).ok()?;
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return None;
        }
        Some([x, y, z])
    }

    fn project(&mut self, batch: &CaptureBatch<'_>) {
        let Some(bounds) = Bounds::of(batch.vertices) else {
            return;
        };
        let region = bounds.padded_square(PADDING_FRACTION);
        let size = self.target.size as f32;
        let alpha = (self.surface.intensity() * 255.0).round() as u8;

        for tri in batch.vertices.chunks_exact(3) {
            let a = region.to_pixels(&tri[0], size);
            let b = region.to_pixels(&tri[1], size);
            let c = region.to_pixels(&tri[2], size);
            self.target.fill_triangle(a, b, c, alpha);
        }
    }
}
