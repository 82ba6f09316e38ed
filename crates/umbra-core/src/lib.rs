//! # umbra-core
//!
//! Shadow-overlay core for an emulated console.
//!
//! The emulator host owns an 8 MiB RAM image and a renderer; this crate
//! overlays them with two derived features:
//! - a validated, debounced view of live game counters and pointers,
//!   resilient to the host mutating or invalidating the buffer between
//!   polls, and
//! - a per-frame silhouette capture that correlates tracked state with
//!   the renderer's draw stream, falling back to a procedural radial
//!   shadow when no correlation is available.
//!
//! This crate provides:
//! - Bounds-checked memory access over a weak view of the host's RAM
//!   (`AddressSpace`, `MemoryAccessor`)
//! - Validated state polling with cooldown and debounce
//!   (`GameStateTracker`)
//! - Procedural shadow generation and silhouette capture
//!   (`ShadowCaptureEngine`, `ShadowSurface`)
//! - Per-game memory layout profiles (`LayoutProfile`)
//!
//! ## Example
//!
//! ```ignore
//! use umbra_core::{
//!     AddressSpace, CaptureBatch, GameStateTracker, LayoutProfile, MemoryAccessor,
//!     ShadowCaptureEngine, UmbraConfig,
//! };
//!
//! let config = UmbraConfig::default();
//! let accessor = MemoryAccessor::new(AddressSpace::attach(&host_ram));
//! let mut tracker = GameStateTracker::new(config.clone(), LayoutProfile::default());
//! let mut engine = ShadowCaptureEngine::new(config, LayoutProfile::default());
//! engine.init()?;
//!
//! // Per frame, on the render thread:
//! tracker.poll(&accessor);
//! engine.begin_frame();
//! for batch in draw_batches {
//!     engine.inspect_batch(&accessor, &tracker.state(), &batch);
//! }
//! let shadow = engine.shadow_texture(&tracker.state(), tracker.ever_saw_player());
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod profile;
pub mod shadow;
pub mod state;

pub use config::{UmbraConfig, UmbraConfigBuilder};
pub use error::{Error, Result};
pub use memory::{AddressSpace, MemoryAccessor, ReadMemory, is_sentinel};
pub use profile::{LayoutProfile, load_profile, save_profile};
pub use shadow::{
    CaptureBatch, CaptureState, ShadowCaptureEngine, ShadowSource, ShadowSurface, ShadowTexture,
};
pub use state::{
    Committed, DebouncedValue, GameMap, GamePhase, GameStateTracker, TrackedGameState,
};
