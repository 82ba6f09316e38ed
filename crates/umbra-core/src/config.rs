//! Runtime configuration for the overlay.
//!
//! The host's own config loader supplies these values in production;
//! the defaults here are the tuned constants for the retail game. The
//! struct is serde-derived so the CLI (and any host that wants to) can
//! load it from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memory::layout::{player, timing};
use crate::shadow::blob;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UmbraConfig {
    /// Attempt silhouette capture; when false the procedural blob is
    /// always served.
    pub dynamic_capture: bool,
    /// Shadow opacity in [0, 1].
    pub intensity: f32,
    /// Shadow texture edge length in pixels; clamped to the blob
    /// generator's safe range before any allocation.
    pub shadow_size: u32,
    /// Ticks of commit suppression after a phase/map transition.
    pub transition_cooldown: u32,
    /// Cadence (in ticks) at which the area-code byte pair is sampled.
    pub label_poll_interval: u64,
    /// Consecutive identical samples required before the area code commits.
    pub stability_threshold: u32,
    /// Maximum distance (world units) between a batch's translation and
    /// the tracked player position for the batch to classify as player
    /// geometry. Unvalidated tuning constant; too tight leaves the
    /// silhouette stale, too loose misclassifies scenery.
    pub match_tolerance: f32,
    /// Non-zero player pointers below this address are treated as stale.
    pub min_player_address: u64,
}

impl Default for UmbraConfig {
    fn default() -> Self {
        Self {
            dynamic_capture: true,
            intensity: 0.7,
            shadow_size: blob::DEFAULT_SIZE,
            transition_cooldown: timing::TRANSITION_COOLDOWN_TICKS,
            label_poll_interval: timing::LABEL_POLL_INTERVAL_TICKS,
            stability_threshold: timing::LABEL_STABILITY_THRESHOLD,
            match_tolerance: 8.0,
            min_player_address: player::MIN_PLAUSIBLE_PTR,
        }
    }
}

impl UmbraConfig {
    /// Create a new configuration builder
    pub fn builder() -> UmbraConfigBuilder {
        UmbraConfigBuilder::default()
    }

    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Builder for UmbraConfig
#[derive(Debug, Clone, Default)]
pub struct UmbraConfigBuilder {
    dynamic_capture: Option<bool>,
    intensity: Option<f32>,
    shadow_size: Option<u32>,
    transition_cooldown: Option<u32>,
    label_poll_interval: Option<u64>,
    stability_threshold: Option<u32>,
    match_tolerance: Option<f32>,
    min_player_address: Option<u64>,
}

impl UmbraConfigBuilder {
    pub fn dynamic_capture(mut self, enabled: bool) -> Self {
        self.dynamic_capture = Some(enabled);
        self
    }

    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = Some(intensity);
        self
    }

    pub fn shadow_size(mut self, size: u32) -> Self {
        self.shadow_size = Some(size);
        self
    }

    pub fn transition_cooldown(mut self, ticks: u32) -> Self {
        self.transition_cooldown = Some(ticks);
        self
    }

    pub fn label_poll_interval(mut self, ticks: u64) -> Self {
        self.label_poll_interval = Some(ticks);
        self
    }

    pub fn stability_threshold(mut self, samples: u32) -> Self {
        self.stability_threshold = Some(samples);
        self
    }

    pub fn match_tolerance(mut self, world_units: f32) -> Self {
        self.match_tolerance = Some(world_units);
        self
    }

    pub fn min_player_address(mut self, address: u64) -> Self {
        self.min_player_address = Some(address);
        self
    }

    /// Build the configuration
    pub fn build(self) -> UmbraConfig {
        let default = UmbraConfig::default();
        UmbraConfig {
            dynamic_capture: self.dynamic_capture.unwrap_or(default.dynamic_capture),
            intensity: self.intensity.unwrap_or(default.intensity),
            shadow_size: self.shadow_size.unwrap_or(default.shadow_size),
            transition_cooldown: self
                .transition_cooldown
                .unwrap_or(default.transition_cooldown),
            label_poll_interval: self
                .label_poll_interval
                .unwrap_or(default.label_poll_interval),
            stability_threshold: self
                .stability_threshold
                .unwrap_or(default.stability_threshold),
            match_tolerance: self.match_tolerance.unwrap_or(default.match_tolerance),
            min_player_address: self
                .min_player_address
                .unwrap_or(default.min_player_address),
        }
    }
}
