//! Per-game memory layout profiles.
//!
//! A profile names the base addresses and struct offsets the tracker
//! reads. The defaults match the retail build; other revisions relocate
//! the HUD and scene blocks, so profiles can be loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memory::layout::{hud, player, scene};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutProfile {
    pub version: String,
    /// Base of the HUD status block.
    pub hud_block: u64,
    /// Base of the scene bookkeeping block.
    pub scene_block: u64,
    /// Offsets of the player's world position within its entity struct.
    pub player_x: u64,
    pub player_y: u64,
    pub player_z: u64,
}

impl Default for LayoutProfile {
    fn default() -> Self {
        Self {
            version: "retail".to_string(),
            hud_block: hud::BLOCK,
            scene_block: scene::BLOCK,
            player_x: player::POS_X,
            player_y: player::POS_Y,
            player_z: player::POS_Z,
        }
    }
}

impl LayoutProfile {
    pub fn is_valid(&self) -> bool {
        !self.version.is_empty() && self.hud_block != 0 && self.scene_block != 0
    }

    // Absolute addresses of the tracked fields.

    pub fn game_phase_addr(&self) -> u64 {
        self.hud_block + hud::GAME_PHASE
    }

    pub fn map_id_addr(&self) -> u64 {
        self.hud_block + hud::MAP_ID
    }

    pub fn area_code_addr(&self) -> u64 {
        self.hud_block + hud::AREA_CODE
    }

    pub fn entity_count_addr(&self) -> u64 {
        self.scene_block + scene::ENTITY_COUNT
    }

    pub fn enemy_count_addr(&self) -> u64 {
        self.scene_block + scene::ENEMY_COUNT
    }

    pub fn particle_count_addr(&self) -> u64 {
        self.scene_block + scene::PARTICLE_COUNT
    }

    pub fn player_ptr_addr(&self) -> u64 {
        self.scene_block + scene::PLAYER_PTR
    }
}

/// Load a layout profile from a JSON file.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<LayoutProfile> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Save a layout profile to a JSON file.
pub fn save_profile<P: AsRef<Path>>(path: P, profile: &LayoutProfile) -> Result<()> {
    let json = serde_json::to_string_pretty(profile)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        let profile = LayoutProfile::default();
        assert!(profile.is_valid());
        assert_eq!(profile.map_id_addr(), profile.game_phase_addr() + 1);
    }

    #[test]
    fn test_profile_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");

        let mut profile = LayoutProfile::default();
        profile.version = "1.04".to_string();
        profile.scene_block = 0x1D_0000;

        save_profile(&path, &profile).unwrap();
        let loaded = load_profile(&path).unwrap();
        assert_eq!(loaded.version, "1.04");
        assert_eq!(loaded.scene_block, 0x1D_0000);
        assert_eq!(loaded.hud_block, profile.hud_block);
    }

    #[test]
    fn test_zeroed_profile_is_invalid() {
        let profile = LayoutProfile {
            version: String::new(),
            hud_block: 0,
            scene_block: 0,
            player_x: 0,
            player_y: 0,
            player_z: 0,
        };
        assert!(!profile.is_valid());
    }
}
