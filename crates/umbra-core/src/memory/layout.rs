//! Memory layout constants for the emulated console's RAM image.
//!
//! This module centralizes every raw offset and constant used to read
//! live game data out of the console's memory. Offsets inside the HUD
//! and scene blocks are relative to the block bases carried by a
//! [`LayoutProfile`](crate::profile::LayoutProfile); the defaults here
//! match the retail build of the game.

/// Total size of the console's RDRAM image (8 MiB).
pub const RAM_SIZE: usize = 8 * 1024 * 1024;

/// HUD status block: small bytes the game's own HUD renders from.
pub mod hud {
    /// Default base address of the HUD block.
    pub const BLOCK: u64 = 0x11_F200;

    /// Current game phase (byte, `GamePhase` discriminant).
    pub const GAME_PHASE: u64 = 0x0;
    /// Current map (byte, `GameMap` discriminant).
    pub const MAP_ID: u64 = 0x1;
    /// Area code byte pair; drives the host's location label.
    pub const AREA_CODE: u64 = 0x2;
}

/// Scene bookkeeping block: live object counters and the player slot.
pub mod scene {
    /// Word size (4 bytes / 32-bit integer)
    pub const WORD: u64 = 4;

    /// Default base address of the scene block.
    pub const BLOCK: u64 = 0x1C_84A0;

    pub const ENTITY_COUNT: u64 = 0;
    pub const ENEMY_COUNT: u64 = WORD;
    pub const PARTICLE_COUNT: u64 = WORD * 2;
    /// Pointer to the player's entity struct; zero outside gameplay.
    pub const PLAYER_PTR: u64 = WORD * 4;
}

/// Offsets into the player entity struct (each an f32 world coordinate).
pub mod player {
    pub const POS_X: u64 = 0x24;
    pub const POS_Y: u64 = 0x28;
    pub const POS_Z: u64 = 0x2C;

    /// Entity structs never live below this address; smaller non-zero
    /// pointer values are stale slots left over from scene teardown.
    pub const MIN_PLAUSIBLE_PTR: u64 = 0x1000;
}

/// Known allocator fill patterns.
///
/// The game's allocator stamps freed blocks with a fixed fill, and
/// unmapped reads come back all-ones. Either pattern means the value is
/// garbage, as opposed to a legitimate zero.
pub mod sentinel {
    pub const UNMAPPED_FILL: u32 = 0xFFFF_FFFF;
    pub const DEBUG_FILL: u32 = 0xCDCD_CDCD;
}

/// Plausible maxima for the scene counters.
///
/// The engine hard-caps its object pools well below these; anything
/// larger is a torn or stale read, not a real count.
pub mod plausible {
    pub const MAX_ENTITIES: u32 = 1024;
    pub const MAX_ENEMIES: u32 = 256;
    pub const MAX_PARTICLES: u32 = 4096;
}

/// Timing constants for polling and commit suppression.
pub mod timing {
    /// Ticks after a phase/map transition during which commits are
    /// suppressed so the game's own object culling can settle.
    pub const TRANSITION_COOLDOWN_TICKS: u32 = 30;

    /// The area-code byte pair is sampled at this coarser cadence.
    pub const LABEL_POLL_INTERVAL_TICKS: u64 = 180;

    /// Consecutive identical samples required before the area code commits.
    pub const LABEL_STABILITY_THRESHOLD: u32 = 2;
}
