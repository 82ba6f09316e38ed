use serde::{Deserialize, Serialize};
use strum::{Display, FromRepr, IntoStaticStr};

/// Coarse game phase, read as a single byte from the HUD block.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
pub enum GamePhase {
    #[strum(serialize = "BOOT")]
    Boot = 0,
    #[strum(serialize = "TITLE")]
    Title = 1,
    #[strum(serialize = "FILE SELECT")]
    FileSelect = 2,
    #[strum(serialize = "LOADING")]
    Loading = 3,
    #[strum(serialize = "IN GAME")]
    InGame = 4,
    #[strum(serialize = "PAUSED")]
    Paused = 5,
    #[default]
    #[strum(serialize = "UNKNOWN")]
    Unknown = 0xFF,
}

impl GamePhase {
    /// Decode a raw byte. Unknown discriminants (including the 0xFF
    /// fill byte) are invalid readings, not a committable phase.
    pub fn from_raw(value: u8) -> Option<Self> {
        match Self::from_repr(value) {
            None | Some(Self::Unknown) => None,
            phase => phase,
        }
    }

    /// True while the player entity exists and draw batches can carry
    /// its geometry.
    pub fn is_gameplay(&self) -> bool {
        matches!(self, Self::InGame | Self::Paused)
    }
}

/// Current map, read as a single byte from the HUD block.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
pub enum GameMap {
    #[strum(serialize = "OVERWORLD")]
    Overworld = 0,
    #[strum(serialize = "VILLAGE")]
    Village = 1,
    #[strum(serialize = "DUNGEON")]
    Dungeon = 2,
    #[strum(serialize = "INTERIOR")]
    Interior = 3,
    #[strum(serialize = "CAVE")]
    Cave = 4,
    #[strum(serialize = "BOSS ARENA")]
    BossArena = 5,
    #[default]
    #[strum(serialize = "UNKNOWN")]
    Unknown = 0xFF,
}

impl GameMap {
    pub fn from_raw(value: u8) -> Option<Self> {
        match Self::from_repr(value) {
            None | Some(Self::Unknown) => None,
            map => map,
        }
    }
}
