mod committed;
mod enums;
mod tracker;

pub use committed::{Committed, DebouncedValue};
pub use enums::{GameMap, GamePhase};
pub use tracker::{GameStateTracker, TrackedGameState};
