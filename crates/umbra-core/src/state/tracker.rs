//! Live game state tracking.
//!
//! `GameStateTracker::poll()` reads the raw counters and pointers out
//! of the RAM image once per tick, validates them, and folds them into
//! a committed view. Every failure path is silent: a read that comes
//! back unreadable, sentinel-filled, or implausible leaves the
//! previously committed value untouched. Dependent cosmetic output
//! keeps showing the last valid value rather than flickering to zero
//! whenever the host invalidates memory mid-frame.

use tracing::{debug, info, trace};

use crate::config::UmbraConfig;
use crate::memory::layout::plausible;
use crate::memory::{ReadMemory, is_sentinel};
use crate::profile::LayoutProfile;
use crate::state::committed::{Committed, DebouncedValue};
use crate::state::enums::{GameMap, GamePhase};

/// Snapshot of the committed view, handed to consumers.
#[derive(Debug, Clone)]
pub struct TrackedGameState {
    pub phase: GamePhase,
    pub map: GameMap,
    pub entity_count: u32,
    pub enemy_count: u32,
    pub particle_count: u32,
    /// Address of the player's entity struct; zero outside gameplay.
    pub player_pointer: u64,
    /// Debounced area code byte pair; drives the host's location label.
    pub area_code: u16,
    pub frames_since_phase_change: u64,
    pub cooldown_remaining: u32,
}

/// Polls memory on a schedule and retains validated state.
///
/// Created once at startup and kept for the process lifetime; only
/// `poll()` mutates it.
pub struct GameStateTracker {
    config: UmbraConfig,
    profile: LayoutProfile,
    tick: u64,
    phase: Committed<GamePhase>,
    map: Committed<GameMap>,
    entity_count: Committed<u32>,
    enemy_count: Committed<u32>,
    particle_count: Committed<u32>,
    player_pointer: Committed<u64>,
    area_code: DebouncedValue<u16>,
    frames_since_phase_change: u64,
    cooldown_remaining: u32,
    ever_saw_player: bool,
}

impl GameStateTracker {
    pub fn new(config: UmbraConfig, profile: LayoutProfile) -> Self {
        // Start inside a cooldown window: the host is still populating
        // its object pools when we come up, and those first reads are
        // the least trustworthy of the whole session.
        let initial_cooldown = config.transition_cooldown.max(1);
        let stability = config.stability_threshold;
        Self {
            config,
            profile,
            tick: 0,
            phase: Committed::new(GamePhase::Unknown),
            map: Committed::new(GameMap::Unknown),
            entity_count: Committed::new(0),
            enemy_count: Committed::new(0),
            particle_count: Committed::new(0),
            player_pointer: Committed::new(0),
            area_code: DebouncedValue::new(0, stability),
            frames_since_phase_change: 0,
            cooldown_remaining: initial_cooldown,
            ever_saw_player: false,
        }
    }

    /// Run one poll tick. Never fails; invalid readings retain the
    /// committed state.
    pub fn poll<R: ReadMemory>(&mut self, reader: &R) {
        self.tick += 1;
        self.frames_since_phase_change = self.frames_since_phase_change.saturating_add(1);
        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
        }
        // Suppression for this tick is decided before any transition
        // detected below re-arms the window: a transition at tick T
        // suppresses T+1..T+cooldown-1 and resumes at T+cooldown.
        let suppressed = self.cooldown_remaining > 0;

        // Reads still occur during cooldown; their commits are discarded.
        let phase = self
            .read_u8_checked(reader, self.profile.game_phase_addr(), "game_phase")
            .and_then(GamePhase::from_raw);
        let map = self
            .read_u8_checked(reader, self.profile.map_id_addr(), "map_id")
            .and_then(GameMap::from_raw);

        if !suppressed {
            let phase_changed = matches!(phase, Some(p) if p != self.phase.get());
            let map_changed = matches!(map, Some(m) if m != self.map.get());
            self.phase.apply(phase);
            self.map.apply(map);
            if phase_changed || map_changed {
                info!(
                    "Transition committed: {} / {} (suppressing commits for {} ticks)",
                    self.phase.get(),
                    self.map.get(),
                    self.config.transition_cooldown
                );
                self.frames_since_phase_change = 0;
                self.cooldown_remaining = self.config.transition_cooldown;
            }
        }

        let entity = self.read_counter(
            reader,
            self.profile.entity_count_addr(),
            "entity_count",
            plausible::MAX_ENTITIES,
        );
        let enemy = self.read_counter(
            reader,
            self.profile.enemy_count_addr(),
            "enemy_count",
            plausible::MAX_ENEMIES,
        );
        let particle = self.read_counter(
            reader,
            self.profile.particle_count_addr(),
            "particle_count",
            plausible::MAX_PARTICLES,
        );
        let pointer = self.read_player_pointer(reader);

        if !suppressed {
            self.entity_count.apply(entity);
            self.enemy_count.apply(enemy);
            self.particle_count.apply(particle);
            self.player_pointer.apply(pointer);
        }

        // The label byte pair changes rarely and is displayed verbatim,
        // so it gets the coarser cadence plus debouncing on top of the
        // usual validity checks.
        if self.tick % self.config.label_poll_interval.max(1) == 0
            && let Ok(raw) = reader.read_u16(self.profile.area_code_addr())
            && !is_sentinel_u16(raw)
            && !suppressed
            && self.area_code.observe(raw)
        {
            debug!("Area code committed: {raw:#06x}");
        }
    }

    /// The committed view after the most recent poll.
    pub fn state(&self) -> TrackedGameState {
        TrackedGameState {
            phase: self.phase.get(),
            map: self.map.get(),
            entity_count: self.entity_count.get(),
            enemy_count: self.enemy_count.get(),
            particle_count: self.particle_count.get(),
            player_pointer: self.player_pointer.get(),
            area_code: self.area_code.get(),
            frames_since_phase_change: self.frames_since_phase_change,
            cooldown_remaining: self.cooldown_remaining,
        }
    }

    /// True once any poll this session has observed a valid, non-zero
    /// player pointer (observation, not commit: cooldown does not
    /// unsee a pointer).
    pub fn ever_saw_player(&self) -> bool {
        self.ever_saw_player
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    fn read_u8_checked<R: ReadMemory>(
        &self,
        reader: &R,
        address: u64,
        name: &'static str,
    ) -> Option<u8> {
        match reader.read_u8(address) {
            Ok(raw) => Some(raw),
            Err(e) => {
                trace!("Discarding unreadable {}: {}", name, e);
                None
            }
        }
    }

    /// Read and validate one scene counter. Returns `None` for
    /// anything that must not be committed.
    fn read_counter<R: ReadMemory>(
        &self,
        reader: &R,
        address: u64,
        name: &'static str,
        max: u32,
    ) -> Option<u32> {
        let raw = match reader.read_i32(address) {
            Ok(raw) => raw,
            Err(e) => {
                trace!("Discarding unreadable {}: {}", name, e);
                return None;
            }
        };
        if is_sentinel(raw as u32) {
            trace!("Discarding sentinel {}: {:#010x}", name, raw as u32);
            return None;
        }
        if raw < 0 || raw as u32 > max {
            trace!("Discarding implausible {}: {} (max {})", name, raw, max);
            return None;
        }
        Some(raw as u32)
    }

    fn read_player_pointer<R: ReadMemory>(&mut self, reader: &R) -> Option<u64> {
        let raw = match reader.read_u32(self.profile.player_ptr_addr()) {
            Ok(raw) => raw,
            Err(e) => {
                trace!("Discarding unreadable player pointer: {}", e);
                return None;
            }
        };
        if is_sentinel(raw) {
            return None;
        }
        // Zero is a legitimate reading (no player entity, menus), not a
        // failure: it commits and later forces the shadow fallback.
        if raw == 0 {
            return Some(0);
        }
        let pointer = u64::from(raw);
        if pointer < self.config.min_player_address {
            trace!("Discarding stale player pointer below plausible range: {pointer:#x}");
            return None;
        }
        self.ever_saw_player = true;
        Some(pointer)
    }
}

fn is_sentinel_u16(value: u16) -> bool {
    // 16-bit views of the 32-bit fill patterns.
    value == 0xFFFF || value == 0xCDCD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryReader;
    use crate::memory::layout::sentinel;

    const CAPACITY: usize = 0x40_0000;

    fn test_config() -> UmbraConfig {
        UmbraConfig::builder()
            .label_poll_interval(1)
            .stability_threshold(2)
            .build()
    }

    fn gameplay_memory() -> MockMemoryReader {
        let profile = LayoutProfile::default();
        let mock = MockMemoryReader::with_capacity(CAPACITY);
        mock.set_u8(profile.game_phase_addr(), GamePhase::InGame as u8);
        mock.set_u8(profile.map_id_addr(), GameMap::Overworld as u8);
        mock.set_u32(profile.entity_count_addr(), 10);
        mock.set_u32(profile.enemy_count_addr(), 2);
        mock.set_u32(profile.particle_count_addr(), 100);
        mock.set_u32(profile.player_ptr_addr(), 0x2000);
        mock
    }

    /// Poll until the startup cooldown and the first committed
    /// transition's cooldown have both elapsed.
    fn warmed_tracker(mock: &MockMemoryReader) -> GameStateTracker {
        let mut tracker = GameStateTracker::new(test_config(), LayoutProfile::default());
        for _ in 0..60 {
            tracker.poll(mock);
        }
        assert_eq!(tracker.state().cooldown_remaining, 0);
        tracker
    }

    #[test]
    fn test_sentinel_read_retains_committed_counter() {
        let profile = LayoutProfile::default();
        let mock = gameplay_memory();
        let mut tracker = warmed_tracker(&mock);

        mock.set_u32(profile.entity_count_addr(), 50);
        tracker.poll(&mock);
        assert_eq!(tracker.state().entity_count, 50);

        mock.set_u32(profile.entity_count_addr(), sentinel::UNMAPPED_FILL);
        tracker.poll(&mock);
        assert_eq!(tracker.state().entity_count, 50);

        mock.set_u32(profile.entity_count_addr(), 55);
        tracker.poll(&mock);
        assert_eq!(tracker.state().entity_count, 55);
    }

    #[test]
    fn test_implausible_counter_is_not_committed() {
        let profile = LayoutProfile::default();
        let mock = gameplay_memory();
        let mut tracker = warmed_tracker(&mock);

        mock.set_u32(profile.enemy_count_addr(), plausible::MAX_ENEMIES + 1);
        tracker.poll(&mock);
        assert_eq!(tracker.state().enemy_count, 2);

        // Negative raw value is likewise implausible.
        mock.set_u32(profile.particle_count_addr(), (-5i32) as u32);
        tracker.poll(&mock);
        assert_eq!(tracker.state().particle_count, 100);
    }

    #[test]
    fn test_transition_suppresses_commits_for_cooldown_window() {
        let profile = LayoutProfile::default();
        let mock = gameplay_memory();
        let mut tracker = warmed_tracker(&mock);
        assert_eq!(tracker.state().entity_count, 10);

        // Map transition at tick T commits and re-arms the window.
        mock.set_u8(profile.map_id_addr(), GameMap::Dungeon as u8);
        mock.set_u32(profile.entity_count_addr(), 77);
        tracker.poll(&mock);
        let state = tracker.state();
        assert_eq!(state.map, GameMap::Dungeon);
        // The transition tick itself still commits the counters.
        assert_eq!(state.entity_count, 77);

        // T+1 .. T+29: counter changes are discarded.
        mock.set_u32(profile.entity_count_addr(), 88);
        for _ in 0..29 {
            tracker.poll(&mock);
            assert_eq!(tracker.state().entity_count, 77);
        }

        // T+30: commits resume.
        tracker.poll(&mock);
        assert_eq!(tracker.state().entity_count, 88);
    }

    #[test]
    fn test_initial_cooldown_is_nonzero() {
        let mock = gameplay_memory();
        let mut tracker = GameStateTracker::new(test_config(), LayoutProfile::default());
        assert!(tracker.state().cooldown_remaining > 0);

        tracker.poll(&mock);
        // Readable gameplay memory, but the startup window holds.
        assert_eq!(tracker.state().phase, GamePhase::Unknown);
        assert_eq!(tracker.state().entity_count, 0);
    }

    #[test]
    fn test_player_pointer_below_plausible_range_is_discarded() {
        let profile = LayoutProfile::default();
        let mock = gameplay_memory();
        let mut tracker = warmed_tracker(&mock);
        assert_eq!(tracker.state().player_pointer, 0x2000);
        assert!(tracker.ever_saw_player());

        mock.set_u32(profile.player_ptr_addr(), 0x10);
        tracker.poll(&mock);
        assert_eq!(tracker.state().player_pointer, 0x2000);
    }

    #[test]
    fn test_zero_player_pointer_commits() {
        let profile = LayoutProfile::default();
        let mock = gameplay_memory();
        let mut tracker = warmed_tracker(&mock);

        mock.set_u32(profile.player_ptr_addr(), 0);
        tracker.poll(&mock);
        assert_eq!(tracker.state().player_pointer, 0);
        // Seeing the menu state does not unsee the session's player.
        assert!(tracker.ever_saw_player());
    }

    #[test]
    fn test_unknown_phase_discriminant_retains_committed_phase() {
        let profile = LayoutProfile::default();
        let mock = gameplay_memory();
        let mut tracker = warmed_tracker(&mock);
        assert_eq!(tracker.state().phase, GamePhase::InGame);

        mock.set_u8(profile.game_phase_addr(), 0xCD);
        tracker.poll(&mock);
        assert_eq!(tracker.state().phase, GamePhase::InGame);
    }

    #[test]
    fn test_area_code_debounce_through_poll() {
        let profile = LayoutProfile::default();
        let mock = gameplay_memory();
        let mut tracker = warmed_tracker(&mock);
        assert_eq!(tracker.state().area_code, 0);

        mock.set_u16(profile.area_code_addr(), 0x0104);
        tracker.poll(&mock); // first observation
        assert_eq!(tracker.state().area_code, 0);
        tracker.poll(&mock); // first confirming sample
        assert_eq!(tracker.state().area_code, 0);
        tracker.poll(&mock); // second confirming sample commits
        assert_eq!(tracker.state().area_code, 0x0104);
    }

    #[test]
    fn test_poll_survives_dead_memory() {
        let mock = gameplay_memory();
        let mut tracker = warmed_tracker(&mock);
        let before = tracker.state();

        // A reader whose every access fails: nothing changes, nothing
        // panics.
        let dead = MockMemoryReader::with_capacity(0);
        for _ in 0..10 {
            tracker.poll(&dead);
        }
        let after = tracker.state();
        assert_eq!(after.phase, before.phase);
        assert_eq!(after.entity_count, before.entity_count);
        assert_eq!(after.player_pointer, before.player_pointer);
    }
}
