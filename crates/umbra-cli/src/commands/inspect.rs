//! Inspect command: poll a RAM dump and print the committed state.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::{info, warn};
use umbra_core::{
    AddressSpace, GameStateTracker, LayoutProfile, MemoryAccessor, UmbraConfig, load_profile,
};

use crate::commands::load_dump;

/// Run the inspect command
pub fn run(
    dump: &Path,
    config_path: Option<&Path>,
    profile_path: Option<&Path>,
    polls: u64,
) -> Result<()> {
    let config = match config_path {
        Some(path) => match UmbraConfig::load(path) {
            Ok(c) => {
                info!("Loaded config from {}", path.display());
                c
            }
            Err(e) => {
                warn!("Failed to load config: {}, using defaults", e);
                UmbraConfig::default()
            }
        },
        None => UmbraConfig::default(),
    };

    let profile = match profile_path {
        Some(path) => {
            let profile = load_profile(path)?;
            info!("Loaded layout profile version: {}", profile.version);
            profile
        }
        None => LayoutProfile::default(),
    };
    if !profile.is_valid() {
        warn!("Layout profile is incomplete; reads may all be discarded");
    }

    let ram = load_dump(dump)?;
    let accessor = MemoryAccessor::new(AddressSpace::attach(&ram));

    let mut tracker = GameStateTracker::new(config, profile);
    for _ in 0..polls {
        tracker.poll(&accessor);
    }

    let state = tracker.state();
    println!("Committed state after {} polls:", polls);
    println!();
    println!("  Phase:          {}", state.phase.green());
    println!("  Map:            {}", state.map.green());
    println!("  Entities:       {}", state.entity_count);
    println!("  Enemies:        {}", state.enemy_count);
    println!("  Particles:      {}", state.particle_count);
    if state.player_pointer != 0 {
        println!(
            "  Player:         {}",
            format!("{:#x}", state.player_pointer).cyan()
        );
    } else {
        println!("  Player:         {}", "none (menu)".dimmed());
    }
    println!("  Area code:      {:#06x}", state.area_code);
    println!("  Cooldown:       {} ticks remaining", state.cooldown_remaining);
    println!(
        "  Saw player:     {}",
        if tracker.ever_saw_player() {
            "yes".green().to_string()
        } else {
            "no".red().to_string()
        }
    );

    Ok(())
}
