//! Render the procedural shadow blob to an image file.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use umbra_core::shadow::blob;

/// Run the blob command: generate the radial gradient and write its
/// alpha channel as a binary PGM (the RGB channels are always black).
pub fn run(size: u32, intensity: f32, output: &Path) -> Result<()> {
    let pixels = blob::generate(size, intensity)?;
    let size = blob::clamp_size(size);

    let mut file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write!(file, "P5\n{} {}\n255\n", size, size)?;

    let alpha: Vec<u8> = pixels
        .chunks_exact(blob::BYTES_PER_PIXEL)
        .map(|px| px[3])
        .collect();
    file.write_all(&alpha)?;

    info!(
        "Wrote {}x{} blob at intensity {:.2} to {}",
        size,
        size,
        intensity,
        output.display()
    );
    Ok(())
}
