//! Procedural radial shadow texture.
//!
//! The default (and fallback) shadow: a soft black disc whose alpha
//! falls off smoothly from the center. Generated on the CPU as an RGBA8
//! pixel buffer the host uploads wherever it likes.

use crate::error::{Error, Result};

/// Safe range for the texture edge length, enforced before any
/// allocation happens.
pub const MIN_SIZE: u32 = 16;
pub const MAX_SIZE: u32 = 512;
pub const DEFAULT_SIZE: u32 = 64;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Clamp a requested edge length into the safe range.
pub fn clamp_size(size: u32) -> u32 {
    size.clamp(MIN_SIZE, MAX_SIZE)
}

/// Hermite smoothstep over [0, 1].
fn smoothstep(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}

/// Generate a `size` x `size` RGBA8 radial gradient.
///
/// Color is fixed at black; per-pixel alpha is
/// `smoothstep(1 - normalized_distance) * intensity` quantized to 8
/// bits, where distance is normalized by the maximum radius. Pixels at
/// or beyond the radius are fully transparent.
pub fn generate(size: u32, intensity: f32) -> Result<Vec<u8>> {
    let size = clamp_size(size);
    let intensity = intensity.clamp(0.0, 1.0);

    let byte_count = (size as usize)
        .checked_mul(size as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(Error::AllocationFailure {
            requested: usize::MAX,
        })?;

    let mut pixels = vec![0u8; byte_count];
    let center = size as f32 / 2.0;
    let max_radius = center;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let distance = (dx * dx + dy * dy).sqrt() / max_radius;
            let alpha = smoothstep(1.0 - distance) * intensity;
            let idx = ((y * size + x) as usize) * BYTES_PER_PIXEL;
            // RGB stays black; only alpha carries the gradient.
            pixels[idx + 3] = (alpha * 255.0).round() as u8;
        }
    }

    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(pixels: &[u8], size: u32, x: u32, y: u32) -> u8 {
        pixels[((y * size + x) as usize) * BYTES_PER_PIXEL + 3]
    }

    #[test]
    fn test_center_alpha_tracks_intensity() {
        let pixels = generate(64, 0.7).unwrap();
        let center = alpha_at(&pixels, 64, 32, 32);
        let expected = 255.0 * 0.7;
        assert!((f32::from(center) - expected).abs() <= 1.0);
    }

    #[test]
    fn test_edge_alpha_is_zero() {
        let pixels = generate(64, 0.7).unwrap();
        assert_eq!(alpha_at(&pixels, 64, 0, 0), 0);
        assert_eq!(alpha_at(&pixels, 64, 63, 63), 0);
        assert_eq!(alpha_at(&pixels, 64, 0, 32), 0);
    }

    #[test]
    fn test_color_is_black_everywhere() {
        let pixels = generate(32, 1.0).unwrap();
        for pixel in pixels.chunks_exact(BYTES_PER_PIXEL) {
            assert_eq!(&pixel[..3], &[0, 0, 0]);
        }
    }

    #[test]
    fn test_size_clamped_before_allocation() {
        let pixels = generate(100_000, 0.5).unwrap();
        assert_eq!(
            pixels.len(),
            (MAX_SIZE as usize) * (MAX_SIZE as usize) * BYTES_PER_PIXEL
        );

        let pixels = generate(1, 0.5).unwrap();
        assert_eq!(
            pixels.len(),
            (MIN_SIZE as usize) * (MIN_SIZE as usize) * BYTES_PER_PIXEL
        );
    }

    #[test]
    fn test_alpha_monotonically_decreases_outward() {
        let pixels = generate(64, 1.0).unwrap();
        let mut previous = u8::MAX;
        for x in 32..64 {
            let alpha = alpha_at(&pixels, 64, x, 32);
            assert!(alpha <= previous);
            previous = alpha;
        }
    }
}
