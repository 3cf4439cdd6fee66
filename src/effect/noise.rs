//! Dither texture
//!
//! White noise sampled by the scattering shader to jitter the march start,
//! trading banding for grain. Generated deterministically so frames and
//! test runs agree.

use crate::context::GpuContext;
use crate::core::texture::Texture2D;

const SEED: u32 = 0x9E3779B9;

/// Upload a `size` x `size` RGBA8 noise texture.
pub(crate) fn noise_texture(ctx: &GpuContext, size: u32) -> Texture2D {
    let data = noise_bytes(size, SEED);
    Texture2D::from_rgba8(
        ctx,
        size,
        size,
        wgpu::TextureFormat::Rgba8Unorm,
        &data,
        Some("shaft noise"),
    )
}

/// Deterministic RGBA8 white noise, one xorshift step per byte.
pub(crate) fn noise_bytes(size: u32, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for _ in 0..size * size * 4 {
        // xorshift32
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        data.push((state >> 24) as u8);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_deterministic() {
        assert_eq!(noise_bytes(8, 42), noise_bytes(8, 42));
    }

    #[test]
    fn test_noise_length_matches_rgba8() {
        assert_eq!(noise_bytes(32, SEED).len(), 32 * 32 * 4);
    }

    #[test]
    fn test_noise_is_not_constant() {
        let data = noise_bytes(16, SEED);
        assert!(data.iter().any(|&b| b != data[0]));
    }
}
