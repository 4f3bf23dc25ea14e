//! Procedurally generated surface textures.
//!
//! Each surface kind gets one 16x16 RGBA layer of a texture array, generated
//! at startup from simple deterministic patterns. The final layer is plain
//! white so solid-colored instances can run through the same textured
//! pipeline with a tint.

use crate::engine_state::world::object::{SurfaceKind, SURFACE_KIND_COUNT};

/// Width and height of every texture layer in texels.
pub const TEXTURE_DIMENSION: u32 = 16;

/// Number of layers in the surface texture array.
pub const TEXTURE_LAYER_COUNT: u32 = SURFACE_KIND_COUNT as u32 + 1;

/// Layer index of the plain white texture used by tinted solid shapes.
pub const WHITE_TEXTURE_INDEX: u32 = SURFACE_KIND_COUNT as u32;

const LAYER_BYTES: usize = (TEXTURE_DIMENSION * TEXTURE_DIMENSION * 4) as usize;

/// Generates the full texture array, layer-major, RGBA8.
pub fn generate_layers() -> Vec<u8> {
    let mut data = Vec::with_capacity(LAYER_BYTES * TEXTURE_LAYER_COUNT as usize);
    for surface in [
        SurfaceKind::Brick,
        SurfaceKind::Crate,
        SurfaceKind::Dirt,
        SurfaceKind::Glass,
        SurfaceKind::Grass,
        SurfaceKind::Plank,
        SurfaceKind::Sand,
        SurfaceKind::Stone,
        SurfaceKind::Wood,
    ] {
        push_layer(&mut data, |x, y| texel(surface, x, y));
    }
    push_layer(&mut data, |_, _| [255, 255, 255, 255]);
    data
}

fn push_layer(data: &mut Vec<u8>, texel: impl Fn(u32, u32) -> [u8; 4]) {
    for y in 0..TEXTURE_DIMENSION {
        for x in 0..TEXTURE_DIMENSION {
            data.extend_from_slice(&texel(x, y));
        }
    }
}

/// Deterministic per-texel hash driving the speckle patterns.
fn speckle(x: u32, y: u32, seed: u32) -> u32 {
    let mut value = x
        .wrapping_mul(374_761_393)
        .wrapping_add(y.wrapping_mul(668_265_263))
        .wrapping_add(seed.wrapping_mul(2_246_822_519));
    value = (value ^ (value >> 13)).wrapping_mul(1_274_126_177);
    value ^ (value >> 16)
}

fn shade(base: [u8; 3], variation: i16, hash: u32, alpha: u8) -> [u8; 4] {
    let offset = (hash % (2 * variation as u32 + 1)) as i16 - variation;
    let channel = |c: u8| (c as i16 + offset).clamp(0, 255) as u8;
    [channel(base[0]), channel(base[1]), channel(base[2]), alpha]
}

fn texel(surface: SurfaceKind, x: u32, y: u32) -> [u8; 4] {
    let hash = speckle(x, y, surface.texture_index());
    match surface {
        SurfaceKind::Brick => {
            // Mortar seams every fourth row and staggered every eighth column.
            let row = y / 4;
            let stagger = if row % 2 == 0 { 0 } else { 4 };
            if y % 4 == 0 || (x + stagger) % 8 == 0 {
                shade([180, 180, 180], 10, hash, 255)
            } else {
                shade([168, 66, 58], 14, hash, 255)
            }
        }
        SurfaceKind::Crate => {
            let edge = x == 0 || y == 0 || x == TEXTURE_DIMENSION - 1 || y == TEXTURE_DIMENSION - 1;
            let cross = x == y || x + y == TEXTURE_DIMENSION - 1;
            if edge || cross {
                shade([110, 78, 40], 8, hash, 255)
            } else {
                shade([160, 120, 70], 12, hash, 255)
            }
        }
        SurfaceKind::Dirt => shade([120, 84, 56], 20, hash, 255),
        SurfaceKind::Glass => shade([200, 228, 240], 8, hash, 140),
        SurfaceKind::Grass => shade([88, 150, 60], 22, hash, 255),
        SurfaceKind::Plank => {
            if y % 4 == 0 {
                shade([120, 88, 50], 6, hash, 255)
            } else {
                shade([178, 140, 92], 10, hash, 255)
            }
        }
        SurfaceKind::Sand => shade([214, 196, 140], 16, hash, 255),
        SurfaceKind::Stone => shade([140, 140, 144], 18, hash, 255),
        SurfaceKind::Wood => {
            if x % 4 == 0 {
                shade([104, 72, 44], 6, hash, 255)
            } else {
                shade([150, 108, 66], 10, hash, 255)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_data_covers_every_layer() {
        let data = generate_layers();
        assert_eq!(data.len(), LAYER_BYTES * TEXTURE_LAYER_COUNT as usize);
    }

    #[test]
    fn white_layer_is_opaque_white() {
        let data = generate_layers();
        let white = &data[LAYER_BYTES * WHITE_TEXTURE_INDEX as usize..];
        assert!(white[..LAYER_BYTES].iter().all(|byte| *byte == 255));
    }

    #[test]
    fn glass_layer_is_translucent() {
        let data = generate_layers();
        let glass_layer = SurfaceKind::Glass.texture_index() as usize;
        let layer = &data[LAYER_BYTES * glass_layer..LAYER_BYTES * (glass_layer + 1)];
        assert!(layer.chunks_exact(4).all(|texel| texel[3] < 255));
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate_layers(), generate_layers());
    }
}
