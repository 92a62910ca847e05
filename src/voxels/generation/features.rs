//! Ore vein and surface feature placement shared by every generator.
//!
//! Placement is driven by a `fastrand::Rng` seeded from the world seed, the
//! chunk coordinates and a per-pass salt, so a chunk's features never depend
//! on which other chunks were generated before it.

use cgmath::Point2;

use crate::voxels::block::block_type::{cotton_data, BlockType};
use crate::voxels::block::extract_contents;
use crate::voxels::chunk::{Chunk, CHUNK_DIMENSION, CHUNK_HEIGHT};

pub const ORE_SALT: u64 = 0x6f72_6573;
pub const SURFACE_SALT: u64 = 0x7375_7266;

/// One row of the ore distribution table.
struct OreLayer {
    block_type: BlockType,
    attempts: u32,
    min_y: i32,
    max_y: i32,
    vein_size: u32,
}

static ORE_LAYERS: [OreLayer; 7] = [
    OreLayer { block_type: BlockType::COAL_ORE, attempts: 20, min_y: 20, max_y: 110, vein_size: 8 },
    OreLayer { block_type: BlockType::COPPER_ORE, attempts: 12, min_y: 10, max_y: 80, vein_size: 6 },
    OreLayer { block_type: BlockType::IRON_ORE, attempts: 10, min_y: 8, max_y: 64, vein_size: 5 },
    OreLayer { block_type: BlockType::SULPHUR_ORE, attempts: 6, min_y: 5, max_y: 40, vein_size: 5 },
    OreLayer { block_type: BlockType::DIAMOND_ORE, attempts: 2, min_y: 2, max_y: 24, vein_size: 3 },
    OreLayer { block_type: BlockType::GERMANIUM_ORE, attempts: 3, min_y: 4, max_y: 48, vein_size: 4 },
    OreLayer { block_type: BlockType::SALTPETER_ORE, attempts: 6, min_y: 40, max_y: 120, vein_size: 6 },
];

const PUMPKIN_CHANCE: f32 = 0.004;
const COTTON_CHANCE: f32 = 0.006;
const GRAVESTONE_CHANCE: f32 = 0.0006;
const CAIRN_CHANCE: f32 = 0.0003;
const WILD_COTTON_SIZE: u32 = 2;

/// Derives a per-chunk random seed.
pub fn chunk_seed(seed: i32, coords: Point2<i32>, salt: u64) -> u64 {
    let mut hash = seed as u32 as u64;
    hash = hash.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ coords.x as u32 as u64;
    hash = hash.wrapping_mul(0xBF58_476D_1CE4_E5B9) ^ coords.y as u32 as u64;
    hash = hash.wrapping_mul(0x94D0_49BB_1331_11EB) ^ salt;
    hash ^ (hash >> 31)
}

/// Replaces stone with ore veins according to the ore table.
///
/// Each vein is a random walk that only overwrites stone and never leaves the
/// chunk.
pub fn place_ore_veins(chunk: &mut Chunk, seed: i32) {
    let mut rng = fastrand::Rng::with_seed(chunk_seed(seed, chunk.coords, ORE_SALT));
    for layer in ORE_LAYERS.iter() {
        for _ in 0..layer.attempts {
            let mut x = rng.i32(0..CHUNK_DIMENSION);
            let mut y = rng.i32(layer.min_y..layer.max_y);
            let mut z = rng.i32(0..CHUNK_DIMENSION);
            for _ in 0..layer.vein_size {
                if extract_contents(chunk.get_cell_value_fast(x, y, z)) == BlockType::STONE as u32 {
                    chunk.set_cell_value_fast(x, y, z, layer.block_type.value());
                }
                let step = if rng.bool() { 1 } else { -1 };
                match rng.u8(0..3) {
                    0 => x = (x + step).clamp(0, CHUNK_DIMENSION - 1),
                    1 => y = (y + step).clamp(1, CHUNK_HEIGHT - 2),
                    _ => z = (z + step).clamp(0, CHUNK_DIMENSION - 1),
                }
            }
        }
    }
}

/// Places pumpkins, wild cotton, gravestones and cairns on exposed grass.
pub fn place_surface_features(chunk: &mut Chunk, seed: i32) {
    let mut rng = fastrand::Rng::with_seed(chunk_seed(seed, chunk.coords, SURFACE_SALT));
    for z in 0..CHUNK_DIMENSION {
        for x in 0..CHUNK_DIMENSION {
            let Some(top) = chunk.top_height(x, z) else {
                continue;
            };
            if top + 1 >= CHUNK_HEIGHT
                || extract_contents(chunk.get_cell_value_fast(x, top, z)) != BlockType::GRASS as u32
            {
                continue;
            }
            let roll = rng.f32();
            let feature = if roll < PUMPKIN_CHANCE {
                BlockType::PUMPKIN.value()
            } else if roll < PUMPKIN_CHANCE + COTTON_CHANCE {
                BlockType::COTTON.with_data(cotton_data(WILD_COTTON_SIZE, true))
            } else if roll < PUMPKIN_CHANCE + COTTON_CHANCE + GRAVESTONE_CHANCE {
                BlockType::GRAVESTONE.with_data(rng.u32(0..16))
            } else if roll < PUMPKIN_CHANCE + COTTON_CHANCE + GRAVESTONE_CHANCE + CAIRN_CHANCE {
                BlockType::CAIRN.value()
            } else {
                continue;
            };
            chunk.set_cell_value_fast(x, top + 1, z, feature);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn stone_chunk(coords: Point2<i32>) -> Chunk {
        let mut chunk = Chunk::new(coords);
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                chunk.fill_column(x, z, 0, 100, BlockType::STONE.value());
                chunk.set_cell_value_fast(x, 100, z, BlockType::GRASS.value());
            }
        }
        chunk
    }

    fn ore_total(chunk: &Chunk) -> usize {
        ORE_LAYERS
            .iter()
            .map(|layer| chunk.count_value(layer.block_type.value()))
            .sum()
    }

    #[test]
    fn ore_placement_is_deterministic() {
        let mut first = stone_chunk(Point2::new(3, -2));
        let mut second = stone_chunk(Point2::new(3, -2));
        place_ore_veins(&mut first, 77);
        place_ore_veins(&mut second, 77);
        assert!(ore_total(&first) > 0);
        for layer in ORE_LAYERS.iter() {
            let value = layer.block_type.value();
            assert_eq!(first.count_value(value), second.count_value(value));
        }
    }

    #[test]
    fn ores_only_replace_stone() {
        let mut chunk = Chunk::new(Point2::new(0, 0));
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                chunk.fill_column(x, z, 0, 120, BlockType::DIRT.value());
            }
        }
        place_ore_veins(&mut chunk, 5);
        assert_eq!(ore_total(&chunk), 0);
    }

    #[test]
    fn surface_features_sit_on_grass() {
        let mut chunk = stone_chunk(Point2::new(0, 0));
        place_surface_features(&mut chunk, 1);
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let top = chunk.top_height(x, z).unwrap();
                assert!(top == 100 || top == 101);
            }
        }
    }

    #[test]
    fn chunk_seed_differs_by_coordinate() {
        let a = chunk_seed(1, Point2::new(0, 1), ORE_SALT);
        let b = chunk_seed(1, Point2::new(1, 0), ORE_SALT);
        let c = chunk_seed(1, Point2::new(0, 1), SURFACE_SALT);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
