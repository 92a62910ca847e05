//! # Flat Generator
//!
//! Flat grassland at a fixed height bordered by an ocean on the negative X
//! side. The shoreline wanders along Z, driven by four per-seed roughness
//! offsets drawn from `[-2000, 2000)`.

use cgmath::Vector2;

use super::{features, Reseedable, TerrainContentsGenerator};
use crate::voxels::block::block_type::BlockType;
use crate::voxels::chunk::{Chunk, CHUNK_DIMENSION};

/// The height of the grass layer.
pub const LAND_HEIGHT: i32 = 64;

const OFFSET_RANGE: f32 = 2000.0;
const SHORE_AMPLITUDES: [f32; 4] = [24.0, 12.0, 6.0, 3.0];
const SHORE_FREQUENCIES: [f32; 4] = [0.011, 0.027, 0.061, 0.13];
const OCEAN_SLOPE: i32 = 4;
const MAX_OCEAN_DEPTH: i32 = 40;
const BEACH_WIDTH: i32 = 6;
const SOIL_DEPTH: i32 = 3;
const SPAWN_INLAND_DISTANCE: f32 = 40.0;

pub struct FlatTerrainGenerator {
    seed: i32,
    shore_roughness_offset: [f32; 4],
}

impl FlatTerrainGenerator {
    pub fn new(seed: i32) -> Self {
        let mut generator = FlatTerrainGenerator {
            seed,
            shore_roughness_offset: [0.0; 4],
        };
        generator.apply_seed(seed);
        generator
    }

    /// The X coordinate of the shoreline at world `z`.
    pub fn shore_position(&self, z: i32) -> f32 {
        self.shore_roughness_offset
            .iter()
            .zip(SHORE_AMPLITUDES.iter().zip(SHORE_FREQUENCIES.iter()))
            .map(|(offset, (amplitude, frequency))| amplitude * ((z as f32 + offset) * frequency).sin())
            .sum()
    }

    /// The height of the topmost solid cell of the column at world `(x, z)`.
    pub fn calculate_height(&self, x: i32, z: i32) -> i32 {
        let distance = self.shore_position(z) - x as f32;
        if distance <= 0.0 {
            return LAND_HEIGHT;
        }
        let depth = (1 + distance as i32 / OCEAN_SLOPE).min(MAX_OCEAN_DEPTH);
        LAND_HEIGHT - 1 - depth
    }
}

impl Reseedable for FlatTerrainGenerator {
    fn apply_seed(&mut self, seed: i32) {
        let mut rng = fastrand::Rng::with_seed(seed as u32 as u64);
        self.seed = seed;
        for offset in self.shore_roughness_offset.iter_mut() {
            *offset = rng.f32() * 2.0 * OFFSET_RANGE - OFFSET_RANGE;
        }
    }
}

impl TerrainContentsGenerator for FlatTerrainGenerator {
    fn find_coarse_spawn_position(&self) -> Vector2<f32> {
        Vector2::new(self.shore_position(0) + SPAWN_INLAND_DISTANCE, 0.5)
    }

    fn generate_chunk_contents_pass1(&self, chunk: &mut Chunk) {
        let origin = chunk.origin();
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let height = self.calculate_height(origin.x + x, origin.y + z);
                chunk.set_cell_value_fast(x, 0, z, BlockType::BEDROCK.value());
                chunk.fill_column(x, z, 1, height - SOIL_DEPTH - 1, BlockType::STONE.value());
                if height == LAND_HEIGHT {
                    chunk.fill_column(x, z, height - SOIL_DEPTH, height - 1, BlockType::DIRT.value());
                    chunk.set_cell_value_fast(x, height, z, BlockType::GRASS.value());
                } else {
                    chunk.fill_column(x, z, height - SOIL_DEPTH, height, BlockType::GRAVEL.value());
                    chunk.fill_column(x, z, height + 1, LAND_HEIGHT - 1, BlockType::WATER.value());
                }
            }
        }
    }

    fn generate_chunk_contents_pass2(&self, chunk: &mut Chunk) {
        let origin = chunk.origin();
        for z in 0..CHUNK_DIMENSION {
            let shore = self.shore_position(origin.y + z);
            for x in 0..CHUNK_DIMENSION {
                let inland = (origin.x + x) as f32 - shore;
                if inland.abs() > BEACH_WIDTH as f32 {
                    continue;
                }
                let height = self.calculate_height(origin.x + x, origin.y + z);
                chunk.fill_column(x, z, height - SOIL_DEPTH, height, BlockType::SAND.value());
            }
        }
    }

    fn generate_chunk_contents_pass3(&self, chunk: &mut Chunk) {
        features::place_ore_veins(chunk, self.seed);
    }

    fn generate_chunk_contents_pass4(&self, chunk: &mut Chunk) {
        features::place_surface_features(chunk, self.seed);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use cgmath::Point2;

    #[test]
    fn offsets_follow_seed() {
        let mut generator = FlatTerrainGenerator::new(3);
        let first = generator.shore_roughness_offset;
        generator.apply_seed(4);
        assert_ne!(first, generator.shore_roughness_offset);
        generator.apply_seed(3);
        assert_eq!(first, generator.shore_roughness_offset);
        assert!(first.iter().all(|o| *o >= -OFFSET_RANGE && *o < OFFSET_RANGE));
    }

    #[test]
    fn spawn_is_on_grass() {
        let generator = FlatTerrainGenerator::new(11);
        let spawn = generator.find_coarse_spawn_position();
        let x = spawn.x.floor() as i32;
        let z = spawn.y.floor() as i32;
        assert_eq!(generator.calculate_height(x, z), LAND_HEIGHT);

        let mut chunk = Chunk::new(Point2::new(x >> 4, z >> 4));
        generator.generate_chunk_contents_pass1(&mut chunk);
        generator.generate_chunk_contents_pass2(&mut chunk);
        let local_x = x & 15;
        let local_z = z & 15;
        assert_eq!(chunk.top_height(local_x, local_z), Some(LAND_HEIGHT));
        assert_eq!(
            chunk.get_cell_value_fast(local_x, LAND_HEIGHT, local_z),
            BlockType::GRASS.value()
        );
    }

    #[test]
    fn ocean_deepens_away_from_shore() {
        let generator = FlatTerrainGenerator::new(0);
        let shore = generator.shore_position(0) as i32;
        let near = generator.calculate_height(shore - 8, 0);
        let far = generator.calculate_height(shore - 100, 0);
        assert!(near < LAND_HEIGHT);
        assert!(far < near);
        assert!(far >= LAND_HEIGHT - 1 - MAX_OCEAN_DEPTH);
    }
}
