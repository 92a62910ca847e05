//! # Continent Generator
//!
//! Rolling land built from layered Perlin noise. Per-seed state is a Perlin
//! permutation plus four horizontal sampling offsets (temperature, humidity,
//! mountains and rivers), each drawn uniformly from `[-3000, 3000)`.
//!
//! Pass layout:
//! 1. Column fill: bedrock, stone, soil, a grass or sand top, water up to sea level
//! 2. Caves carved from 3D noise below the soil
//! 3. Ore veins
//! 4. Surface features

use cgmath::Vector2;
use noise::{NoiseFn, Perlin};

use super::{features, Reseedable, TerrainContentsGenerator};
use crate::voxels::block::block_type::BlockType;
use crate::voxels::block::extract_contents;
use crate::voxels::chunk::{Chunk, CHUNK_DIMENSION, CHUNK_HEIGHT};

/// The highest water cell of oceans and rivers.
pub const SEA_LEVEL: i32 = 64;

const OFFSET_RANGE: f32 = 3000.0;

const MOUNTAIN_SCALE: f64 = 0.004;
const DETAIL_SCALE: f64 = 0.03;
const RIVER_SCALE: f64 = 0.003;
const CLIMATE_SCALE: f64 = 0.002;
const CAVE_SCALE: f64 = 0.06;

const MOUNTAIN_AMPLITUDE: f64 = 30.0;
const DETAIL_AMPLITUDE: f64 = 4.0;
const RIVER_WIDTH: f64 = 0.05;
const RIVER_DEPTH: i32 = 3;
const CAVE_THRESHOLD: f64 = 0.55;
const SOIL_DEPTH: i32 = 3;
const SHORE_HEIGHT: i32 = 2;

const SPAWN_SEARCH_STEP: i32 = 32;
const SPAWN_SEARCH_RADIUS: i32 = 2048;

pub struct ContinentTerrainGenerator {
    seed: i32,
    perlin: Perlin,
    temperature_offset: Vector2<f32>,
    humidity_offset: Vector2<f32>,
    mountains_offset: Vector2<f32>,
    rivers_offset: Vector2<f32>,
}

fn random_offset(rng: &mut fastrand::Rng) -> Vector2<f32> {
    let mut component = || rng.f32() * 2.0 * OFFSET_RANGE - OFFSET_RANGE;
    Vector2::new(component(), component())
}

impl ContinentTerrainGenerator {
    pub fn new(seed: i32) -> Self {
        let mut generator = ContinentTerrainGenerator {
            seed,
            perlin: Perlin::new(seed as u32),
            temperature_offset: Vector2::new(0.0, 0.0),
            humidity_offset: Vector2::new(0.0, 0.0),
            mountains_offset: Vector2::new(0.0, 0.0),
            rivers_offset: Vector2::new(0.0, 0.0),
        };
        generator.apply_seed(seed);
        generator
    }

    fn sample_2d(&self, x: i32, z: i32, offset: Vector2<f32>, scale: f64) -> f64 {
        self.perlin.get([
            (x as f64 + offset.x as f64) * scale,
            (z as f64 + offset.y as f64) * scale,
        ])
    }

    /// The height of the topmost solid cell of the column at world `(x, z)`.
    pub fn calculate_height(&self, x: i32, z: i32) -> i32 {
        let mountains = self.sample_2d(x, z, self.mountains_offset, MOUNTAIN_SCALE);
        let detail = self.sample_2d(x, z, self.mountains_offset, DETAIL_SCALE);
        let mut height = SEA_LEVEL as f64 + 6.0 + mountains * MOUNTAIN_AMPLITUDE + detail * DETAIL_AMPLITUDE;

        let river = self.sample_2d(x, z, self.rivers_offset, RIVER_SCALE).abs();
        if river < RIVER_WIDTH {
            let bed = (SEA_LEVEL - RIVER_DEPTH) as f64;
            if height > bed {
                height = bed + (height - bed) * (river / RIVER_WIDTH);
            }
        }

        (height as i32).clamp(8, CHUNK_HEIGHT - 24)
    }

    /// Whether the column at world `(x, z)` is hot and dry enough to be desert.
    pub fn is_desert(&self, x: i32, z: i32) -> bool {
        let temperature = self.sample_2d(x, z, self.temperature_offset, CLIMATE_SCALE);
        let humidity = self.sample_2d(x, z, self.humidity_offset, CLIMATE_SCALE);
        temperature > 0.25 && humidity < -0.1
    }

    fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        let offset = self.humidity_offset;
        let value = self.perlin.get([
            (x as f64 + offset.x as f64) * CAVE_SCALE,
            y as f64 * CAVE_SCALE * 1.5,
            (z as f64 + offset.y as f64) * CAVE_SCALE,
        ]);
        value > CAVE_THRESHOLD
    }
}

impl Reseedable for ContinentTerrainGenerator {
    fn apply_seed(&mut self, seed: i32) {
        let mut rng = fastrand::Rng::with_seed(seed as u32 as u64);
        self.seed = seed;
        self.perlin = Perlin::new(seed as u32);
        self.temperature_offset = random_offset(&mut rng);
        self.humidity_offset = random_offset(&mut rng);
        self.mountains_offset = random_offset(&mut rng);
        self.rivers_offset = random_offset(&mut rng);
    }
}

impl TerrainContentsGenerator for ContinentTerrainGenerator {
    fn find_coarse_spawn_position(&self) -> Vector2<f32> {
        let directions = [(1, 0), (0, 1), (-1, 0), (0, -1), (1, 1), (-1, 1), (1, -1), (-1, -1)];
        for radius in (0..=SPAWN_SEARCH_RADIUS).step_by(SPAWN_SEARCH_STEP as usize) {
            for (dx, dz) in directions {
                let x = dx * radius;
                let z = dz * radius;
                if self.calculate_height(x, z) > SEA_LEVEL + SHORE_HEIGHT && !self.is_desert(x, z) {
                    return Vector2::new(x as f32 + 0.5, z as f32 + 0.5);
                }
            }
        }
        log::debug!("No land found near origin for seed {}", self.seed);
        Vector2::new(0.5, 0.5)
    }

    fn generate_chunk_contents_pass1(&self, chunk: &mut Chunk) {
        let origin = chunk.origin();
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let world_x = origin.x + x;
                let world_z = origin.y + z;
                let height = self.calculate_height(world_x, world_z);
                let desert = self.is_desert(world_x, world_z);
                let shore = height <= SEA_LEVEL + SHORE_HEIGHT;

                let soil = if desert { BlockType::SAND } else { BlockType::DIRT };
                let top = if desert || shore { BlockType::SAND } else { BlockType::GRASS };

                chunk.set_cell_value_fast(x, 0, z, BlockType::BEDROCK.value());
                chunk.fill_column(x, z, 1, height - SOIL_DEPTH - 1, BlockType::STONE.value());
                chunk.fill_column(x, z, height - SOIL_DEPTH, height - 1, soil.value());
                chunk.set_cell_value_fast(x, height, z, top.value());
                if height < SEA_LEVEL {
                    chunk.fill_column(x, z, height + 1, SEA_LEVEL, BlockType::WATER.value());
                }
            }
        }
    }

    fn generate_chunk_contents_pass2(&self, chunk: &mut Chunk) {
        let origin = chunk.origin();
        let stone = BlockType::STONE as u32;
        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let world_x = origin.x + x;
                let world_z = origin.y + z;
                let ceiling = self.calculate_height(world_x, world_z) - SOIL_DEPTH - 3;
                for y in 4..ceiling {
                    if extract_contents(chunk.get_cell_value_fast(x, y, z)) == stone
                        && self.is_cave(world_x, y, world_z)
                    {
                        chunk.set_cell_value_fast(x, y, z, BlockType::AIR.value());
                    }
                }
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
