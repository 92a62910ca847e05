//! # Terrain Generation
//!
//! Procedural chunk content generation. A generator fills a chunk in four
//! passes, one per `ChunkState::ContentsPending*` step, and can be re-seeded
//! in place so a worker can reuse it across many worlds.
//!
//! Two variants are provided:
//! - `ContinentTerrainGenerator`: Perlin height field with rivers, deserts and caves
//! - `FlatTerrainGenerator`: flat land with a noisy coastline
//!
//! Both share the ore and surface feature placement in `features`.

use cgmath::Vector2;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::chunk::Chunk;

pub mod continent;
pub mod features;
pub mod flat;

pub use continent::ContinentTerrainGenerator;
pub use flat::FlatTerrainGenerator;

/// A generator whose per-world random state is a deterministic function of a seed.
pub trait Reseedable {
    /// Replaces all per-seed state. Generating the same chunk after applying
    /// the same seed always yields the same cells.
    fn apply_seed(&mut self, seed: i32);
}

/// Fills chunks with terrain.
///
/// Each pass only touches the chunk it is given, so chunks can be generated in
/// any order.
pub trait TerrainContentsGenerator: Reseedable + Send {
    /// A horizontal position near which players would spawn.
    fn find_coarse_spawn_position(&self) -> Vector2<f32>;

    /// Base terrain: bedrock, stone, soil and water.
    fn generate_chunk_contents_pass1(&self, chunk: &mut Chunk);

    /// Terrain shaping on top of the base layers.
    fn generate_chunk_contents_pass2(&self, chunk: &mut Chunk);

    /// Ore veins.
    fn generate_chunk_contents_pass3(&self, chunk: &mut Chunk);

    /// Surface plants and objects.
    fn generate_chunk_contents_pass4(&self, chunk: &mut Chunk);
}

/// Selects which generator a world uses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Continent,
    Flat,
}

impl GenerationMode {
    /// Creates a generator of this kind seeded with zero.
    pub fn create_generator(self) -> Box<dyn TerrainContentsGenerator> {
        match self {
            GenerationMode::Continent => Box::new(ContinentTerrainGenerator::new(0)),
            GenerationMode::Flat => Box::new(FlatTerrainGenerator::new(0)),
        }
    }
}
