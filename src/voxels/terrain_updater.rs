//! # Terrain Updater
//!
//! Synchronous chunk materialization around a spawn position.
//!
//! `generate_chunks` runs in two stages, each reported to a `ProgressReporter`:
//! 1. Allocating chunks: every chunk whose center lies within the range
//!    (2D distance) of the spawn position is allocated.
//! 2. Generating chunks: allocated chunks, nearest first, are stepped through
//!    `ChunkState` until their contents are crawlable.

use cgmath::{MetricSpace, Point2, Vector2};
use log::debug;
use web_time::Instant;

use super::chunk::{chunk_center, to_chunk, Chunk, ChunkState};
use super::generation::TerrainContentsGenerator;
use super::storage::{ChunkStorage, NoChunkStorage};
use super::terrain_access::TerrainAccess;
use super::world::Terrain;
use crate::reporting::ProgressReporter;

pub const ALLOCATING_STAGE: usize = 0;
pub const GENERATING_STAGE: usize = 1;
pub const STAGE_NAMES: [&str; 2] = ["Allocating chunks", "Generating chunks"];

pub struct TerrainUpdater {
    pub spawn_position: Vector2<f32>,
    storage: Box<dyn ChunkStorage + Send>,
}

impl Default for TerrainUpdater {
    fn default() -> Self {
        TerrainUpdater::new(Box::new(NoChunkStorage))
    }
}

impl TerrainUpdater {
    /// Creates an updater that tries `storage` before generating a chunk.
    pub fn new(storage: Box<dyn ChunkStorage + Send>) -> Self {
        TerrainUpdater {
            spawn_position: Vector2::new(0.0, 0.0),
            storage,
        }
    }

    /// Allocates and materializes every chunk within `range` of the spawn position.
    ///
    /// # Arguments
    /// * `terrain` - The terrain to fill
    /// * `generator` - Generator used for chunks the storage cannot provide
    /// * `range` - Horizontal distance from the spawn position to chunk centers
    /// * `reporter` - Receives progress for both stages
    pub fn generate_chunks(
        &mut self,
        terrain: &mut Terrain,
        generator: &dyn TerrainContentsGenerator,
        range: f32,
        reporter: &mut dyn ProgressReporter,
    ) {
        let started = Instant::now();
        let spawn = Point2::new(self.spawn_position.x, self.spawn_position.y);
        let range_squared = range * range;

        let min_x = to_chunk((spawn.x - range).floor() as i32);
        let min_z = to_chunk((spawn.y - range).floor() as i32);
        let max_x = to_chunk((spawn.x + range).floor() as i32);
        let max_z = to_chunk((spawn.y + range).floor() as i32);

        let total = ((max_x - min_x + 1) * (max_z - min_z + 1)) as usize;
        reporter.report_max_value(ALLOCATING_STAGE, total);
        reporter.report_start(ALLOCATING_STAGE);
        let mut processed = 0;
        for x in min_x..=max_x {
            for z in min_z..=max_z {
                let coords = Point2::new(x, z);
                if chunk_center(coords).distance2(spawn) <= range_squared {
                    terrain.allocate_chunk(coords);
                }
                processed += 1;
                reporter.report_value(ALLOCATING_STAGE, processed);
            }
        }
        reporter.report_stop(ALLOCATING_STAGE);

        let mut allocated = terrain.allocated_chunks();
        allocated.sort_by(|a, b| {
            let da = chunk_center(*a).distance2(spawn);
            let db = chunk_center(*b).distance2(spawn);
            da.total_cmp(&db)
        });

        reporter.report_max_value(GENERATING_STAGE, allocated.len());
        reporter.report_start(GENERATING_STAGE);
        for (index, coords) in allocated.iter().enumerate() {
            if let Some(chunk) = terrain.get_chunk_at_mut(*coords) {
                while !chunk.state.is_crawlable() {
                    self.update_chunk_single_step(chunk, generator);
                }
            }
            reporter.report_value(GENERATING_STAGE, index + 1);
        }
        reporter.report_stop(GENERATING_STAGE);

        debug!(
            "Materialized {} chunks in {:.3}s",
            allocated.len(),
            started.elapsed().as_secs_f32()
        );
    }

    /// Advances `chunk` by exactly one `ChunkState`.
    ///
    /// A `NotLoaded` chunk is first offered to the storage: loaded chunks jump
    /// straight to `LightPending`, the rest enter the generation passes.
    /// Chunks that are already crawlable are left untouched.
    pub fn update_chunk_single_step(&mut self, chunk: &mut Chunk, generator: &dyn TerrainContentsGenerator) {
        chunk.state = match chunk.state {
            ChunkState::NotLoaded => {
                if self.storage.load_chunk(chunk) {
                    ChunkState::LightPending
                } else {
                    ChunkState::ContentsPending1
                }
            }
            ChunkState::ContentsPending1 => {
                generator.generate_chunk_contents_pass1(chunk);
                ChunkState::ContentsPending2
            }
            ChunkState::ContentsPending2 => {
                generator.generate_chunk_contents_pass2(chunk);
                ChunkState::ContentsPending3
            }
            ChunkState::ContentsPending3 => {
                generator.generate_chunk_contents_pass3(chunk);
                ChunkState::ContentsPending4
            }
            ChunkState::ContentsPending4 => {
                generator.generate_chunk_contents_pass4(chunk);
                ChunkState::LightPending
            }
            state => state,
        };
    }
}
