//! # World Worker
//!
//! One disposable world instance: a generator, a terrain and the updater that
//! materializes it. A worker is reused across seeds; every scan re-seeds the
//! generator and clears the terrain first, so results depend only on the seed.

use std::collections::HashMap;

use cgmath::Point3;

use crate::error::ScanError;
use crate::reporting::{ProgressReporter, SilentProgressReporter};
use crate::scanning::TerrainScanner;
use crate::voxels::block::{BlockValue, TargetSet};
use crate::voxels::generation::{GenerationMode, TerrainContentsGenerator};
use crate::voxels::terrain_updater::TerrainUpdater;
use crate::voxels::world::Terrain;

/// Per-worker scan parameters.
#[derive(Clone, Debug)]
pub struct WorkerSettings {
    pub generation_mode: GenerationMode,
    pub scan_range: f32,
    pub targets: TargetSet,
    pub min_target_block_sum: usize,
}

/// Counts of dug target blocks for one accepted seed.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanResult {
    pub seed: i32,
    pub total_blocks_count: usize,
    pub blocks_count: HashMap<BlockValue, usize>,
}

pub struct WorldWorker {
    settings: WorkerSettings,
    generator: Box<dyn TerrainContentsGenerator>,
    updater: TerrainUpdater,
    terrain: Terrain,
}

impl WorldWorker {
    pub fn new(settings: WorkerSettings) -> Self {
        let generator = settings.generation_mode.create_generator();
        WorldWorker::with_generator(settings, generator)
    }

    /// Creates a worker around a specific generator, ignoring `settings.generation_mode`.
    pub fn with_generator(settings: WorkerSettings, generator: Box<dyn TerrainContentsGenerator>) -> Self {
        WorldWorker {
            settings,
            generator,
            updater: TerrainUpdater::default(),
            terrain: Terrain::new(),
        }
    }

    pub fn terrain_mut(&mut self) -> &mut Terrain {
        &mut self.terrain
    }

    /// Regenerates the world for `seed` and returns the spawn cell.
    ///
    /// The spawn cell is the topmost solid cell of the column under the
    /// generator's coarse spawn position.
    pub fn prepare_world(&mut self, seed: i32, reporter: &mut dyn ProgressReporter) -> Result<Point3<i32>, ScanError> {
        self.generator.apply_seed(seed);
        self.terrain.clear();

        let spawn = self.generator.find_coarse_spawn_position();
        self.updater.spawn_position = spawn;
        self.updater
            .generate_chunks(&mut self.terrain, self.generator.as_ref(), self.settings.scan_range, reporter);

        let x = spawn.x.floor() as i32;
        let z = spawn.y.floor() as i32;
        let y = TerrainScanner::new(&mut self.terrain)
            .find_topmost_height(x, z)
            .ok_or(ScanError::SpawnNotFound { x, z })?;
        Ok(Point3::new(x, y, z))
    }

    /// Generates the world for `seed` and digs every target reachable from spawn.
    ///
    /// # Returns
    /// `Ok(None)` if fewer than `min_target_block_sum` target blocks were dug.
    pub fn scan(&mut self, seed: i32) -> Result<Option<ScanResult>, ScanError> {
        let spawn = self.prepare_world(seed, &mut SilentProgressReporter)?;

        let mut blocks_count: HashMap<BlockValue, usize> = HashMap::new();
        let mut total_blocks_count = 0;
        TerrainScanner::new(&mut self.terrain).dig_blocks(
            spawn,
            &self.settings.targets,
            |value, _| {
                *blocks_count.entry(value).or_default() += 1;
                total_blocks_count += 1;
            },
            None,
        );
        log::debug!("Seed {} dug {} target blocks", seed, total_blocks_count);

        if total_blocks_count < self.settings.min_target_block_sum {
            return Ok(None);
        }
        Ok(Some(ScanResult {
            seed,
            total_blocks_count,
            blocks_count,
        }))
    }
}
