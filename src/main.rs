//! # Terrain Scanner CLI
//!
//! ```text
//! terrain-scanner [--config <PATH>] [--print-config] scan --seed <SEED> [--start X,Y,Z] [--veins]
//! terrain-scanner [--config <PATH>] [--print-config] batch --start-seed <SEED> --count <N>
//! ```
//!
//! Flags override values from the config file, which override the defaults.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use cgmath::Point3;
use clap::{Parser, Subcommand};
use log::info;
use web_time::Instant;

use terrain_scanner::config::{ScannerConfig, TargetCategories};
use terrain_scanner::reporting::{LogProgressReporter, ResultWriter};
use terrain_scanner::scanning::TerrainScanner;
use terrain_scanner::task_management::worker::{WorkerSettings, WorldWorker};
use terrain_scanner::task_management::{self, BatchScanHarness, BatchSettings};
use terrain_scanner::voxels::block::BlockValue;
use terrain_scanner::voxels::generation::GenerationMode;
use terrain_scanner::voxels::terrain_updater;

#[derive(Parser)]
#[command(name = "terrain-scanner", about = "Count target blocks reachable from spawn in generated worlds")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print the effective config as JSON and exit
    #[arg(long, global = true)]
    print_config: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one world and scan it
    Scan {
        #[arg(long, allow_hyphen_values = true)]
        seed: i32,
        /// Generation range around spawn
        #[arg(long)]
        range: Option<f32>,
        #[arg(long, value_enum)]
        mode: Option<GenerationMode>,
        /// Start cell instead of the spawn cell, moved to the nearest solid block
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        start: Option<Point3<i32>>,
        /// Maximum crawl distance from the start cell
        #[arg(long)]
        dig_range: Option<f32>,
        /// Count veins without digging
        #[arg(long)]
        veins: bool,
    },
    /// Scan a range of seeds in parallel and append accepted results to a CSV file
    Batch {
        #[arg(long, allow_hyphen_values = true)]
        start_seed: i32,
        #[arg(long)]
        count: u32,
        /// Worker threads (default: available parallelism - 1)
        #[arg(long)]
        threads: Option<usize>,
        #[arg(long)]
        range: Option<f32>,
        /// Minimum total of target blocks for a seed to be written
        #[arg(long)]
        min_sum: Option<usize>,
        #[arg(long, value_enum)]
        mode: Option<GenerationMode>,
        /// Output file (default: result_<first>-<last>.csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn parse_point(text: &str) -> Result<Point3<i32>, String> {
    let parts = text
        .split(',')
        .map(|part| part.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid coordinate in {text:?}: {err}"))?;
    match parts.as_slice() {
        [x, y, z] => Ok(Point3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got {text:?}")),
    }
}

fn apply_overrides(config: &mut ScannerConfig, range: Option<f32>, mode: Option<GenerationMode>) {
    if let Some(range) = range {
        config.scan_range = range;
    }
    if let Some(mode) = mode {
        config.generation_mode = mode;
    }
}

fn worker_settings(config: &ScannerConfig, categories: &TargetCategories) -> WorkerSettings {
    WorkerSettings {
        generation_mode: config.generation_mode,
        scan_range: config.scan_range,
        targets: categories.target_set(),
        min_target_block_sum: config.min_target_block_sum,
    }
}

fn print_summary(categories: &TargetCategories, seed: i32, blocks_count: &HashMap<BlockValue, usize>) {
    let total: usize = blocks_count.values().sum();
    let sums = categories.sums(blocks_count);
    println!("{}", categories.header());
    let row: Vec<String> = sums.iter().map(|sum| sum.to_string()).collect();
    println!("{},{},{}", seed, total, row.join(","));
}

fn run_scan(
    config: &ScannerConfig,
    categories: &TargetCategories,
    seed: i32,
    start: Option<Point3<i32>>,
    dig_range: Option<f32>,
    veins: bool,
) -> Result<()> {
    let mut worker = WorldWorker::new(worker_settings(config, categories));
    let mut reporter = LogProgressReporter::new(&terrain_updater::STAGE_NAMES);
    let spawn = worker
        .prepare_world(seed, &mut reporter)
        .with_context(|| format!("failed to generate world {seed}"))?;
    info!("Spawn cell: ({}, {}, {})", spawn.x, spawn.y, spawn.z);

    let targets = categories.target_set();
    let mut scanner = TerrainScanner::new(worker.terrain_mut());
    let start = match start {
        Some(point) => scanner
            .find_nearest_non_air_block(point)
            .ok_or_else(|| anyhow!("no solid block reachable from ({}, {}, {})", point.x, point.y, point.z))?,
        None => spawn,
    };
    info!("Scanning from ({}, {}, {})", start.x, start.y, start.z);

    let started = Instant::now();
    let mut blocks_count: HashMap<BlockValue, usize> = HashMap::new();
    if veins {
        scanner.scan_blocks(
            start,
            &targets,
            |value, position, count| {
                info!("Vein of {} at ({}, {}, {}): {} blocks", value, position.x, position.y, position.z, count);
                *blocks_count.entry(value).or_default() += count;
            },
            dig_range,
        );
    } else {
        scanner.dig_blocks(
            start,
            &targets,
            |value, _| *blocks_count.entry(value).or_default() += 1,
            dig_range,
        );
    }
    info!("Scan finished in {:.3}s", started.elapsed().as_secs_f32());

    if blocks_count.is_empty() {
        info!("No target blocks found");
    }
    print_summary(categories, seed, &blocks_count);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    terrain_scanner::init_logger();

    let mut config = match &cli.config {
        Some(path) => ScannerConfig::load(path).with_context(|| format!("failed to load {}", path.display()))?,
        None => ScannerConfig::default(),
    };

    match cli.command {
        Command::Scan {
            seed,
            range,
            mode,
            start,
            dig_range,
            veins,
        } => {
            apply_overrides(&mut config, range, mode);
            config.validate()?;
            if cli.print_config {
                println!("{}", config.to_json()?);
                return Ok(());
            }
            let categories = config.resolve_targets()?;
            run_scan(&config, &categories, seed, start, dig_range, veins)
        }
        Command::Batch {
            start_seed,
            count,
            threads,
            range,
            min_sum,
            mode,
            output,
        } => {
            apply_overrides(&mut config, range, mode);
            if let Some(min_sum) = min_sum {
                config.min_target_block_sum = min_sum;
            }
            config.validate()?;
            if cli.print_config {
                println!("{}", config.to_json()?);
                return Ok(());
            }
            if count == 0 {
                return Err(anyhow!("--count must be at least 1"));
            }
            let categories = config.resolve_targets()?;

            let last_seed = start_seed.wrapping_add((count - 1) as i32);
            let output = output.unwrap_or_else(|| PathBuf::from(format!("result_{start_seed}-{last_seed}.csv")));
            let mut writer = ResultWriter::open_append(&output, &categories.header())
                .with_context(|| format!("failed to open {}", output.display()))?;

            let settings = BatchSettings {
                start_seed,
                seed_count: count,
                num_workers: threads.unwrap_or_else(task_management::default_worker_count),
                worker: worker_settings(&config, &categories),
            };
            let mut reporter = LogProgressReporter::new(&task_management::STAGE_NAMES);
            let summary = BatchScanHarness::new(settings).run(&mut writer, &categories, &mut reporter)?;
            info!(
                "{} worlds scanned, results appended to {}",
                summary.processed,
                output.display()
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn points_parse_with_negatives() {
        assert_eq!(parse_point("-3, 70,12"), Ok(Point3::new(-3, 70, 12)));
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("a,b,c").is_err());
    }

    #[test]
    fn cli_parses_batch_flags() {
        let cli = Cli::try_parse_from([
            "terrain-scanner",
            "batch",
            "--start-seed",
            "-10",
            "--count",
            "3",
            "--mode",
            "flat",
            "--print-config",
        ])
        .unwrap();
        assert!(cli.print_config);
        match cli.command {
            Command::Batch {
                start_seed, count, mode, ..
            } => {
                assert_eq!(start_seed, -10);
                assert_eq!(count, 3);
                assert_eq!(mode, Some(GenerationMode::Flat));
            }
            Command::Scan { .. } => panic!("expected batch"),
        }
    }
}
