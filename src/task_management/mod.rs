//! # Batch Scan Harness
//!
//! Scans a range of seeds in parallel and streams accepted results to a CSV
//! sink.
//!
//! ## Architecture Overview
//!
//! - Seeds are pushed onto a lock-free `SegQueue` before any worker starts
//! - A fixed pool of worker threads pops seeds until the queue is empty. Each
//!   thread owns its own `WorldWorker`, so no terrain state is shared
//! - Every finished seed produces one `SeedOutcome`, sent over a crossbeam
//!   channel to the calling thread
//! - The calling thread is the only writer of the sink and of the progress
//!   reporter. It drains outcomes as they arrive and flushes after each drain
//!
//! ## Failure Handling
//!
//! A seed whose scan returns an error or panics is logged and counted as
//! failed. The worker moves on to the next seed. If the sink fails, the
//! remaining seeds are discarded, in-flight seeds are allowed to finish, and
//! the write error is returned.

pub mod worker;

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use crossbeam::queue::SegQueue;
use log::{debug, info, warn};
use web_time::Instant;

use crate::config::TargetCategories;
use crate::error::ScanError;
use crate::reporting::{ProgressReporter, ResultWriter};
use worker::{ScanResult, WorkerSettings, WorldWorker};

pub const SCANNING_STAGE: usize = 0;
pub const STAGE_NAMES: [&str; 1] = ["Scanning seeds"];

/// How long the aggregator waits for an outcome before flushing and polling again.
const IDLE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What happened to one seed.
#[derive(Debug)]
pub enum SeedOutcome {
    Accepted(ScanResult),
    BelowThreshold(i32),
    Failed(i32, String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchSummary {
    /// Seeds whose scan finished, whatever the outcome.
    pub processed: usize,
    /// Seeds written to the sink.
    pub accepted: usize,
    /// Seeds whose scan returned an error or panicked.
    pub failed: usize,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct BatchSettings {
    pub start_seed: i32,
    pub seed_count: u32,
    pub num_workers: usize,
    pub worker: WorkerSettings,
}

/// The default worker count: one less than the available parallelism, at least one.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|parallelism| parallelism.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

pub struct BatchScanHarness {
    settings: BatchSettings,
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn run_worker(index: usize, mut worker: WorldWorker, seeds: &SegQueue<i32>, sender: Sender<SeedOutcome>) {
    debug!("Worker {} started", index);
    while let Some(seed) = seeds.pop() {
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| worker.scan(seed))) {
            Ok(Ok(Some(result))) => SeedOutcome::Accepted(result),
            Ok(Ok(None)) => SeedOutcome::BelowThreshold(seed),
            Ok(Err(err)) => SeedOutcome::Failed(seed, err.to_string()),
            Err(payload) => SeedOutcome::Failed(seed, panic_message(payload.as_ref())),
        };
        if sender.send(outcome).is_err() {
            break;
        }
    }
    debug!("Worker {} stopped", index);
}

impl BatchScanHarness {
    pub fn new(settings: BatchSettings) -> Self {
        BatchScanHarness { settings }
    }

    /// Scans every seed with workers built from the configured generation mode.
    pub fn run<W: std::io::Write>(
        &self,
        writer: &mut ResultWriter<W>,
        categories: &TargetCategories,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<BatchSummary, ScanError> {
        let worker_settings = self.settings.worker.clone();
        self.run_with(writer, categories, reporter, || WorldWorker::new(worker_settings.clone()))
    }

    /// Scans every seed, building one worker per thread with `make_worker`.
    pub fn run_with<W, F>(
        &self,
        writer: &mut ResultWriter<W>,
        categories: &TargetCategories,
        reporter: &mut dyn ProgressReporter,
        make_worker: F,
    ) -> Result<BatchSummary, ScanError>
    where
        W: std::io::Write,
        F: Fn() -> WorldWorker + Sync,
    {
        let started = Instant::now();
        let seeds = SegQueue::new();
        for offset in 0..self.settings.seed_count {
            seeds.push(self.settings.start_seed.wrapping_add(offset as i32));
        }
        let total = seeds.len();
        let num_workers = self.settings.num_workers.max(1);
        info!("Scanning {} seeds with {} workers", total, num_workers);

        let (sender, receiver) = channel::unbounded::<SeedOutcome>();
        let mut summary = BatchSummary {
            processed: 0,
            accepted: 0,
            failed: 0,
            elapsed: Duration::ZERO,
        };
        let mut write_error: Option<ScanError> = None;

        reporter.report_max_value(SCANNING_STAGE, total);
        reporter.report_start(SCANNING_STAGE);

        crossbeam::scope(|scope| {
            for index in 0..num_workers {
                let sender = sender.clone();
                let seeds = &seeds;
                let make_worker = &make_worker;
                scope.spawn(move |_| run_worker(index, make_worker(), seeds, sender));
            }
            drop(sender);

            loop {
                let first = match receiver.recv_timeout(IDLE_POLL_INTERVAL) {
                    Ok(outcome) => outcome,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                };
                for outcome in std::iter::once(first).chain(receiver.try_iter()) {
                    summary.processed += 1;
                    match outcome {
                        SeedOutcome::Accepted(result) => {
                            summary.accepted += 1;
                            info!("Seed {}: {} target blocks", result.seed, result.total_blocks_count);
                            if write_error.is_none() {
                                let sums = categories.sums(&result.blocks_count);
                                if let Err(err) = writer.write_result(result.seed, result.total_blocks_count, &sums) {
                                    write_error = Some(err);
                                }
                            }
                        }
                        SeedOutcome::BelowThreshold(seed) => debug!("Seed {}: below threshold", seed),
                        SeedOutcome::Failed(seed, message) => {
                            summary.failed += 1;
                            warn!("Seed {} failed: {}", seed, message);
                        }
                    }
                    reporter.report_value(SCANNING_STAGE, summary.processed);
                }
                if write_error.is_none() {
                    if let Err(err) = writer.flush() {
                        write_error = Some(err);
                    }
                }
                if write_error.is_some() {
                    while seeds.pop().is_some() {}
                }
            }
        })
        .map_err(|_| ScanError::WorkerPanicked)?;

        reporter.report_stop(SCANNING_STAGE);
        summary.elapsed = started.elapsed();

        if let Some(err) = write_error {
            return Err(err);
        }
        info!(
            "{} worlds scanned, {} accepted, {} failed in {:.1}s",
            summary.processed,
            summary.accepted,
            summary.failed,
            summary.elapsed.as_secs_f32()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::ScannerConfig;
    use crate::reporting::SilentProgressReporter;
    use crate::voxels::chunk::Chunk;
    use crate::voxels::generation::{FlatTerrainGenerator, GenerationMode, Reseedable, TerrainContentsGenerator};
    use cgmath::Vector2;
    use std::collections::HashSet;
    use std::io;

    const PANIC_SEED: i32 = 102;
    const EMPTY_SEED: i32 = 103;

    /// Flat terrain, except one seed panics and another generates nothing.
    struct FaultyGenerator {
        inner: FlatTerrainGenerator,
        seed: i32,
    }

    impl Reseedable for FaultyGenerator {
        fn apply_seed(&mut self, seed: i32) {
            self.seed = seed;
            self.inner.apply_seed(seed);
        }
    }

    impl TerrainContentsGenerator for FaultyGenerator {
        fn find_coarse_spawn_position(&self) -> Vector2<f32> {
            if self.seed == PANIC_SEED {
                panic!("generator failure");
            }
            self.inner.find_coarse_spawn_position()
        }
        fn generate_chunk_contents_pass1(&self, chunk: &mut Chunk) {
            if self.seed != EMPTY_SEED {
                self.inner.generate_chunk_contents_pass1(chunk);
            }
        }
        fn generate_chunk_contents_pass2(&self, chunk: &mut Chunk) {
            self.inner.generate_chunk_contents_pass2(chunk);
        }
        fn generate_chunk_contents_pass3(&self, chunk: &mut Chunk) {
            self.inner.generate_chunk_contents_pass3(chunk);
        }
        fn generate_chunk_contents_pass4(&self, chunk: &mut Chunk) {
            self.inner.generate_chunk_contents_pass4(chunk);
        }
    }

    struct FailingSink;

    impl io::Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn settings(min_target_block_sum: usize) -> (BatchSettings, TargetCategories) {
        let categories = ScannerConfig::default().resolve_targets().unwrap();
        let settings = BatchSettings {
            start_seed: 100,
            seed_count: 5,
            num_workers: 2,
            worker: WorkerSettings {
                generation_mode: GenerationMode::Flat,
                scan_range: 16.0,
                targets: categories.target_set(),
                min_target_block_sum,
            },
        };
        (settings, categories)
    }

    #[test]
    fn every_seed_is_written_once() {
        let (settings, categories) = settings(0);
        let mut writer = ResultWriter::new(Vec::new());
        let summary = BatchScanHarness::new(settings)
            .run(&mut writer, &categories, &mut SilentProgressReporter)
            .unwrap();
        assert_eq!(summary.processed, 5);
        assert_eq!(summary.accepted, 5);
        assert_eq!(summary.failed, 0);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let seeds: HashSet<i32> = text
            .lines()
            .map(|line| line.split(',').next().unwrap().parse().unwrap())
            .collect();
        assert_eq!(text.lines().count(), 5);
        assert_eq!(seeds, (100..=104).collect());
        for line in text.lines() {
            assert_eq!(line.split(',').count(), 2 + categories.categories.len());
        }
    }

    #[test]
    fn below_threshold_seeds_are_processed_but_not_written() {
        let (settings, categories) = settings(usize::MAX);
        let mut writer = ResultWriter::new(Vec::new());
        let summary = BatchScanHarness::new(settings)
            .run(&mut writer, &categories, &mut SilentProgressReporter)
            .unwrap();
        assert_eq!(summary.processed, 5);
        assert_eq!(summary.accepted, 0);
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn failing_seeds_are_skipped() {
        let (settings, categories) = settings(0);
        let worker_settings = settings.worker.clone();
        let mut writer = ResultWriter::new(Vec::new());
        let summary = BatchScanHarness::new(settings)
            .run_with(&mut writer, &categories, &mut SilentProgressReporter, || {
                let generator = FaultyGenerator {
                    inner: FlatTerrainGenerator::new(0),
                    seed: 0,
                };
                WorldWorker::with_generator(worker_settings.clone(), Box::new(generator))
            })
            .unwrap();
        assert_eq!(summary.processed, 5);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.accepted, 3);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert!(!text.lines().any(|line| line.starts_with("102,") || line.starts_with("103,")));
    }

    #[test]
    fn sink_errors_stop_the_batch() {
        let (settings, categories) = settings(0);
        let mut writer = ResultWriter::new(FailingSink);
        let result = BatchScanHarness::new(settings).run(&mut writer, &categories, &mut SilentProgressReporter);
        assert!(matches!(result, Err(ScanError::Io(_))));
    }
}
