#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Terrain Scanner
//!
//! Locates and counts target blocks in procedurally generated voxel worlds
//! without visiting every cell: the scanner crawls only the connected surface
//! of solid terrain reachable from a start cell, optionally digging out
//! matched blocks and following their veins.
//!
//! ## Key Modules
//!
//! * `voxels` - Block values, chunks, terrain storage, generators and chunk materialization
//! * `scanning` - The surface crawler with its `dig` and `scan` operations
//! * `task_management` - Per-world workers and the parallel batch harness
//! * `reporting` - Progress reporting and the CSV result sink
//! * `config` - Scanner settings and the target catalog
//!
//! ## Usage
//!
//! ```text
//! terrain-scanner scan --seed 12345
//! terrain-scanner batch --start-seed 0 --count 10000 --threads 7
//! ```
//!
//! Logging goes through the `log` facade; the binary routes it to stdout with
//! `env_logger`, filtered by `RUST_LOG`.

pub mod config;
pub mod error;
pub mod reporting;
pub mod scanning;
pub mod task_management;
pub mod voxels;

pub use error::ScanError;

/// Initializes `env_logger` on stdout at `info`, overridable with `RUST_LOG`.
///
/// # Panics
/// Panics if a logger has already been installed.
pub fn init_logger() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();
    log::debug!("Logger initialized");
}
