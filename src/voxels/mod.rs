//! # Voxels Module
//!
//! This module contains the voxel world: packed block values, chunks and
//! their generation state, the sparse `Terrain` container, the procedural
//! generators and the updater that materializes chunks around a spawn point.
//!
//! ## Coordinate System
//!
//! - Cell coordinates: `Point3<i32>` with Y pointing up, valid for `0..256`
//! - Chunk coordinates: `Point2<i32>` on the XZ plane, one chunk per 16x16 cell column
//!
//! Conversions between the two use arithmetic shifts, so negative cells map to
//! negative chunks.

pub mod block;
pub mod chunk;
pub mod generation;
pub mod storage;
pub mod terrain_access;
pub mod terrain_updater;
pub mod world;
