//! # World Module
//!
//! This module provides the `Terrain` struct which owns the chunks of one
//! world instance and implements `TerrainAccess` over them.
//!
//! ## Architecture
//!
//! The terrain uses sparse storage: only chunks that were allocated are kept
//! in memory, keyed by their chunk coordinates. Each batch worker owns its own
//! `Terrain`, so no locking is involved.

use std::collections::HashMap;

use cgmath::{Point2, Point3};

use super::block::{BlockValue, AIR};
use super::chunk::{to_chunk, to_local, Chunk, ChunkState, CHUNK_HEIGHT};
use super::terrain_access::TerrainAccess;

/// The chunks of one world.
#[derive(Default)]
pub struct Terrain {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<Point2<i32>, Chunk>,
}

impl Terrain {
    /// Creates a new terrain with no chunks allocated.
    pub fn new() -> Self {
        Terrain {
            chunks: HashMap::new(),
        }
    }

    /// Drops every allocated chunk and its cell storage.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// The number of allocated chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Retrieves the chunk at the given chunk coordinates.
    pub fn get_chunk_at(&self, coords: Point2<i32>) -> Option<&Chunk> {
        self.chunks.get(&coords)
    }

    /// Retrieves the chunk at the given chunk coordinates for modification.
    pub fn get_chunk_at_mut(&mut self, coords: Point2<i32>) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coords)
    }

    /// Retrieves the chunk containing the cell column `(x, z)`.
    pub fn get_chunk_at_cell(&self, x: i32, z: i32) -> Option<&Chunk> {
        self.chunks.get(&Point2::new(to_chunk(x), to_chunk(z)))
    }

    fn get_chunk_at_cell_mut(&mut self, x: i32, z: i32) -> Option<&mut Chunk> {
        self.chunks.get_mut(&Point2::new(to_chunk(x), to_chunk(z)))
    }
}

impl TerrainAccess for Terrain {
    fn is_cell_valid(&self, point: Point3<i32>) -> bool {
        (0..CHUNK_HEIGHT).contains(&point.y)
    }

    fn chunk_state_at_cell(&self, x: i32, z: i32) -> Option<ChunkState> {
        self.get_chunk_at_cell(x, z).map(|chunk| chunk.state)
    }

    fn get_cell_value_fast(&self, point: Point3<i32>) -> BlockValue {
        if !self.is_cell_valid(point) {
            return AIR;
        }
        match self.get_chunk_at_cell(point.x, point.z) {
            Some(chunk) => chunk.get_cell_value_fast(to_local(point.x), point.y, to_local(point.z)),
            None => AIR,
        }
    }

    fn set_cell_value_fast(&mut self, point: Point3<i32>, value: BlockValue) {
        if !self.is_cell_valid(point) {
            return;
        }
        if let Some(chunk) = self.get_chunk_at_cell_mut(point.x, point.z) {
            chunk.set_cell_value_fast(to_local(point.x), point.y, to_local(point.z), value);
        }
    }

    fn allocate_chunk(&mut self, coords: Point2<i32>) {
        self.chunks
            .entry(coords)
            .or_insert_with(|| Chunk::new(coords));
    }

    fn allocated_chunks(&self) -> Vec<Point2<i32>> {
        self.chunks.keys().copied().collect()
    }
}
