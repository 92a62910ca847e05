//! # Terrain Access
//!
//! The narrow contract the scanner needs from a terrain: cell validity, chunk
//! readiness, fast cell reads and writes, and chunk allocation. The scanner is
//! generic over this trait and never generates or persists terrain itself.

use cgmath::{Point2, Point3};

use super::block::{is_air, BlockValue};
use super::chunk::ChunkState;

pub trait TerrainAccess {
    /// Whether `point` lies inside the vertical bounds of the world.
    fn is_cell_valid(&self, point: Point3<i32>) -> bool;

    /// The state of the chunk containing the cell column `(x, z)`, or `None`
    /// if no chunk is allocated there.
    fn chunk_state_at_cell(&self, x: i32, z: i32) -> Option<ChunkState>;

    /// Reads a cell without checking chunk readiness.
    ///
    /// Cells in missing chunks and invalid cells read as air.
    fn get_cell_value_fast(&self, point: Point3<i32>) -> BlockValue;

    /// Writes a cell without checking chunk readiness. Writes to missing
    /// chunks or invalid cells are ignored.
    fn set_cell_value_fast(&mut self, point: Point3<i32>, value: BlockValue);

    /// Allocates an empty, unloaded chunk at chunk coordinates `coords` if
    /// none exists yet.
    fn allocate_chunk(&mut self, coords: Point2<i32>);

    /// The coordinates of every allocated chunk.
    fn allocated_chunks(&self) -> Vec<Point2<i32>>;

    /// Reads a cell only if it is valid and its chunk is crawlable.
    fn get_ready_cell_value(&self, point: Point3<i32>) -> Option<BlockValue> {
        if !self.is_cell_valid(point) {
            return None;
        }
        match self.chunk_state_at_cell(point.x, point.z) {
            Some(state) if state.is_crawlable() => Some(self.get_cell_value_fast(point)),
            _ => None,
        }
    }

    /// Whether `point` is confirmed air in a crawlable chunk.
    fn is_valid_air(&self, point: Point3<i32>) -> bool {
        self.get_ready_cell_value(point).map_or(false, is_air)
    }

    /// Whether `point` is confirmed solid in a crawlable chunk.
    fn is_valid_not_air(&self, point: Point3<i32>) -> bool {
        self.get_ready_cell_value(point)
            .map_or(false, |value| !is_air(value))
    }
}
