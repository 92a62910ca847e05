//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 16x256x16 column of terrain
//! cells together with its generation state.
//!
//! ## Storage
//!
//! Cells are stored densely as packed `BlockValue`s. The index of the cell at
//! chunk-local `(x, y, z)` is `y + x * CHUNK_HEIGHT + z * CHUNK_HEIGHT * CHUNK_DIMENSION`,
//! so a single column is contiguous, which keeps top-down column scans cheap.
//!
//! ## Readiness
//!
//! A chunk moves through `ChunkState` one step at a time as generation passes
//! run. Cell data is only trustworthy once a chunk reaches
//! `ChunkState::LightPending`; anything earlier is treated as if the chunk did
//! not exist.

use cgmath::{Point2, Vector2};

use super::block::{is_air, BlockValue, AIR};

/// The horizontal dimension (width and depth) of a chunk in cells.
pub const CHUNK_DIMENSION: i32 = 16;
/// The vertical dimension of a chunk in cells.
pub const CHUNK_HEIGHT: i32 = 256;
/// The total number of cells in a chunk.
pub const CHUNK_SIZE: usize = (CHUNK_DIMENSION * CHUNK_DIMENSION * CHUNK_HEIGHT) as usize;

const CHUNK_SHIFT: i32 = 4;
const LOCAL_MASK: i32 = CHUNK_DIMENSION - 1;

/// Generation progress of a chunk.
///
/// States are ordered: comparing with `>=` answers "has the chunk got at least
/// this far". A chunk never skips a state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChunkState {
    /// Allocated but neither loaded from storage nor generated.
    NotLoaded,
    /// Waiting for the first generation pass (base terrain).
    ContentsPending1,
    /// Waiting for the second generation pass.
    ContentsPending2,
    /// Waiting for the third generation pass.
    ContentsPending3,
    /// Waiting for the fourth generation pass.
    ContentsPending4,
    /// Contents are complete; only lighting is outstanding.
    LightPending,
    /// Fully ready.
    Valid,
}

impl ChunkState {
    /// Whether cell data in a chunk at this state may be read by the scanner.
    #[inline]
    pub fn is_crawlable(self) -> bool {
        self >= ChunkState::LightPending
    }
}

/// Converts a cell coordinate on one horizontal axis to its chunk coordinate.
#[inline]
pub fn to_chunk(cell: i32) -> i32 {
    cell >> CHUNK_SHIFT
}

/// Converts a cell coordinate on one horizontal axis to its chunk-local offset.
#[inline]
pub fn to_local(cell: i32) -> i32 {
    cell & LOCAL_MASK
}

/// The horizontal center, in world space, of the chunk at chunk coordinates `coords`.
pub fn chunk_center(coords: Point2<i32>) -> Point2<f32> {
    let half = CHUNK_DIMENSION as f32 / 2.0;
    Point2::new(
        (coords.x * CHUNK_DIMENSION) as f32,
        (coords.y * CHUNK_DIMENSION) as f32,
    ) + Vector2::new(half, half)
}

/// A 16x256x16 column of terrain cells.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not cell coordinates).
    pub coords: Point2<i32>,

    /// How far generation has progressed.
    pub state: ChunkState,

    /// Dense cell storage, see the module docs for the layout.
    cells: Vec<BlockValue>,
}

impl Chunk {
    /// Creates a new, unloaded chunk filled with air.
    pub fn new(coords: Point2<i32>) -> Self {
        Chunk {
            coords,
            state: ChunkState::NotLoaded,
            cells: vec![AIR; CHUNK_SIZE],
        }
    }

    /// The cell coordinates of the chunk's minimum corner on the XZ plane.
    pub fn origin(&self) -> Point2<i32> {
        Point2::new(
            self.coords.x * CHUNK_DIMENSION,
            self.coords.y * CHUNK_DIMENSION,
        )
    }

    /// The horizontal center of the chunk in world space.
    pub fn center(&self) -> Point2<f32> {
        chunk_center(self.coords)
    }

    #[inline]
    fn index(x: i32, y: i32, z: i32) -> usize {
        (y + x * CHUNK_HEIGHT + z * CHUNK_HEIGHT * CHUNK_DIMENSION) as usize
    }

    /// Gets the value of the cell at chunk-local coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the chunk.
    #[inline]
    pub fn get_cell_value_fast(&self, x: i32, y: i32, z: i32) -> BlockValue {
        self.cells[Self::index(x, y, z)]
    }

    /// Sets the value of the cell at chunk-local coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are outside the chunk.
    #[inline]
    pub fn set_cell_value_fast(&mut self, x: i32, y: i32, z: i32, value: BlockValue) {
        self.cells[Self::index(x, y, z)] = value;
    }

    /// The contiguous column of cells at chunk-local `(x, z)`, bottom first.
    pub fn column(&self, x: i32, z: i32) -> &[BlockValue] {
        let start = Self::index(x, 0, z);
        &self.cells[start..start + CHUNK_HEIGHT as usize]
    }

    /// Fills cells `y_min..=y_max` of the column at chunk-local `(x, z)`.
    pub fn fill_column(&mut self, x: i32, z: i32, y_min: i32, y_max: i32, value: BlockValue) {
        let y_min = y_min.max(0);
        let y_max = y_max.min(CHUNK_HEIGHT - 1);
        if y_min > y_max {
            return;
        }
        let start = Self::index(x, y_min, z);
        let end = Self::index(x, y_max, z);
        self.cells[start..=end].fill(value);
    }

    /// The height of the highest non-air cell in the column at chunk-local
    /// `(x, z)`, or `None` if the column is entirely air.
    pub fn top_height(&self, x: i32, z: i32) -> Option<i32> {
        self.column(x, z)
            .iter()
            .rposition(|&value| !is_air(value))
            .map(|y| y as i32)
    }

    /// Counts the cells holding exactly `value`.
    pub fn count_value(&self, value: BlockValue) -> usize {
        self.cells.iter().filter(|&&cell| cell == value).count()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn negative_cells_map_to_negative_chunks() {
        assert_eq!(to_chunk(-1), -1);
        assert_eq!(to_local(-1), 15);
        assert_eq!(to_chunk(16), 1);
        assert_eq!(to_local(16), 0);
    }

    #[test]
    fn column_is_contiguous() {
        let mut chunk = Chunk::new(Point2::new(0, 0));
        chunk.fill_column(3, 7, 0, 9, 2);
        assert_eq!(&chunk.column(3, 7)[..10], &[2; 10]);
        assert_eq!(chunk.get_cell_value_fast(3, 10, 7), AIR);
        assert_eq!(chunk.count_value(2), 10);
        assert_eq!(chunk.top_height(3, 7), Some(9));
        assert_eq!(chunk.top_height(0, 0), None);
    }

    #[test]
    fn states_are_ordered() {
        assert!(!ChunkState::ContentsPending4.is_crawlable());
        assert!(ChunkState::LightPending.is_crawlable());
        assert!(ChunkState::Valid.is_crawlable());
        assert!(ChunkState::NotLoaded < ChunkState::ContentsPending1);
    }

    #[test]
    fn center_of_negative_chunk() {
        let chunk = Chunk::new(Point2::new(-1, 2));
        assert_eq!(chunk.center(), Point2::new(-8.0, 40.0));
    }
}
