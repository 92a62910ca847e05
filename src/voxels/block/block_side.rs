//! # Block Side Module
//!
//! This module defines the six faces of a voxel cell and the fixed lookup
//! tables the surface crawler needs: the outward offset of each face, the
//! opposite face, and the four tangent directions of each face normal.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel cell.
///
/// Each variant is assigned a stable integer value so it can index the lookup
/// tables below. Horizontal faces go around the cell in order, which makes the
/// opposite of a horizontal face the one two steps away.
///
/// The order is: [FRONT, RIGHT, BACK, LEFT, TOP, BOTTOM]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The right face (facing positive X)
    RIGHT = 1,

    /// The back face (facing negative Z)
    BACK = 2,

    /// The left face (facing negative X)
    LEFT = 3,

    /// The top face (facing positive Y)
    TOP = 4,

    /// The bottom face (facing negative Y)
    BOTTOM = 5,
}

/// For each face normal, the four faces whose normals are orthogonal to it.
static TANGENTS: [[BlockSide; 4]; 6] = [
    [BlockSide::RIGHT, BlockSide::LEFT, BlockSide::TOP, BlockSide::BOTTOM],
    [BlockSide::FRONT, BlockSide::BACK, BlockSide::TOP, BlockSide::BOTTOM],
    [BlockSide::RIGHT, BlockSide::LEFT, BlockSide::TOP, BlockSide::BOTTOM],
    [BlockSide::FRONT, BlockSide::BACK, BlockSide::TOP, BlockSide::BOTTOM],
    [BlockSide::FRONT, BlockSide::RIGHT, BlockSide::BACK, BlockSide::LEFT],
    [BlockSide::FRONT, BlockSide::RIGHT, BlockSide::BACK, BlockSide::LEFT],
];

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, RIGHT, BACK, LEFT, TOP, BOTTOM]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::RIGHT,
            BlockSide::BACK,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
        ]
    }

    /// The unit offset from a cell to the neighbor this face looks at.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
        }
    }

    /// The face pointing the other way.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::BOTTOM => BlockSide::TOP,
        }
    }

    /// The four faces orthogonal to this one.
    ///
    /// Crawling across a surface only ever moves along these directions.
    pub fn tangents(self) -> &'static [BlockSide; 4] {
        &TANGENTS[self as usize]
    }
}
