use cgmath::Point3;

use crate::voxels::block::block_side::BlockSide;

/// One oriented face of a terrain cell: the cell plus the side whose outward
/// normal points into the air the face is exposed to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellFace {
    pub point: Point3<i32>,
    pub side: BlockSide,
}

impl CellFace {
    pub fn new(point: Point3<i32>, side: BlockSide) -> Self {
        CellFace { point, side }
    }

    /// The cell this face looks into.
    pub fn facing_point(&self) -> Point3<i32> {
        self.point + self.side.offset()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn faces_with_different_sides_are_distinct() {
        let point = Point3::new(1, 2, 3);
        let top = CellFace::new(point, BlockSide::TOP);
        assert_ne!(top, CellFace::new(point, BlockSide::BOTTOM));
        assert_eq!(top.facing_point(), Point3::new(1, 3, 3));
    }
}
