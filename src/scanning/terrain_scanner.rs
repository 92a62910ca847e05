//! # Terrain Scanner
//!
//! Breadth-first traversal over exposed faces of solid terrain, combined with
//! a 6-connected flood fill over veins of identical target values.
//!
//! ## Crawling
//!
//! The traversal starts from the faces of the start cell that look into
//! confirmed air. From every non-target face it moves along the four tangents
//! of the face normal. For a tangent `t` with `neighbor = cell + t` and
//! `diagonal = neighbor + normal`:
//! - `diagonal` is solid: the surface turns inward (concave corner), continue
//!   on `diagonal` facing `-t`
//! - `neighbor` is air: the surface wraps around the cell (convex corner),
//!   continue on the same cell facing `t`
//! - `neighbor` is solid: the surface is flat, continue on `neighbor` with the
//!   same normal
//!
//! Cells that are out of bounds or in chunks that are not crawlable yet are
//! neither air nor solid, and the crawl never crosses them.
//!
//! ## Veins
//!
//! When a crawled face belongs to a target cell, the whole 6-connected vein of
//! that exact value is handled at once. `dig` clears the vein and queues the
//! faces it exposes on adjacent solids. `scan` only counts the vein and
//! remembers its cells so they are never counted twice.

use std::collections::{HashSet, VecDeque};

use cgmath::Point3;

use super::cell_face::CellFace;
use crate::voxels::block::block_side::BlockSide;
use crate::voxels::block::{is_air, BlockValue, TargetSet, AIR};
use crate::voxels::chunk::CHUNK_HEIGHT;
use crate::voxels::terrain_access::TerrainAccess;

pub struct TerrainScanner<'a, T: TerrainAccess> {
    terrain: &'a mut T,
}

fn distance_squared(a: Point3<i32>, b: Point3<i32>) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    let dz = (a.z - b.z) as i64;
    dx * dx + dy * dy + dz * dz
}

impl<'a, T: TerrainAccess> TerrainScanner<'a, T> {
    pub fn new(terrain: &'a mut T) -> Self {
        TerrainScanner { terrain }
    }

    /// Digs every target cell reachable over the surface from `start`.
    ///
    /// Each dug cell is set to air and reported once through `on_block_dug`
    /// with its value before digging.
    ///
    /// # Arguments
    /// * `start` - The cell to start crawling from
    /// * `targets` - The block values to dig
    /// * `on_block_dug` - Called with `(value, position)` for every dug cell
    /// * `range` - Maximum distance from `start` the crawl may move to, `None` for unbounded
    pub fn dig_blocks<F>(&mut self, start: Point3<i32>, targets: &TargetSet, mut on_block_dug: F, range: Option<f32>)
    where
        F: FnMut(BlockValue, Point3<i32>),
    {
        let range_squared = range.map(|range| range as f64 * range as f64);
        let mut visited: HashSet<CellFace> = HashSet::new();
        let mut queue = self.seed_faces(start);

        while let Some(face) = queue.pop_front() {
            let value = self.terrain.get_cell_value_fast(face.point);
            if is_air(value) || visited.contains(&face) {
                continue;
            }
            if targets.contains(&value) {
                self.dig_continuous_blocks(face.point, value, &mut on_block_dug, &mut queue);
            } else {
                visited.insert(face);
                self.crawl_tangents(face, start, range_squared, &mut queue);
            }
        }
    }

    /// Clears the vein of `target` cells containing `start`.
    ///
    /// Cells are cleared when queued, so each is reported exactly once. Solid
    /// non-target neighbors get their newly exposed face pushed onto
    /// `surface_queue`.
    fn dig_continuous_blocks<F>(
        &mut self,
        start: Point3<i32>,
        target: BlockValue,
        on_block_dug: &mut F,
        surface_queue: &mut VecDeque<CellFace>,
    ) where
        F: FnMut(BlockValue, Point3<i32>),
    {
        let mut vein_queue = VecDeque::new();
        self.terrain.set_cell_value_fast(start, AIR);
        on_block_dug(target, start);
        vein_queue.push_back(start);

        while let Some(current) = vein_queue.pop_front() {
            for side in BlockSide::all() {
                let neighbor = current + side.offset();
                let Some(value) = self.terrain.get_ready_cell_value(neighbor) else {
                    continue;
                };
                if value == target {
                    self.terrain.set_cell_value_fast(neighbor, AIR);
                    on_block_dug(target, neighbor);
                    vein_queue.push_back(neighbor);
                } else if !is_air(value) {
                    surface_queue.push_back(CellFace::new(neighbor, side.opposite()));
                }
            }
        }
    }

    /// Reports every vein of target cells reachable over the surface from
    /// `start` without modifying the terrain.
    ///
    /// # Arguments
    /// * `start` - The cell to start crawling from
    /// * `targets` - The block values to look for
    /// * `on_vein_found` - Called once per vein with `(value, first cell found, cell count)`
    /// * `range` - Maximum distance from `start` the crawl may move to, `None` for unbounded
    pub fn scan_blocks<F>(&self, start: Point3<i32>, targets: &TargetSet, mut on_vein_found: F, range: Option<f32>)
    where
        F: FnMut(BlockValue, Point3<i32>, usize),
    {
        let range_squared = range.map(|range| range as f64 * range as f64);
        let mut visited: HashSet<CellFace> = HashSet::new();
        let mut scanned: HashSet<Point3<i32>> = HashSet::new();
        let mut queue = self.seed_faces(start);

        while let Some(face) = queue.pop_front() {
            let value = self.terrain.get_cell_value_fast(face.point);
            if is_air(value) || visited.contains(&face) {
                continue;
            }
            if targets.contains(&value) && !scanned.contains(&face.point) {
                let count = self.count_continuous_blocks(face.point, value, &mut scanned);
                on_vein_found(value, face.point, count);
            }
            visited.insert(face);
            self.crawl_tangents(face, start, range_squared, &mut queue);
        }
    }

    /// Counts the vein of `target` cells containing `start`, adding every
    /// counted cell to `scanned`.
    fn count_continuous_blocks(
        &self,
        start: Point3<i32>,
        target: BlockValue,
        scanned: &mut HashSet<Point3<i32>>,
    ) -> usize {
        let mut vein_queue = VecDeque::new();
        scanned.insert(start);
        vein_queue.push_back(start);
        let mut count = 0;

        while let Some(current) = vein_queue.pop_front() {
            count += 1;
            for side in BlockSide::all() {
                let neighbor = current + side.offset();
                if scanned.contains(&neighbor) {
                    continue;
                }
                if self.terrain.get_ready_cell_value(neighbor) == Some(target) {
                    scanned.insert(neighbor);
                    vein_queue.push_back(neighbor);
                }
            }
        }
        count
    }

    /// The faces of `start` that look into confirmed air.
    fn seed_faces(&self, start: Point3<i32>) -> VecDeque<CellFace> {
        BlockSide::all()
            .into_iter()
            .map(|side| CellFace::new(start, side))
            .filter(|face| self.terrain.is_valid_air(face.facing_point()))
            .collect()
    }

    /// Queues the faces adjacent to `face` along its four tangents.
    fn crawl_tangents(
        &self,
        face: CellFace,
        start: Point3<i32>,
        range_squared: Option<f64>,
        queue: &mut VecDeque<CellFace>,
    ) {
        let normal = face.side.offset();
        for &tangent in face.side.tangents() {
            let neighbor = face.point + tangent.offset();
            if let Some(range_squared) = range_squared {
                if distance_squared(neighbor, start) as f64 > range_squared {
                    continue;
                }
            }

            // concave
            let diagonal = neighbor + normal;
            if self.terrain.is_valid_not_air(diagonal) {
                queue.push_back(CellFace::new(diagonal, tangent.opposite()));
                continue;
            }

            match self.terrain.get_ready_cell_value(neighbor) {
                None => {}
                // convex
                Some(value) if is_air(value) => queue.push_back(CellFace::new(face.point, tangent)),
                // flat
                Some(_) => queue.push_back(CellFace::new(neighbor, face.side)),
            }
        }
    }

    /// The height of the highest non-air cell in the column at `(x, z)`.
    ///
    /// # Returns
    /// `None` if the column's chunk is missing or not crawlable yet, or if the
    /// column is entirely air.
    pub fn find_topmost_height(&self, x: i32, z: i32) -> Option<i32> {
        match self.terrain.chunk_state_at_cell(x, z) {
            Some(state) if state.is_crawlable() => {}
            _ => return None,
        }
        (0..CHUNK_HEIGHT)
            .rev()
            .find(|&y| !is_air(self.terrain.get_cell_value_fast(Point3::new(x, y, z))))
    }

    /// Breadth-first search through air cells for the closest solid cell.
    ///
    /// Unlike the surface crawl this walks the air volume itself. It stops at
    /// cells that are out of bounds or in chunks that are not crawlable.
    ///
    /// # Returns
    /// The first solid cell reached, or `None` if the reachable air is
    /// exhausted first.
    pub fn find_nearest_non_air_block(&self, start: Point3<i32>) -> Option<Point3<i32>> {
        let mut seen: HashSet<Point3<i32>> = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);

        while let Some(point) = queue.pop_front() {
            let Some(value) = self.terrain.get_ready_cell_value(point) else {
                continue;
            };
            if !is_air(value) {
                return Some(point);
            }
            for side in BlockSide::all() {
                let neighbor = point + side.offset();
                if seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::voxels::block::block_type::BlockType;
    use crate::voxels::chunk::ChunkState;
    use crate::voxels::world::Terrain;
    use cgmath::Point2;
    use std::collections::HashMap;

    const GROUND: i32 = 5;

    /// 3x3 crawlable chunks around the origin, solid stone up to `GROUND`.
    fn flat_terrain() -> Terrain {
        let mut terrain = Terrain::new();
        for cx in -1..=1 {
            for cz in -1..=1 {
                let coords = Point2::new(cx, cz);
                terrain.allocate_chunk(coords);
                let chunk = terrain.get_chunk_at_mut(coords).unwrap();
                for z in 0..16 {
                    for x in 0..16 {
                        chunk.fill_column(x, z, 0, GROUND, BlockType::STONE.value());
                    }
                }
                chunk.state = ChunkState::LightPending;
            }
        }
        terrain
    }

    fn targets(values: &[BlockValue]) -> TargetSet {
        values.iter().copied().collect()
    }

    fn dig(terrain: &mut Terrain, start: Point3<i32>, targets: &TargetSet, range: Option<f32>) -> Vec<(BlockValue, Point3<i32>)> {
        let mut dug = Vec::new();
        TerrainScanner::new(terrain).dig_blocks(start, targets, |value, point| dug.push((value, point)), range);
        dug
    }

    fn scan(terrain: &mut Terrain, start: Point3<i32>, targets: &TargetSet, range: Option<f32>) -> Vec<(BlockValue, Point3<i32>, usize)> {
        let mut veins = Vec::new();
        TerrainScanner::new(terrain).scan_blocks(start, targets, |value, point, count| veins.push((value, point, count)), range);
        veins
    }

    fn three_cell_vein() -> (Terrain, BlockValue, [Point3<i32>; 3]) {
        let mut terrain = flat_terrain();
        let value = BlockType::IRON_ORE.value();
        let cells = [Point3::new(0, 5, 0), Point3::new(1, 5, 0), Point3::new(2, 5, 0)];
        for cell in cells {
            terrain.set_cell_value_fast(cell, value);
        }
        (terrain, value, cells)
    }

    #[test]
    fn scan_reports_exposed_vein_once() {
        let (mut terrain, value, cells) = three_cell_vein();
        let veins = scan(&mut terrain, cells[0], &targets(&[value]), None);
        assert_eq!(veins, vec![(value, cells[0], 3)]);
        for cell in cells {
            assert_eq!(terrain.get_cell_value_fast(cell), value);
        }
    }

    #[test]
    fn dig_clears_exposed_vein() {
        let (mut terrain, value, cells) = three_cell_vein();
        let mut dug = dig(&mut terrain, cells[0], &targets(&[value]), None);
        dug.sort_by_key(|(_, point)| point.x);
        assert_eq!(dug, cells.iter().map(|cell| (value, *cell)).collect::<Vec<_>>());
        for cell in cells {
            assert_eq!(terrain.get_cell_value_fast(cell), AIR);
        }
    }

    #[test]
    fn sealed_cavity_is_never_reached() {
        let mut terrain = flat_terrain();
        let value = BlockType::DIAMOND_ORE.value();
        let exposed = Point3::new(4, GROUND, 4);
        let buried = Point3::new(8, 2, 8);
        terrain.set_cell_value_fast(exposed, value);
        terrain.set_cell_value_fast(buried, value);

        let start = Point3::new(0, GROUND, 0);
        let set = targets(&[value]);
        assert_eq!(scan(&mut terrain, start, &set, None), vec![(value, exposed, 1)]);
        assert_eq!(dig(&mut terrain, start, &set, None), vec![(value, exposed)]);
        assert_eq!(terrain.get_cell_value_fast(buried), value);
    }

    #[test]
    fn digging_exposes_the_next_layer() {
        let mut terrain = flat_terrain();
        let ore = BlockType::COAL_ORE.value();
        let copper = BlockType::COPPER_ORE.value();
        // a coal shaft reaching down to a copper cell that is sealed until the coal is gone
        for y in 3..=GROUND {
            terrain.set_cell_value_fast(Point3::new(6, y, 6), ore);
        }
        terrain.set_cell_value_fast(Point3::new(7, 3, 6), copper);

        let dug = dig(&mut terrain, Point3::new(0, GROUND, 0), &targets(&[ore, copper]), None);
        let mut counts: HashMap<BlockValue, usize> = HashMap::new();
        for (value, _) in &dug {
            *counts.entry(*value).or_default() += 1;
        }
        assert_eq!(counts.get(&ore), Some(&3));
        assert_eq!(counts.get(&copper), Some(&1));

        let unique: HashSet<Point3<i32>> = dug.iter().map(|(_, point)| *point).collect();
        assert_eq!(unique.len(), dug.len());
    }

    #[test]
    fn range_limits_the_crawl() {
        let mut terrain = flat_terrain();
        let value = BlockType::SULPHUR_ORE.value();
        let far = Point3::new(20, GROUND, 0);
        terrain.set_cell_value_fast(far, value);
        let start = Point3::new(0, GROUND, 0);
        let set = targets(&[value]);

        assert!(scan(&mut terrain, start, &set, Some(5.0)).is_empty());
        assert!(dig(&mut terrain, start, &set, Some(5.0)).is_empty());
        assert_eq!(dig(&mut terrain, start, &set, None), vec![(value, far)]);
    }

    #[test]
    fn crawl_stops_at_unready_chunks() {
        let mut terrain = flat_terrain();
        terrain.get_chunk_at_mut(Point2::new(1, 0)).unwrap().state = ChunkState::ContentsPending4;
        let value = BlockType::IRON_ORE.value();
        for x in 14..=17 {
            terrain.set_cell_value_fast(Point3::new(x, GROUND, 0), value);
        }

        let mut dug = dig(&mut terrain, Point3::new(14, GROUND, 0), &targets(&[value]), None);
        dug.sort_by_key(|(_, point)| point.x);
        assert_eq!(dug, vec![(value, Point3::new(14, GROUND, 0)), (value, Point3::new(15, GROUND, 0))]);
        assert_eq!(terrain.get_cell_value_fast(Point3::new(16, GROUND, 0)), value);
    }

    #[test]
    fn enclosed_start_finds_nothing() {
        let mut terrain = flat_terrain();
        let value = BlockType::COAL_ORE.value();
        terrain.set_cell_value_fast(Point3::new(0, GROUND, 1), value);
        let enclosed = Point3::new(0, 2, 0);
        let set = targets(&[value]);
        assert!(scan(&mut terrain, enclosed, &set, None).is_empty());
        assert!(dig(&mut terrain, enclosed, &set, None).is_empty());
    }

    #[test]
    fn topmost_height_requires_ready_chunk() {
        let mut terrain = flat_terrain();
        terrain.set_cell_value_fast(Point3::new(3, 40, 3), BlockType::WOOD.value());
        terrain.get_chunk_at_mut(Point2::new(-1, 0)).unwrap().state = ChunkState::ContentsPending2;

        let scanner = TerrainScanner::new(&mut terrain);
        assert_eq!(scanner.find_topmost_height(3, 3), Some(40));
        assert_eq!(scanner.find_topmost_height(4, 3), Some(GROUND));
        assert_eq!(scanner.find_topmost_height(-3, 3), None);
        assert_eq!(scanner.find_topmost_height(100, 3), None);
    }

    #[test]
    fn nearest_non_air_block_searches_air() {
        let mut terrain = flat_terrain();
        let scanner = TerrainScanner::new(&mut terrain);
        assert_eq!(
            scanner.find_nearest_non_air_block(Point3::new(2, 9, 2)),
            Some(Point3::new(2, GROUND, 2))
        );
        assert_eq!(
            scanner.find_nearest_non_air_block(Point3::new(2, 1, 2)),
            Some(Point3::new(2, 1, 2))
        );
        assert_eq!(scanner.find_nearest_non_air_block(Point3::new(500, 9, 500)), None);
    }
}
