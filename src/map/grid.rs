//! The immutable maze grid and its world-space conversions.

use bevy_ecs::resource::Resource;
use glam::{IVec2, Vec3};
use smallvec::SmallVec;
use tracing::debug;

use crate::constants::{collider::WALL_HEIGHT, TILE_SIZE};
use crate::error::GameResult;
use crate::map::collider::{Aabb, ColliderSet};
use crate::map::direction::Direction;
use crate::map::parser::{LayoutParser, TileKind};

/// A grid coordinate: `x` is the column, `y` is the row (world Z).
pub type GridCell = IVec2;

/// Static maze representation, shared read-only by every system.
///
/// Tile centres sit on integer multiples of the tile size, so cell `(c, r)` covers world
/// `[c*T - T/2, c*T + T/2]` on X and the same on Z. Anything outside the grid reads as a
/// wall.
#[derive(Resource, Debug, Clone)]
pub struct GridMap {
    width: usize,
    height: usize,
    tile_size: f32,
    tiles: Vec<TileKind>,
}

impl GridMap {
    /// Builds a grid from a raw layout using the default tile size.
    pub fn parse(rows: &[&str]) -> GameResult<Self> {
        let parsed = LayoutParser::parse_layout(rows)?;
        debug!(width = parsed.width, height = parsed.height, "Parsed maze layout");
        Ok(Self {
            width: parsed.width,
            height: parsed.height,
            tile_size: TILE_SIZE,
            tiles: parsed.tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        let in_range = cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height;
        in_range.then(|| cell.y as usize * self.width + cell.x as usize)
    }

    /// The tile at `cell`; out-of-range cells are walls.
    pub fn tile_at(&self, cell: GridCell) -> TileKind {
        self.index(cell).map_or(TileKind::Wall, |i| self.tiles[i])
    }

    pub fn is_walkable(&self, cell: GridCell) -> bool {
        self.tile_at(cell).is_walkable()
    }

    /// World position of a cell's centre, on the floor.
    pub fn cell_to_world(&self, cell: GridCell) -> Vec3 {
        Vec3::new(cell.x as f32 * self.tile_size, 0.0, cell.y as f32 * self.tile_size)
    }

    /// The cell whose centre is nearest to `world`. Used to snap agents and targets onto
    /// the path graph.
    pub fn nearest_cell(&self, world: Vec3) -> GridCell {
        IVec2::new(
            (world.x / self.tile_size).round() as i32,
            (world.z / self.tile_size).round() as i32,
        )
    }

    /// The cell whose box contains `world`. Used to find the wall tiles a box may touch.
    pub fn containing_cell(&self, world: Vec3) -> GridCell {
        let half = self.tile_size * 0.5;
        IVec2::new(
            ((world.x + half) / self.tile_size).floor() as i32,
            ((world.z + half) / self.tile_size).floor() as i32,
        )
    }

    /// Every cell with its tile, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (GridCell, TileKind)> + '_ {
        self.tiles.iter().enumerate().map(move |(i, &tile)| {
            let cell = IVec2::new((i % self.width) as i32, (i / self.width) as i32);
            (cell, tile)
        })
    }

    /// Every walkable cell, in row-major order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.cells().filter(|&(_, tile)| tile.is_walkable()).map(|(cell, _)| cell)
    }

    /// Walkable 4-connected neighbours of `cell`, in [`Direction::DIRECTIONS`] order.
    pub fn walkable_neighbors(&self, cell: GridCell) -> SmallVec<[GridCell; 4]> {
        Direction::DIRECTIONS
            .iter()
            .map(|dir| cell + dir.as_ivec2())
            .filter(|&next| self.is_walkable(next))
            .collect()
    }

    /// The solid box of a wall tile.
    pub fn wall_aabb(&self, cell: GridCell) -> Aabb {
        let center = self.cell_to_world(cell) + Vec3::new(0.0, WALL_HEIGHT * 0.5, 0.0);
        Aabb::from_center_size(center, Vec3::new(self.tile_size, WALL_HEIGHT, self.tile_size))
    }
}

impl ColliderSet for GridMap {
    fn blocks(&self, aabb: &Aabb) -> bool {
        let low = self.containing_cell(aabb.min);
        let high = self.containing_cell(aabb.max);
        for z in low.y..=high.y {
            for x in low.x..=high.x {
                let cell = IVec2::new(x, z);
                if self.tile_at(cell) == TileKind::Wall && self.wall_aabb(cell).intersects(aabb) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RAW_LAYOUT;

    fn map() -> GridMap {
        GridMap::parse(&RAW_LAYOUT).unwrap()
    }

    #[test]
    fn test_out_of_range_is_wall() {
        let map = map();
        assert_eq!(map.tile_at(IVec2::new(-1, 3)), TileKind::Wall);
        assert_eq!(map.tile_at(IVec2::new(3, 100)), TileKind::Wall);
        assert!(!map.is_walkable(IVec2::new(19, 1)));
    }

    #[test]
    fn test_tile_lookup() {
        let map = map();
        assert_eq!(map.tile_at(IVec2::new(1, 1)), TileKind::Path);
        assert_eq!(map.tile_at(IVec2::new(17, 1)), TileKind::PowerPellet);
        assert_eq!(map.tile_at(IVec2::new(9, 8)), TileKind::Pen);
        assert_eq!(map.tile_at(IVec2::new(8, 8)), TileKind::Empty);
    }

    #[test]
    fn test_nearest_and_containing_cells() {
        let map = map();
        let world = Vec3::new(2.9, 0.0, 3.1);
        assert_eq!(map.nearest_cell(world), IVec2::new(1, 2));
        assert_eq!(map.containing_cell(world), IVec2::new(1, 2));

        let edge = Vec3::new(3.01, 0.0, 2.0);
        assert_eq!(map.containing_cell(edge), IVec2::new(2, 1));
        let before_edge = Vec3::new(2.99, 0.0, 2.0);
        assert_eq!(map.containing_cell(before_edge), IVec2::new(1, 1));

        // On a shared edge the containing cell is always the one on the positive side,
        // while rounding goes away from zero.
        let boundary = Vec3::new(-1.0, 0.0, 0.0);
        assert_eq!(map.containing_cell(boundary), IVec2::new(0, 0));
        assert_eq!(map.nearest_cell(boundary), IVec2::new(-1, 0));
    }

    #[test]
    fn test_cell_world_roundtrip_snaps() {
        let map = map();
        for (cell, _) in map.cells() {
            assert_eq!(map.nearest_cell(map.cell_to_world(cell)), cell);
            assert_eq!(map.containing_cell(map.cell_to_world(cell)), cell);
        }
    }

    #[test]
    fn test_cells_are_row_major() {
        let map = map();
        let cells: Vec<_> = map.cells().take(20).map(|(cell, _)| cell).collect();
        assert_eq!(cells[0], IVec2::new(0, 0));
        assert_eq!(cells[18], IVec2::new(18, 0));
        assert_eq!(cells[19], IVec2::new(0, 1));
    }

    #[test]
    fn test_walkable_neighbors() {
        let map = map();
        let neighbors = map.walkable_neighbors(IVec2::new(1, 1));
        assert_eq!(neighbors.as_slice(), &[IVec2::new(1, 2), IVec2::new(2, 1)]);
    }

    #[test]
    fn test_grid_blocks_box_inside_wall() {
        let map = map();
        let inside_wall = Aabb::from_center_size(map.cell_to_world(IVec2::new(0, 0)) + Vec3::Y * 0.5, Vec3::ONE * 0.5);
        assert!(map.blocks(&inside_wall));
        let open = Aabb::from_center_size(map.cell_to_world(IVec2::new(1, 1)) + Vec3::Y * 0.5, Vec3::new(0.5, 1.0, 0.5));
        assert!(!map.blocks(&open));
    }
}
