//! Shortest-path search over the maze grid.

use pathfinding::prelude::astar;
use tracing::trace;

use crate::map::grid::{GridCell, GridMap};

/// Manhattan distance between two cells; admissible and consistent for 4-connected unit
/// steps.
pub fn manhattan(a: GridCell, b: GridCell) -> u32 {
    (a - b).abs().element_sum() as u32
}

/// Finds a shortest 4-connected path from `start` to `goal` with A*.
///
/// The returned path starts with `start` and ends with `goal`; its second element is the
/// next hop. Returns `None` when the goal is a wall or cannot be reached. Neighbours are
/// always expanded in the same order, so equal inputs give equal paths.
pub fn find_path(map: &GridMap, start: GridCell, goal: GridCell) -> Option<Vec<GridCell>> {
    if !map.is_walkable(goal) {
        trace!(%start, %goal, "Path goal is a wall");
        return None;
    }

    let result = astar(
        &start,
        |&cell| map.walkable_neighbors(cell).into_iter().map(|next| (next, 1u32)),
        |&cell| manhattan(cell, goal),
        |&cell| cell == goal,
    );

    match result {
        Some((path, cost)) => {
            trace!(%start, %goal, cost, "Path found");
            Some(path)
        }
        None => {
            trace!(%start, %goal, "Goal unreachable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(IVec2::new(1, 1), IVec2::new(4, -3)), 7);
        assert_eq!(manhattan(IVec2::new(2, 2), IVec2::new(2, 2)), 0);
    }

    #[test]
    fn test_path_in_corridor() {
        let map = GridMap::parse(&["11111", "10001", "11111"]).unwrap();
        let path = find_path(&map, IVec2::new(1, 1), IVec2::new(3, 1)).unwrap();
        assert_eq!(path, vec![IVec2::new(1, 1), IVec2::new(2, 1), IVec2::new(3, 1)]);
    }

    #[test]
    fn test_path_to_self() {
        let map = GridMap::parse(&["111", "101", "111"]).unwrap();
        assert_eq!(find_path(&map, IVec2::new(1, 1), IVec2::new(1, 1)), Some(vec![IVec2::new(1, 1)]));
    }

    #[test]
    fn test_wall_goal() {
        let map = GridMap::parse(&["11111", "10001", "11111"]).unwrap();
        assert_eq!(find_path(&map, IVec2::new(1, 1), IVec2::new(2, 0)), None);
    }

    #[test]
    fn test_unreachable_goal() {
        let map = GridMap::parse(&["11111", "10101", "11111"]).unwrap();
        assert_eq!(find_path(&map, IVec2::new(1, 1), IVec2::new(3, 1)), None);
    }
}
