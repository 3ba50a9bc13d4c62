use glam::IVec2;

/// One of the four grid directions. Up is towards row 0 (negative world Z).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Fixed neighbour order; anything that enumerates neighbours goes through this list.
    pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn as_ivec2(&self) -> IVec2 {
        (*self).into()
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions_cancel_out() {
        let sum: IVec2 = Direction::DIRECTIONS.iter().map(Direction::as_ivec2).sum();
        assert_eq!(sum, IVec2::ZERO);
    }

    #[test]
    fn test_direction_offsets_are_unit_steps() {
        for dir in Direction::DIRECTIONS {
            let offset = dir.as_ivec2();
            assert_eq!(offset.x.abs() + offset.y.abs(), 1);
        }
    }
}
