//! This module contains all the constants used by the simulation.

use glam::{IVec2, Vec3};

/// The edge length of one maze tile, in world units.
pub const TILE_SIZE: f32 = 2.0;

/// The raw layout of the maze, one string per row (z), one digit per column (x).
///
/// `1` wall, `0` path with a pellet, `2` empty path, `3` power pellet, `4` ghost pen.
pub const RAW_LAYOUT: [&str; 20] = [
    "1111111111111111111",
    "1000000001000000031",
    "1011011101011101101",
    "1311011101011101101",
    "1000000000000000001",
    "1011010111110101101",
    "1000010001000100001",
    "1111011124211101111",
    "1111012224222101111",
    "1111012114112101111",
    "1000002122212000001",
    "1111012111112101111",
    "1111012222222101111",
    "1111012111112101111",
    "1000000001000000001",
    "1011011101011101101",
    "1301000000000001031",
    "1101010111110101011",
    "1000010001000100001",
    "1111111111111111111",
];

/// Player tuning.
pub mod player {
    use super::*;

    /// Where the player (re)spawns, in grid cells.
    pub const SPAWN_CELL: IVec2 = IVec2::new(1, 1);
    /// Eye height above the floor; the player's position sits at this height.
    pub const EYE_HEIGHT: f32 = 0.5;
    pub const BASE_SPEED: f32 = 2.5;
    /// Velocity decay rate, per second.
    pub const DAMPING: f32 = 10.0;
    /// Multiplier applied to speed when accelerating along a held axis.
    pub const ACCELERATION: f32 = 5.0;
    pub const BOB_SPEED: f32 = 6.0;
    pub const BOB_AMPLITUDE: f32 = 0.015;
    /// Rate at which the bob offset relaxes back to zero once input stops.
    pub const BOB_RELAX_RATE: f32 = 8.0;
    pub const STARTING_LIVES: u8 = 3;
    /// Seconds spent in the dying phase before respawning.
    pub const RESPAWN_DELAY: f32 = 3.0;
}

/// Ghost tuning.
pub mod ghost {
    use super::*;

    /// Speed used before any level configuration has been applied.
    pub const BASE_SPEED: f32 = 1.5;
    /// Multiplier applied to level speed in brutal difficulty.
    pub const BRUTAL_SPEED_FACTOR: f32 = 1.35;
    /// Multiplier applied to speed while returning to the pen.
    pub const EATEN_SPEED_FACTOR: f32 = 2.0;
    /// Distance to the spawn point at which an eaten ghost revives.
    pub const ARRIVAL_RADIUS: f32 = 0.5;
    /// Distance to a flee corner at which a frightened ghost picks a new one.
    pub const FLEE_REPICK_RADIUS: f32 = 2.0;
    /// Distance to a path cell's centre at which it counts as reached.
    pub const WAYPOINT_RADIUS: f32 = 0.05;
    /// Height of a ghost's centre above the floor.
    pub const HOVER_HEIGHT: f32 = 0.5;

    pub const BRUTAL_REPATH_BASE: f32 = 0.12;
    pub const BRUTAL_REPATH_JITTER: f32 = 0.06;
    pub const CLASSIC_REPATH_BASE: f32 = 0.35;
    pub const CLASSIC_REPATH_JITTER: f32 = 0.2;

    /// Pinky aims this many tiles ahead of the player.
    pub const PINKY_LOOKAHEAD_TILES: f32 = 4.0;
    /// Clyde gives up the chase when closer than this many tiles.
    pub const CLYDE_SHY_TILES: f32 = 6.0;

    /// Seconds between global chase/scatter toggles.
    pub const SCATTER_TOGGLE_INTERVAL: f32 = 12.0;

    /// The corners frightened ghosts flee towards.
    pub const FLEE_CORNERS: [IVec2; 4] = [IVec2::new(1, 1), IVec2::new(17, 1), IVec2::new(1, 18), IVec2::new(17, 18)];
}

/// Collision volumes and contact radii.
pub mod collider {
    use super::*;

    /// Full extents (width, height, depth) of the player's bounding box.
    pub const PLAYER_SIZE: Vec3 = Vec3::new(0.5, 1.0, 0.5);
    /// Full extents of a ghost's bounding box.
    pub const GHOST_SIZE: Vec3 = Vec3::new(0.5, 1.0, 0.5);
    /// Height of the wall boxes generated from wall tiles.
    pub const WALL_HEIGHT: f32 = 1.5;

    /// Height pellets and power-ups float at.
    pub const ITEM_HEIGHT: f32 = 0.5;

    pub const PELLET_RADIUS: f32 = 0.5;
    pub const POWER_UP_RADIUS: f32 = 0.8;
    pub const GHOST_CONTACT_RADIUS: f32 = 0.5;
}

/// Points and multipliers.
pub mod scoring {
    pub const PELLET: u32 = 10;
    pub const POWER_PELLET: u32 = 50;
    /// Reward for the first ghost eaten after a power pellet; doubles for each further ghost.
    pub const GHOST_BASE: u32 = 200;
}

/// Power-up tuning.
pub mod power_up {
    /// Seconds every power-up effect lasts.
    pub const DURATION: f32 = 8.0;
    pub const SPEED_BONUS: f32 = 1.6;
    pub const SPEED_FLOOR: f32 = 3.0;
}

/// Proximity threat sensing.
pub mod threat {
    /// Chasing ghosts closer than this contribute to the threat overlay.
    pub const DANGER_DISTANCE: f32 = 8.0;
    pub const MAX_INFLUENCE: f32 = 0.8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_layout_is_rectangular() {
        let width = RAW_LAYOUT[0].len();
        for row in RAW_LAYOUT.iter() {
            assert_eq!(row.len(), width);
        }
    }

    #[test]
    fn test_raw_layout_power_pellets() {
        let count: usize = RAW_LAYOUT.iter().map(|row| row.matches('3').count()).sum();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_raw_layout_pellets() {
        let count: usize = RAW_LAYOUT.iter().map(|row| row.matches('0').count()).sum();
        assert_eq!(count, 140);
    }

    #[test]
    fn test_flee_corners_are_open() {
        for corner in ghost::FLEE_CORNERS {
            let tile = RAW_LAYOUT[corner.y as usize].as_bytes()[corner.x as usize];
            assert_ne!(tile, b'1', "corner {corner} is a wall");
        }
    }

    #[test]
    fn test_player_spawn_is_open() {
        let spawn = player::SPAWN_CELL;
        assert_ne!(RAW_LAYOUT[spawn.y as usize].as_bytes()[spawn.x as usize], b'1');
    }
}
