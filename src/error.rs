//! Centralized error types for the maze-chase simulation.
//!
//! Gameplay never fails: out-of-range lookups read as walls, missing paths fall back to
//! direct movement, and losing is a state transition. The only fallible step is turning a
//! maze literal into a [`GridMap`](crate::map::grid::GridMap).

/// Main error type for the simulation crate.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Error type for maze layout parsing.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Maze layout is empty")]
    Empty,
    #[error("Unknown character in layout at ({x}, {z}): {character:?}")]
    UnknownCharacter { character: char, x: usize, z: usize },
    #[error("Row {row} has {found} tiles, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("Border tile at ({x}, {z}) is not a wall")]
    UnsealedBorder { x: usize, z: usize },
}

/// Result type for simulation setup operations.
pub type GameResult<T> = Result<T, GameError>;
