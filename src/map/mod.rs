//! This module defines the maze grid and provides functions for querying and navigating it.

pub mod collider;
pub mod direction;
pub mod grid;
pub mod parser;
pub mod pathfinder;
