//! Simulation core of a first-person maze-chase game.
//!
//! The [`Game`](game::Game) facade owns an ECS world holding the maze, the player, the
//! ghosts and the pellets. A host feeds it one [`InputState`](input::InputState) and a time
//! delta per frame and renders from the [`GameEvent`](events::GameEvent)s it returns.

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod input;
pub mod map;
pub mod systems;
