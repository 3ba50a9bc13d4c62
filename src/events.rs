use bevy_ecs::event::Event;

use crate::config::LevelConfig;
use crate::systems::components::{GhostKind, GhostState, PowerUpKind};

/// State changes emitted for the presentation layer. The simulation never renders; it only
/// reports what happened during a step.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    ScoreChanged(u32),
    LifeLost { remaining: u8 },
    /// A pellet was eaten; carries the number of pellets (of either kind) still on the board.
    PelletConsumed { remaining: usize },
    PowerPelletConsumed,
    GhostStateChanged { ghost: GhostKind, state: GhostState },
    GhostEaten { ghost: GhostKind, points: u32 },
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    /// The last frightened ghost recovered.
    FrightenedEnded,
    LevelStarted { index: usize, config: LevelConfig },
    LevelCompleted { index: usize },
    PlayerRespawned,
    GameOver,
    GameWon,
}

/// Requests from the collision resolver that need whole-world changes. Applied by the stage
/// system at the end of the frame, at most one per frame.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageTransition {
    PlayerCaught { ghost: GhostKind },
    LevelCleared,
}
