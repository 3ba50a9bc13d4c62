//! Level table and run-time configuration.

use bevy_ecs::resource::Resource;
use strum_macros::{Display, IntoStaticStr};

use crate::constants::{ghost, player};

/// How hard the ghosts play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, IntoStaticStr)]
pub enum Difficulty {
    /// Every ghost pathfinds to the player's exact tile, repaths often and moves faster.
    #[default]
    Brutal,
    /// Ghosts use their personal targeting rules and repath at a relaxed pace.
    Classic,
}

impl Difficulty {
    /// Multiplier applied to a level's ghost speed.
    pub fn speed_factor(self) -> f32 {
        match self {
            Difficulty::Brutal => ghost::BRUTAL_SPEED_FACTOR,
            Difficulty::Classic => 1.0,
        }
    }

    /// Base interval and jitter range of the per-ghost repath cooldown, in seconds.
    pub fn repath_interval(self) -> (f32, f32) {
        match self {
            Difficulty::Brutal => (ghost::BRUTAL_REPATH_BASE, ghost::BRUTAL_REPATH_JITTER),
            Difficulty::Classic => (ghost::CLASSIC_REPATH_BASE, ghost::CLASSIC_REPATH_JITTER),
        }
    }
}

/// Static configuration of one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub name: &'static str,
    pub ghost_speed: f32,
    /// Seconds ghosts stay frightened after a power pellet.
    pub frightened_duration: f32,
    pub active_ghost_count: usize,
    /// `None` means every coin; `<= 1` is a fraction of the coins; `> 1` is an absolute count.
    pub pellet_goal: Option<f32>,
}

impl LevelConfig {
    /// Number of coins (non-power pellets) that must be collected to clear this level.
    pub fn coin_goal(&self, total_coins: u32) -> u32 {
        coin_goal(self.pellet_goal, total_coins)
    }
}

/// Resolves a pellet goal against the number of coins on the board.
pub fn coin_goal(pellet_goal: Option<f32>, total_coins: u32) -> u32 {
    match pellet_goal {
        None => total_coins,
        Some(fraction) if fraction <= 1.0 => (total_coins as f32 * fraction.max(0.0)).ceil() as u32,
        Some(count) => (count as u32).min(total_coins),
    }
}

/// The default level progression.
pub const LEVELS: [LevelConfig; 4] = [
    LevelConfig {
        name: "Tutorial",
        ghost_speed: 1.1,
        frightened_duration: 12.0,
        active_ghost_count: 1,
        pellet_goal: Some(8.0),
    },
    LevelConfig {
        name: "Level 1",
        ghost_speed: 1.6,
        frightened_duration: 10.0,
        active_ghost_count: 2,
        pellet_goal: Some(20.0),
    },
    LevelConfig {
        name: "Level 2",
        ghost_speed: 2.0,
        frightened_duration: 8.0,
        active_ghost_count: 3,
        pellet_goal: Some(0.55),
    },
    LevelConfig {
        name: "Level 3",
        ghost_speed: 2.6,
        frightened_duration: 6.0,
        active_ghost_count: 4,
        pellet_goal: Some(1.0),
    },
];

/// Index-addressed level table. Lookups past the end clamp to the final level.
#[derive(Resource, Debug, Clone)]
pub struct LevelTable(Vec<LevelConfig>);

impl LevelTable {
    pub fn new(levels: Vec<LevelConfig>) -> Self {
        Self(levels)
    }

    pub fn get(&self, index: usize) -> LevelConfig {
        self.0[self.clamp_index(index)]
    }

    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.0.len().saturating_sub(1))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether another level follows `index`.
    pub fn has_next(&self, index: usize) -> bool {
        index + 1 < self.0.len()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self(LEVELS.to_vec())
    }
}

/// Everything a host can tune when creating a [`Game`](crate::game::Game).
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    /// Seed for the simulation RNG; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
    pub starting_lives: u8,
    pub levels: Vec<LevelConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            seed: None,
            starting_lives: player::STARTING_LIVES,
            levels: LEVELS.to_vec(),
        }
    }
}
