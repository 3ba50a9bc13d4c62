//! Score, lives and level bookkeeping.
//!
//! [`ProgressionState`] is the single authority over the game phase. Its transition methods
//! are plain state changes; spawning and despawning entities is left to the stage system.

use bevy_ecs::resource::Resource;
use strum_macros::IntoStaticStr;
use tracing::{debug, info};

use crate::constants::{player::RESPAWN_DELAY, scoring};

/// The overall phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Default, IntoStaticStr)]
pub enum GamePhase {
    /// Waiting for the first lock before the level begins.
    #[default]
    Start,
    Playing,
    /// Brief pause after losing a life; the player respawns when it runs out.
    Dying { remaining: f32 },
    GameOver,
    Won,
}

impl GamePhase {
    /// Whether the run has ended and needs a reset before playing again.
    pub fn is_finished(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }
}

/// What happens after a level is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Advance { next: usize },
    Won,
}

/// Rewards stop doubling after this many steps.
const MAX_CHAIN_SHIFT: u32 = 16;

/// Points for the `chain`-th ghost eaten since the last power pellet: 200, 400, 800, ...
///
/// `double` applies the double-score power-up on top.
pub fn ghost_reward(chain: u32, double: bool) -> u32 {
    let base = scoring::GHOST_BASE << chain.saturating_sub(1).min(MAX_CHAIN_SHIFT);
    if double {
        base * 2
    } else {
        base
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ProgressionState {
    pub score: u32,
    pub lives: u8,
    pub level_index: usize,
    pub coins_collected: u32,
    pub coin_goal: u32,
    /// Non-power pellets placed at the start of the level.
    pub total_coins: u32,
    /// Pellets of either kind still on the board.
    pub pellets_remaining: usize,
    /// Ghosts eaten since the last power pellet.
    pub ghost_chain: u32,
    pub phase: GamePhase,
}

impl ProgressionState {
    pub fn new(starting_lives: u8) -> Self {
        Self {
            score: 0,
            lives: starting_lives,
            level_index: 0,
            coins_collected: 0,
            coin_goal: 0,
            total_coins: 0,
            pellets_remaining: 0,
            ghost_chain: 0,
            phase: GamePhase::Start,
        }
    }

    /// Resets the per-level counters for a freshly populated board. The phase is untouched.
    pub fn begin_level(&mut self, index: usize, coin_goal: u32, total_coins: u32, pellets: usize) {
        debug!(level = index, coin_goal, total_coins, pellets, "Beginning level");
        self.level_index = index;
        self.coin_goal = coin_goal;
        self.total_coins = total_coins;
        self.coins_collected = 0;
        self.pellets_remaining = pellets;
        self.ghost_chain = 0;
    }

    pub fn add_score(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        self.score
    }

    /// Records an eaten pellet. Returns the new score.
    pub fn consume_pellet(&mut self, power: bool) -> u32 {
        self.pellets_remaining = self.pellets_remaining.saturating_sub(1);
        if power {
            self.ghost_chain = 0;
            self.add_score(scoring::POWER_PELLET)
        } else {
            self.coins_collected += 1;
            self.add_score(scoring::PELLET)
        }
    }

    pub fn coins_remaining(&self) -> u32 {
        self.total_coins.saturating_sub(self.coins_collected)
    }

    /// The level is cleared once the coin goal is met or no coin is left.
    pub fn goal_reached(&self) -> bool {
        self.coins_collected >= self.coin_goal || self.coins_remaining() == 0
    }

    /// Extends the eaten-ghost chain and banks its reward. Returns the points awarded.
    pub fn eat_ghost(&mut self, double: bool) -> u32 {
        self.ghost_chain += 1;
        let points = ghost_reward(self.ghost_chain, double);
        self.add_score(points);
        points
    }

    /// Takes one life. Enters [`GamePhase::GameOver`] when none remain, otherwise starts the
    /// dying countdown. Lives never go below zero.
    pub fn lose_life(&mut self) -> GamePhase {
        self.lives = self.lives.saturating_sub(1);
        self.phase = if self.lives == 0 {
            info!(score = self.score, "Game over");
            GamePhase::GameOver
        } else {
            debug!(lives = self.lives, "Life lost");
            GamePhase::Dying {
                remaining: RESPAWN_DELAY,
            }
        };
        self.phase
    }

    /// Counts the dying phase down. Returns `true` on the frame it ends, leaving the phase
    /// at [`GamePhase::Playing`].
    pub fn tick_dying(&mut self, dt: f32) -> bool {
        let GamePhase::Dying { remaining } = self.phase else {
            return false;
        };
        let remaining = remaining - dt;
        if remaining > 0.0 {
            self.phase = GamePhase::Dying { remaining };
            return false;
        }
        self.phase = GamePhase::Playing;
        true
    }

    /// Resolves a cleared level into either the next level or the win.
    pub fn complete_level(&mut self, has_next: bool) -> LevelOutcome {
        if has_next {
            LevelOutcome::Advance {
                next: self.level_index + 1,
            }
        } else {
            info!(score = self.score, "All levels cleared");
            self.phase = GamePhase::Won;
            LevelOutcome::Won
        }
    }
}
