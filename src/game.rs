//! This module contains the main game logic and state.

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::{schedule::Schedule, world::World};
use glam::Vec3;
use tracing::{info, trace};

use crate::config::{GameConfig, LevelTable};
use crate::constants::RAW_LAYOUT;
use crate::error::{GameError, GameResult};
use crate::events::{GameEvent, StageTransition};
use crate::input::InputState;
use crate::map::grid::GridMap;
use crate::systems::{
    collision_system, ghost_system, player_movement_system, power_up_timer_system, scatter_mode_system, stage,
    stage_system, threat_system, ActivePowerUps, DeltaTime, GamePhase, Ghost, GhostBehavior, GhostKind, GhostState,
    PlayerControlled, Position, ProgressionState, ScatterClock, SimRng, Threat,
};

/// The `Game` struct is the main entry point for the simulation.
///
/// It owns the ECS world and the per-frame schedule. A host calls [`Game::step`] once per
/// rendered frame and renders from the returned events and the read accessors.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    was_locked: bool,
}

impl Game {
    /// Builds a game on the built-in maze.
    pub fn new(config: GameConfig) -> GameResult<Game> {
        Self::with_layout(config, &RAW_LAYOUT)
    }

    /// Builds a game on a custom maze layout. The layout must keep the spawn tiles open.
    pub fn with_layout(config: GameConfig, layout: &[&str]) -> GameResult<Game> {
        if config.levels.is_empty() {
            return Err(GameError::InvalidConfig("the level table is empty".into()));
        }
        if config.starting_lives == 0 {
            return Err(GameError::InvalidConfig("starting lives must be positive".into()));
        }

        let map = GridMap::parse(layout)?;
        let mut world = World::default();
        let mut schedule = Schedule::default();

        EventRegistry::register_event::<GameEvent>(&mut world);
        EventRegistry::register_event::<StageTransition>(&mut world);

        info!(difficulty = %config.difficulty, seed = ?config.seed, levels = config.levels.len(), "Creating game");
        world.insert_resource(map);
        world.insert_resource(SimRng::new(config.seed));
        world.insert_resource(LevelTable::new(config.levels.clone()));
        world.insert_resource(ProgressionState::new(config.starting_lives));
        world.insert_resource(config);
        world.insert_resource(DeltaTime(0.0));
        world.insert_resource(InputState::default());
        world.insert_resource(ScatterClock::default());
        world.insert_resource(ActivePowerUps::default());
        world.insert_resource(Threat::default());

        schedule.add_systems(
            (
                player_movement_system,
                scatter_mode_system,
                ghost_system,
                threat_system,
                collision_system,
                power_up_timer_system,
                stage_system,
            )
                .chain(),
        );

        stage::spawn_actors(&mut world);
        stage::load_level(&mut world, 0);
        // Setup noise is not part of the first frame's report.
        world.resource_mut::<Events<GameEvent>>().clear();

        Ok(Game {
            world,
            schedule,
            was_locked: false,
        })
    }

    /// Advances the simulation by `dt` seconds and returns everything that happened.
    ///
    /// Nothing advances while the input is not locked. Locking starts the level from the start
    /// screen and starts a new run after the game ended.
    pub fn step(&mut self, input: InputState, dt: f32) -> Vec<GameEvent> {
        let lock_edge = input.locked && !self.was_locked;
        self.was_locked = input.locked;
        self.world.insert_resource(input);
        self.world.insert_resource(DeltaTime(dt));

        if input.locked {
            match self.phase() {
                GamePhase::Start => {
                    let index = self.progression().level_index;
                    stage::start_level(&mut self.world, index);
                }
                GamePhase::GameOver | GamePhase::Won => {
                    if lock_edge {
                        stage::reset_game(&mut self.world);
                    }
                }
                GamePhase::Dying { .. } => stage::tick_dying(&mut self.world, dt),
                GamePhase::Playing => self.schedule.run(&mut self.world),
            }
        }

        let events: Vec<GameEvent> = self.world.resource_mut::<Events<GameEvent>>().drain().collect();
        if !events.is_empty() {
            trace!(count = events.len(), "Step emitted events");
        }
        events
    }

    pub fn progression(&self) -> &ProgressionState {
        self.world.resource::<ProgressionState>()
    }

    pub fn phase(&self) -> GamePhase {
        self.progression().phase
    }

    pub fn score(&self) -> u32 {
        self.progression().score
    }

    pub fn lives(&self) -> u8 {
        self.progression().lives
    }

    pub fn map(&self) -> &GridMap {
        self.world.resource::<GridMap>()
    }

    pub fn threat(&self) -> &Threat {
        self.world.resource::<Threat>()
    }

    pub fn power_ups(&self) -> &ActivePowerUps {
        self.world.resource::<ActivePowerUps>()
    }

    pub fn player_position(&mut self) -> Option<Vec3> {
        self.world
            .query_filtered::<&Position, With<PlayerControlled>>()
            .single(&self.world)
            .ok()
            .map(|position| position.0)
    }

    /// Current state and position of one ghost.
    pub fn ghost(&mut self, kind: GhostKind) -> Option<(GhostState, Vec3)> {
        self.world
            .query::<(&Ghost, &GhostBehavior, &Position)>()
            .iter(&self.world)
            .find(|(ghost, _, _)| ghost.kind == kind)
            .map(|(_, behavior, position)| (behavior.state(), position.0))
    }
}
