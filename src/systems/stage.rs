//! Whole-world stage changes: populating a level, losing a life, advancing and resetting.
//!
//! These need to spawn and despawn entities and touch several resources at once, so they
//! operate on the [`World`] directly and run from the exclusive [`stage_system`] or from the
//! [`Game`](crate::game::Game) facade.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::Events;
use bevy_ecs::query::{Or, With};
use bevy_ecs::world::World;
use glam::Vec3;
use rand::seq::IndexedRandom;
use smallvec::SmallVec;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::config::{GameConfig, LevelConfig, LevelTable};
use crate::constants::{collider::ITEM_HEIGHT, ghost::HOVER_HEIGHT, player};
use crate::events::{GameEvent, StageTransition};
use crate::map::grid::GridMap;
use crate::map::parser::TileKind;
use crate::systems::components::{
    Ghost, GhostBehavior, GhostBundle, GhostKind, Pellet, PelletBundle, Player, PlayerBundle,
    PlayerControlled, Position, PowerUp, PowerUpKind, SimRng,
};
use crate::systems::ghost::ScatterClock;
use crate::systems::power_up::ActivePowerUps;
use crate::systems::progression::{GamePhase, LevelOutcome, ProgressionState};

/// Spawns the player and one ghost per slot at their starting points.
pub fn spawn_actors(world: &mut World) {
    let map = world.resource::<GridMap>();
    let player_spawn = map.cell_to_world(player::SPAWN_CELL).with_y(player::EYE_HEIGHT);
    let ghosts: Vec<GhostBundle> = GhostKind::iter()
        .map(|kind| {
            let spawn = map.cell_to_world(kind.spawn_cell()).with_y(HOVER_HEIGHT);
            GhostBundle {
                ghost: Ghost::new(kind, spawn),
                behavior: GhostBehavior::default(),
                position: Position(spawn),
            }
        })
        .collect();

    world.spawn(PlayerBundle {
        player: PlayerControlled,
        motion: Player::new(player::BASE_SPEED),
        position: Position(player_spawn),
    });
    world.spawn_batch(ghosts);
}

fn despawn_items(world: &mut World) {
    let items: Vec<Entity> = world
        .query_filtered::<Entity, Or<(With<Pellet>, With<PowerUp>)>>()
        .iter(world)
        .collect();
    for entity in items {
        world.despawn(entity);
    }
}

/// Replaces every pellet and power-up with a fresh pellet on each pellet tile.
///
/// Returns the number of coins (non-power pellets) and of pellets of either kind.
pub fn populate_pellets(world: &mut World) -> (u32, usize) {
    despawn_items(world);

    let map = world.resource::<GridMap>();
    let pellets: Vec<PelletBundle> = map
        .cells()
        .filter_map(|(cell, tile)| {
            let power = match tile {
                TileKind::Path => false,
                TileKind::PowerPellet => true,
                _ => return None,
            };
            Some(PelletBundle {
                pellet: Pellet { power },
                position: Position(map.cell_to_world(cell).with_y(ITEM_HEIGHT)),
            })
        })
        .collect();

    let coins = pellets.iter().filter(|bundle| !bundle.pellet.power).count() as u32;
    let total = pellets.len();
    world.spawn_batch(pellets);
    debug!(coins, total, "Pellets populated");
    (coins, total)
}

/// Places one random power-up on a walkable tile outside the pen and off the player spawn.
pub fn spawn_power_up(world: &mut World) -> Option<PowerUpKind> {
    let map = world.resource::<GridMap>();
    let tiles: Vec<Vec3> = map
        .cells()
        .filter(|&(cell, tile)| tile.is_walkable() && tile != TileKind::Pen && cell != player::SPAWN_CELL)
        .map(|(cell, _)| map.cell_to_world(cell).with_y(ITEM_HEIGHT))
        .collect();
    let kinds: SmallVec<[PowerUpKind; 3]> = PowerUpKind::iter().collect();

    let mut rng = world.resource_mut::<SimRng>();
    let Some(&position) = tiles.choose(&mut rng.0) else {
        warn!("No free tile for a power-up");
        return None;
    };
    let kind = *kinds.choose(&mut rng.0)?;

    world.spawn((PowerUp { kind }, Position(position)));
    debug!(power_up = %kind, %position, "Power-up spawned");
    Some(kind)
}

/// Puts the player and every ghost back at their spawn points.
///
/// Ghosts resume in the scatter clock's current hunting mode. Clearing the last fright
/// announces [`GameEvent::FrightenedEnded`].
pub fn reset_actors(world: &mut World) {
    let hunting = world.resource::<ScatterClock>().hunting_state();
    let spawn = world
        .resource::<GridMap>()
        .cell_to_world(player::SPAWN_CELL)
        .with_y(player::EYE_HEIGHT);
    let mut players = world.query_filtered::<(&mut Player, &mut Position), With<PlayerControlled>>();
    for (mut motion, mut position) in players.iter_mut(world) {
        *motion = Player::new(motion.speed);
        position.0 = spawn;
    }

    let mut changed: SmallVec<[GhostKind; 4]> = SmallVec::new();
    let mut fright_cleared = false;
    let mut ghosts = world.query::<(&Ghost, &mut GhostBehavior, &mut Position)>();
    for (ghost, mut behavior, mut position) in ghosts.iter_mut(world) {
        if behavior.state() != hunting {
            changed.push(ghost.kind);
        }
        fright_cleared |= behavior.is_frightened();
        behavior.reset();
        behavior.enter(hunting);
        position.0 = ghost.spawn;
    }
    for ghost in changed {
        world.send_event(GameEvent::GhostStateChanged { ghost, state: hunting });
    }
    if fright_cleared {
        world.send_event(GameEvent::FrightenedEnded);
    }
}

/// Applies a level's ghost speed and active count to the ghost slots.
fn apply_level(world: &mut World, level: &LevelConfig) {
    let speed = level.ghost_speed * world.resource::<GameConfig>().difficulty.speed_factor();
    let mut ghosts = world.query::<&mut Ghost>();
    for mut ghost in ghosts.iter_mut(world) {
        ghost.speed = speed;
        ghost.active = ghost.kind.slot() < level.active_ghost_count;
    }
}

/// Prepares the board for level `index` without starting play. Indices past the end clamp to
/// the final level. Returns the index actually used and its configuration.
pub fn load_level(world: &mut World, index: usize) -> (usize, LevelConfig) {
    let levels = world.resource::<LevelTable>();
    let index = levels.clamp_index(index);
    let level = levels.get(index);

    apply_level(world, &level);
    let (coins, pellets) = populate_pellets(world);
    spawn_power_up(world);
    world.resource_mut::<ScatterClock>().reset();
    reset_actors(world);
    world.resource_mut::<ActivePowerUps>().clear();
    world
        .resource_mut::<ProgressionState>()
        .begin_level(index, level.coin_goal(coins), coins, pellets);
    (index, level)
}

/// Loads level `index` and enters the playing phase.
pub fn start_level(world: &mut World, index: usize) {
    let (index, config) = load_level(world, index);
    world.resource_mut::<ProgressionState>().phase = GamePhase::Playing;
    info!(level = index, name = config.name, "Level started");
    world.send_event(GameEvent::LevelStarted { index, config });
}

/// Takes a life and enters either the dying countdown or game over.
pub fn lose_life(world: &mut World) {
    let mut progression = world.resource_mut::<ProgressionState>();
    let phase = progression.lose_life();
    let remaining = progression.lives;

    world.send_event(GameEvent::LifeLost { remaining });
    if phase == GamePhase::GameOver {
        world.send_event(GameEvent::GameOver);
    }
}

/// Advances the dying countdown, respawning everyone when it ends.
pub fn tick_dying(world: &mut World, dt: f32) {
    if !world.resource_mut::<ProgressionState>().tick_dying(dt) {
        return;
    }
    reset_actors(world);
    debug!("Player respawned");
    world.send_event(GameEvent::PlayerRespawned);
}

/// Moves on to the next level, or wins the game after the last one.
pub fn complete_level(world: &mut World) {
    let index = world.resource::<ProgressionState>().level_index;
    let has_next = world.resource::<LevelTable>().has_next(index);
    let outcome = world.resource_mut::<ProgressionState>().complete_level(has_next);

    world.send_event(GameEvent::LevelCompleted { index });
    match outcome {
        LevelOutcome::Advance { next } => start_level(world, next),
        LevelOutcome::Won => {
            world.send_event(GameEvent::GameWon);
        }
    }
}

/// Starts a brand new run from the first level with fresh score and lives.
pub fn reset_game(world: &mut World) {
    let lives = world.resource::<GameConfig>().starting_lives;
    world.insert_resource(ProgressionState::new(lives));
    info!(lives, "Game reset");
    world.send_event(GameEvent::ScoreChanged(0));
    start_level(world, 0);
}

/// Applies the first stage transition requested this frame; later ones are dropped.
pub fn stage_system(world: &mut World) {
    let mut transitions = world.resource_mut::<Events<StageTransition>>();
    let mut requested = transitions.drain();
    let Some(transition) = requested.next() else {
        return;
    };
    let dropped = requested.count();
    if dropped > 0 {
        debug!(?transition, dropped, "Ignoring extra stage transitions");
    }

    match transition {
        StageTransition::PlayerCaught { ghost } => {
            debug!(%ghost, "Applying player caught");
            lose_life(world);
        }
        StageTransition::LevelCleared => {
            debug!("Applying level cleared");
            complete_level(world);
        }
    }
}
