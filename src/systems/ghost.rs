use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Query, Res, ResMut};
use glam::{IVec2, Vec3};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::config::{Difficulty, GameConfig};
use crate::constants::{
    collider::GHOST_SIZE,
    ghost::{self, FLEE_CORNERS},
};
use crate::events::GameEvent;
use crate::map::grid::{GridCell, GridMap};
use crate::map::pathfinder::find_path;
use crate::systems::components::{
    DeltaTime, Ghost, GhostBehavior, GhostKind, GhostState, Player, PlayerControlled, Position, SimRng,
};
use crate::systems::movement::step_towards;

/// The fixed corner each ghost heads for while scattering.
pub fn scatter_corner(kind: GhostKind) -> GridCell {
    match kind {
        GhostKind::Blinky => IVec2::new(17, 1),
        GhostKind::Pinky => IVec2::new(1, 1),
        GhostKind::Inky => IVec2::new(17, 18),
        GhostKind::Clyde => IVec2::new(1, 18),
    }
}

/// What a hunting ghost knows about the world when picking a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseContext {
    pub difficulty: Difficulty,
    pub player: Vec3,
    /// Unit vector the player is looking along.
    pub facing: Vec3,
    /// Blinky's position, if Blinky is in play.
    pub blinky: Option<Vec3>,
}

/// Picks the grid cell a hunting ghost should path towards.
///
/// Scattering ghosts always head for their corner. In brutal difficulty every chasing ghost
/// targets the player's tile; in classic each personality applies its own offset.
pub fn target_for(
    map: &GridMap,
    kind: GhostKind,
    state: GhostState,
    ghost_position: Vec3,
    context: &ChaseContext,
) -> GridCell {
    if state == GhostState::Scatter {
        return scatter_corner(kind);
    }

    let player = context.player;
    let target = match (context.difficulty, kind) {
        (Difficulty::Brutal, _) | (Difficulty::Classic, GhostKind::Blinky) => player,
        (Difficulty::Classic, GhostKind::Pinky) => {
            player + context.facing * ghost::PINKY_LOOKAHEAD_TILES * map.tile_size()
        }
        (Difficulty::Classic, GhostKind::Inky) => match context.blinky {
            Some(blinky) => player + (player - blinky) * 2.0,
            None => player,
        },
        (Difficulty::Classic, GhostKind::Clyde) => {
            let distance = ghost_position.distance(player);
            if distance > ghost::CLYDE_SHY_TILES * map.tile_size() {
                player
            } else {
                return scatter_corner(kind);
            }
        }
    };
    map.nearest_cell(target)
}

/// Global chase/scatter alternation.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ScatterClock {
    elapsed: f32,
    scatter: bool,
}

impl ScatterClock {
    pub fn is_scatter(&self) -> bool {
        self.scatter
    }

    /// The state a ghost resumes hunting in: whichever mode the clock is in right now.
    pub fn hunting_state(&self) -> GhostState {
        if self.scatter {
            GhostState::Scatter
        } else {
            GhostState::Chasing
        }
    }

    /// Advances the clock; returns the new mode when it flips.
    pub fn tick(&mut self, dt: f32) -> Option<bool> {
        self.elapsed += dt;
        if self.elapsed < ghost::SCATTER_TOGGLE_INTERVAL {
            return None;
        }
        self.elapsed -= ghost::SCATTER_TOGGLE_INTERVAL;
        self.scatter = !self.scatter;
        Some(self.scatter)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Flips hunting ghosts between chasing and scattering on the global clock.
pub fn scatter_mode_system(
    delta_time: Res<DeltaTime>,
    mut clock: ResMut<ScatterClock>,
    mut ghosts: Query<(&Ghost, &mut GhostBehavior)>,
    mut events: EventWriter<GameEvent>,
) {
    let Some(scatter) = clock.tick(delta_time.0) else {
        return;
    };
    let (from, to) = if scatter {
        (GhostState::Chasing, GhostState::Scatter)
    } else {
        (GhostState::Scatter, GhostState::Chasing)
    };
    debug!(%to, "Ghost mode toggled");

    for (ghost, mut behavior) in ghosts.iter_mut() {
        if !ghost.active || behavior.state() != from {
            continue;
        }
        behavior.enter(to);
        events.write(GameEvent::GhostStateChanged { ghost: ghost.kind, state: to });
    }
}

/// Follows the cached path towards `goal`, repathing when the cooldown runs out.
///
/// Falls back to heading straight for the goal when no route exists.
#[allow(clippy::too_many_arguments)]
fn follow_path<R: Rng>(
    map: &GridMap,
    behavior: &mut GhostBehavior,
    position: Vec3,
    goal: GridCell,
    speed: f32,
    dt: f32,
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec3 {
    let current = map.nearest_cell(position);

    behavior.repath_cooldown -= dt;
    if behavior.repath_cooldown <= 0.0 {
        behavior.path = find_path(map, current, goal);
        let (base, jitter) = difficulty.repath_interval();
        behavior.repath_cooldown = base + rng.random::<f32>() * jitter;
        trace!(%current, %goal, found = behavior.path.is_some(), "Ghost repathed");
    }

    let waypoint = |cell: GridCell| map.cell_to_world(cell).with_y(position.y);

    if let Some(path) = behavior.path.as_mut() {
        while path.len() > 1 && position.distance(waypoint(path[1])) < ghost::WAYPOINT_RADIUS {
            path.remove(0);
        }
        if path.len() > 1 {
            return step_towards(position, waypoint(path[1]), speed, dt, GHOST_SIZE, map);
        }
    }

    step_towards(position, waypoint(goal), speed, dt, GHOST_SIZE, map)
}

/// Per-ghost behaviour: timers, target selection and movement for every active ghost.
///
/// Ghosts that stop being frightened or finish returning to the pen resume in the clock's
/// current hunting mode.
#[allow(clippy::too_many_arguments)]
pub fn ghost_system(
    map: Res<GridMap>,
    config: Res<GameConfig>,
    delta_time: Res<DeltaTime>,
    clock: Res<ScatterClock>,
    mut rng: ResMut<SimRng>,
    players: Query<(&Position, &Player), (With<PlayerControlled>, Without<Ghost>)>,
    mut ghosts: Query<(&Ghost, &mut GhostBehavior, &mut Position), Without<PlayerControlled>>,
    mut events: EventWriter<GameEvent>,
) {
    let Ok((player_position, player)) = players.single() else {
        return;
    };
    let dt = delta_time.0;
    let hunting = clock.hunting_state();
    let context = ChaseContext {
        difficulty: config.difficulty,
        player: player_position.0,
        facing: player.forward(),
        blinky: ghosts
            .iter()
            .find(|(ghost, _, _)| ghost.active && ghost.kind == GhostKind::Blinky)
            .map(|(_, _, position)| position.0),
    };

    let mut fright_ended = false;
    for (ghost, mut behavior, mut position) in ghosts.iter_mut() {
        if !ghost.active {
            continue;
        }

        if behavior.is_frightened() {
            behavior.frightened_timer -= dt;
            if behavior.frightened_timer <= 0.0 {
                behavior.enter(hunting);
                events.write(GameEvent::GhostStateChanged {
                    ghost: ghost.kind,
                    state: hunting,
                });
                fright_ended = true;
            }
        }

        match behavior.state() {
            GhostState::Eaten => {
                if position.horizontal_distance(&Position(ghost.spawn)) < ghost::ARRIVAL_RADIUS {
                    debug!(ghost = %ghost.kind, "Eaten ghost reached the pen");
                    behavior.enter(hunting);
                    events.write(GameEvent::GhostStateChanged {
                        ghost: ghost.kind,
                        state: hunting,
                    });
                } else {
                    let speed = ghost.speed * ghost::EATEN_SPEED_FACTOR;
                    position.0 = step_towards(position.0, ghost.spawn, speed, dt, GHOST_SIZE, &*map);
                }
            }
            GhostState::Frightened => {
                let near_corner = behavior.flee_corner.is_some_and(|corner| {
                    position.horizontal_distance(&Position(map.cell_to_world(corner))) < ghost::FLEE_REPICK_RADIUS
                });
                if behavior.flee_corner.is_none() || near_corner {
                    behavior.flee_corner = FLEE_CORNERS.choose(&mut rng.0).copied();
                    trace!(ghost = %ghost.kind, corner = ?behavior.flee_corner, "Ghost picked a flee corner");
                }
                let corner = behavior.flee_corner.unwrap_or_else(|| scatter_corner(ghost.kind));
                let target = map.cell_to_world(corner).with_y(position.0.y);
                position.0 = step_towards(position.0, target, ghost.speed, dt, GHOST_SIZE, &*map);
            }
            state @ (GhostState::Chasing | GhostState::Scatter) => {
                let goal = target_for(&map, ghost.kind, state, position.0, &context);
                position.0 = follow_path(
                    &map,
                    &mut behavior,
                    position.0,
                    goal,
                    ghost.speed,
                    dt,
                    config.difficulty,
                    &mut rng.0,
                );
            }
        }
    }

    let still_frightened = ghosts
        .iter()
        .any(|(ghost, behavior, _)| ghost.active && behavior.is_frightened());
    if fright_ended && !still_frightened {
        debug!("No ghost is frightened anymore");
        events.write(GameEvent::FrightenedEnded);
    }
}
