use bevy_ecs::entity::Entity;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Commands, Query, Res, ResMut};
use tracing::{debug, trace};

use crate::config::LevelTable;
use crate::constants::{
    collider::{GHOST_CONTACT_RADIUS, PELLET_RADIUS, POWER_UP_RADIUS},
    power_up,
};
use crate::events::{GameEvent, StageTransition};
use crate::systems::components::{
    Ghost, GhostBehavior, GhostState, Pellet, PlayerControlled, Position, PowerUp, PowerUpKind,
};
use crate::systems::power_up::ActivePowerUps;
use crate::systems::progression::ProgressionState;

type GhostQuery<'w, 's> = Query<'w, 's, (&'static Ghost, &'static mut GhostBehavior, &'static Position), Without<PlayerControlled>>;

/// Frightens every active ghost that `eligible` accepts, announcing the ones that changed.
fn frighten_ghosts(
    ghosts: &mut GhostQuery,
    duration: f32,
    eligible: impl Fn(GhostState) -> bool,
    events: &mut EventWriter<GameEvent>,
) {
    for (ghost, mut behavior, _) in ghosts.iter_mut() {
        if !ghost.active || !eligible(behavior.state()) {
            continue;
        }
        if behavior.frighten(duration) {
            events.write(GameEvent::GhostStateChanged {
                ghost: ghost.kind,
                state: GhostState::Frightened,
            });
        }
    }
}

/// Resolves the player's contacts with pellets, power-ups and ghosts for this frame.
///
/// Pellets are handled first, so a ghost touched on the same frame a power pellet is eaten is
/// already frightened. A power pellet frightens every active ghost, eaten ones included. At most one ghost can catch the player per frame. Whole-stage changes
/// (life loss, level clear) are requested through [`StageTransition`] events.
#[allow(clippy::too_many_arguments)]
pub fn collision_system(
    mut commands: Commands,
    mut progression: ResMut<ProgressionState>,
    mut power_ups: ResMut<ActivePowerUps>,
    levels: Res<LevelTable>,
    players: Query<&Position, (With<PlayerControlled>, Without<Ghost>)>,
    pellets: Query<(Entity, &Pellet, &Position)>,
    pickups: Query<(Entity, &PowerUp, &Position)>,
    mut ghosts: GhostQuery,
    mut events: EventWriter<GameEvent>,
    mut transitions: EventWriter<StageTransition>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let score_before = progression.score;
    let level = levels.get(progression.level_index);

    let mut coin_eaten = false;
    for (entity, pellet, position) in pellets.iter() {
        if player.horizontal_distance(position) >= PELLET_RADIUS {
            continue;
        }
        commands.entity(entity).despawn();
        progression.consume_pellet(pellet.power);
        events.write(GameEvent::PelletConsumed {
            remaining: progression.pellets_remaining,
        });

        if pellet.power {
            debug!(duration = level.frightened_duration, "Power pellet consumed");
            events.write(GameEvent::PowerPelletConsumed);
            frighten_ghosts(&mut ghosts, level.frightened_duration, |_| true, &mut events);
        } else {
            coin_eaten = true;
        }
    }

    if coin_eaten && progression.goal_reached() {
        debug!(
            collected = progression.coins_collected,
            goal = progression.coin_goal,
            "Coin goal reached"
        );
        transitions.write(StageTransition::LevelCleared);
    }

    for (entity, pickup, position) in pickups.iter() {
        if player.horizontal_distance(position) >= POWER_UP_RADIUS {
            continue;
        }
        commands.entity(entity).despawn();
        power_ups.activate(pickup.kind);
        if pickup.kind == PowerUpKind::Freeze {
            frighten_ghosts(
                &mut ghosts,
                power_up::DURATION,
                |state| matches!(state, GhostState::Chasing | GhostState::Scatter),
                &mut events,
            );
        }
        events.write(GameEvent::PowerUpCollected(pickup.kind));
    }

    let double = power_ups.is_active(PowerUpKind::DoubleScore);
    let mut ghost_eaten = false;
    for (ghost, mut behavior, position) in ghosts.iter_mut() {
        if !ghost.active || player.horizontal_distance(position) >= GHOST_CONTACT_RADIUS {
            continue;
        }
        match behavior.state() {
            GhostState::Frightened => {
                let points = progression.eat_ghost(double);
                behavior.enter(GhostState::Eaten);
                ghost_eaten = true;
                debug!(ghost = %ghost.kind, points, chain = progression.ghost_chain, "Ghost eaten");
                events.write(GameEvent::GhostEaten { ghost: ghost.kind, points });
                events.write(GameEvent::GhostStateChanged {
                    ghost: ghost.kind,
                    state: GhostState::Eaten,
                });
            }
            GhostState::Chasing | GhostState::Scatter => {
                debug!(ghost = %ghost.kind, "Player caught");
                transitions.write(StageTransition::PlayerCaught { ghost: ghost.kind });
                break;
            }
            GhostState::Eaten => trace!(ghost = %ghost.kind, "Passed through eaten ghost"),
        }
    }

    if ghost_eaten
        && !ghosts
            .iter()
            .any(|(ghost, behavior, _)| ghost.active && behavior.is_frightened())
    {
        debug!("Last frightened ghost eaten");
        events.write(GameEvent::FrightenedEnded);
    }

    if progression.score != score_before {
        events.write(GameEvent::ScoreChanged(progression.score));
    }
}
