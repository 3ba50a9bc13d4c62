#![allow(dead_code)]

use bevy_ecs::{
    entity::Entity,
    event::{EventRegistry, Events},
    query::With,
    world::World,
};
use glam::{IVec2, Vec3};
use maze_chase::{
    config::{GameConfig, LevelTable},
    constants::{collider::ITEM_HEIGHT, ghost::HOVER_HEIGHT, player::EYE_HEIGHT, RAW_LAYOUT},
    events::{GameEvent, StageTransition},
    game::Game,
    input::InputState,
    map::grid::GridMap,
    systems::{
        ActivePowerUps, DeltaTime, GamePhase, Ghost, GhostBehavior, GhostKind, GhostState, Pellet, Player,
        PlayerControlled, Position, ProgressionState, ScatterClock, SimRng, Threat,
    },
};

pub const FRAME: f32 = 1.0 / 60.0;

pub fn test_map() -> GridMap {
    GridMap::parse(&RAW_LAYOUT).unwrap()
}

pub fn cell_position(cell: IVec2, height: f32) -> Vec3 {
    test_map().cell_to_world(cell).with_y(height)
}

/// A world with every resource the per-frame systems read, in the playing phase of the first
/// level, with no entities.
pub fn create_test_world() -> World {
    let mut world = World::default();
    EventRegistry::register_event::<GameEvent>(&mut world);
    EventRegistry::register_event::<StageTransition>(&mut world);

    let config = GameConfig {
        seed: Some(42),
        ..GameConfig::default()
    };
    let mut progression = ProgressionState::new(config.starting_lives);
    progression.begin_level(0, 8, 140, 144);
    progression.phase = GamePhase::Playing;

    world.insert_resource(test_map());
    world.insert_resource(SimRng::new(config.seed));
    world.insert_resource(LevelTable::new(config.levels.clone()));
    world.insert_resource(config);
    world.insert_resource(progression);
    world.insert_resource(DeltaTime(FRAME));
    world.insert_resource(InputState::locked());
    world.insert_resource(ScatterClock::default());
    world.insert_resource(ActivePowerUps::default());
    world.insert_resource(Threat::default());
    world
}

pub fn spawn_test_player(world: &mut World, cell: IVec2) -> Entity {
    world
        .spawn((
            PlayerControlled,
            Player::new(maze_chase::constants::player::BASE_SPEED),
            Position(cell_position(cell, EYE_HEIGHT)),
        ))
        .id()
}

pub fn spawn_test_ghost(world: &mut World, kind: GhostKind, cell: IVec2, state: GhostState) -> Entity {
    let position = cell_position(cell, HOVER_HEIGHT);
    let mut behavior = GhostBehavior::default();
    match state {
        GhostState::Frightened => {
            behavior.frighten(6.0);
        }
        other => {
            behavior.enter(other);
        }
    }
    let spawn = cell_position(kind.spawn_cell(), HOVER_HEIGHT);
    world
        .spawn((Ghost::new(kind, spawn), behavior, Position(position)))
        .id()
}

pub fn spawn_test_pellet(world: &mut World, cell: IVec2, power: bool) -> Entity {
    world
        .spawn((Pellet { power }, Position(cell_position(cell, ITEM_HEIGHT))))
        .id()
}

pub fn drain_events(world: &mut World) -> Vec<GameEvent> {
    world.resource_mut::<Events<GameEvent>>().drain().collect()
}

pub fn drain_transitions(world: &mut World) -> Vec<StageTransition> {
    world.resource_mut::<Events<StageTransition>>().drain().collect()
}

pub fn ghost_state(world: &mut World, entity: Entity) -> GhostState {
    world.get::<GhostBehavior>(entity).unwrap().state()
}

/// A seeded game that has already been started with a locked input.
pub fn started_game(config: GameConfig) -> Game {
    let mut game = Game::new(GameConfig {
        seed: Some(7),
        ..config
    })
    .unwrap();
    game.step(InputState::locked(), 0.0);
    assert_eq!(game.phase(), GamePhase::Playing);
    game
}

pub fn set_player_position(game: &mut Game, position: Vec3) {
    let mut players = game.world.query_filtered::<&mut Position, With<PlayerControlled>>();
    for mut player in players.iter_mut(&mut game.world) {
        player.0 = position;
    }
}

pub fn set_ghost_position(game: &mut Game, kind: GhostKind, position: Vec3) {
    let mut ghosts = game.world.query::<(&Ghost, &mut Position)>();
    for (ghost, mut current) in ghosts.iter_mut(&mut game.world) {
        if ghost.kind == kind {
            current.0 = position;
        }
    }
}

pub fn count_pellets(world: &mut World, power: bool) -> usize {
    world
        .query::<&Pellet>()
        .iter(world)
        .filter(|pellet| pellet.power == power)
        .count()
}
