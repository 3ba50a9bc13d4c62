use std::f32::consts::FRAC_PI_2;

use bevy_ecs::{system::RunSystemOnce, world::World};
use glam::{IVec2, Vec3};
use maze_chase::constants::collider::PLAYER_SIZE;
use maze_chase::input::{InputState, MoveButtons};
use maze_chase::map::collider::Aabb;
use maze_chase::systems::movement::{player_movement_system, try_move};
use maze_chase::systems::{ActivePowerUps, Player, Position, PowerUpKind};
use speculoos::prelude::*;

mod common;

const SPAWN: Vec3 = Vec3::new(2.0, 0.5, 2.0);

#[test]
fn test_free_move_applies_full_delta() {
    let map = common::test_map();
    let moved = try_move(SPAWN, Vec3::new(0.5, 0.0, 0.0), PLAYER_SIZE, &map);
    assert_that(&moved).is_equal_to(Vec3::new(2.5, 0.5, 2.0));
}

#[test]
fn test_blocked_axis_keeps_orthogonal_motion() {
    let map = common::test_map();
    // West of the spawn is the outer wall; south is open corridor.
    let moved = try_move(SPAWN, Vec3::new(-1.0, 0.0, 0.3), PLAYER_SIZE, &map);
    assert_that(&moved.x).is_equal_to(2.0);
    assert_that(&moved.z).is_equal_to(2.3);
}

#[test]
fn test_corner_stops_all_motion() {
    let map = common::test_map();
    let moved = try_move(SPAWN, Vec3::new(-1.0, 0.0, -1.0), PLAYER_SIZE, &map);
    assert_that(&moved).is_equal_to(SPAWN);
}

#[test]
fn test_touching_a_wall_is_not_a_collision() {
    let map = common::test_map();
    // The box edge lands exactly on the wall face at x = 1.
    let moved = try_move(SPAWN, Vec3::new(-0.75, 0.0, 0.0), PLAYER_SIZE, &map);
    assert_that(&moved.x).is_equal_to(1.25);
}

#[test]
fn test_explicit_collider_list() {
    let walls = vec![
        Aabb::from_center_size(Vec3::new(2.0, 0.75, 0.0), Vec3::new(1.0, 1.5, 10.0)),
        Aabb::from_center_size(Vec3::new(0.0, 0.75, 2.0), Vec3::new(10.0, 1.5, 1.0)),
    ];
    let start = Vec3::new(0.0, 0.5, 0.0);

    let slid = try_move(start, Vec3::new(1.5, 0.0, -0.5), PLAYER_SIZE, &walls);
    assert_that(&slid).is_equal_to(Vec3::new(0.0, 0.5, -0.5));

    let cornered = try_move(start, Vec3::new(1.5, 0.0, 1.5), PLAYER_SIZE, walls.as_slice());
    assert_that(&cornered).is_equal_to(start);
}

#[test]
fn test_vertical_delta_is_ignored() {
    let walls: Vec<Aabb> = Vec::new();
    let moved = try_move(SPAWN, Vec3::new(0.0, 5.0, 0.0), PLAYER_SIZE, &walls);
    assert_that(&moved).is_equal_to(SPAWN);
}

fn world_with_player(yaw: f32, buttons: MoveButtons) -> World {
    let mut world = common::create_test_world();
    common::spawn_test_player(&mut world, IVec2::new(1, 1));
    world.insert_resource(InputState::locked().with_buttons(buttons).with_yaw(yaw));
    world
}

fn run_frames(world: &mut World, frames: usize) -> (Player, Vec3) {
    for _ in 0..frames {
        world.run_system_once(player_movement_system).expect("System should run successfully");
    }
    let (player, position) = world.query::<(&Player, &Position)>().single(world).unwrap();
    (*player, position.0)
}

#[test]
fn test_player_walks_forward_along_corridor() {
    // Yaw of -90 degrees looks down +X.
    let mut world = world_with_player(-FRAC_PI_2, MoveButtons::FORWARD);
    let (player, position) = run_frames(&mut world, 60);
    assert_that(&position.x).is_greater_than(2.5);
    assert_that(&(position.z - 2.0).abs()).is_less_than(1e-3);
    assert_that(&position.y).is_equal_to(0.5);
    assert_that(&player.bob_offset.abs()).is_greater_than(0.0);
}

#[test]
fn test_player_cannot_walk_through_wall() {
    // Yaw of +90 degrees looks down -X, straight into the outer wall.
    let mut world = world_with_player(FRAC_PI_2, MoveButtons::FORWARD);
    let (_, position) = run_frames(&mut world, 240);
    assert_that(&position.x).is_greater_than_or_equal_to(1.25);
}

#[test]
fn test_strafing_uses_the_right_vector() {
    // At yaw 0 the right vector is +X.
    let mut world = world_with_player(0.0, MoveButtons::STRAFE_RIGHT);
    let (_, position) = run_frames(&mut world, 30);
    assert_that(&position.x).is_greater_than(2.0);
}

#[test]
fn test_speed_power_up_moves_further() {
    let mut normal = world_with_player(-FRAC_PI_2, MoveButtons::FORWARD);
    let mut boosted = world_with_player(-FRAC_PI_2, MoveButtons::FORWARD);
    boosted.resource_mut::<ActivePowerUps>().activate(PowerUpKind::Speed);

    let (_, slow) = run_frames(&mut normal, 40);
    let (_, fast) = run_frames(&mut boosted, 40);
    assert_that(&fast.x).is_greater_than(slow.x);
}

#[test]
fn test_bob_relaxes_when_idle() {
    let mut world = world_with_player(-FRAC_PI_2, MoveButtons::FORWARD);
    let (moving, _) = run_frames(&mut world, 10);
    assert_that(&moving.bob_phase).is_greater_than(0.0);

    world.insert_resource(InputState::locked().with_yaw(-FRAC_PI_2));
    let (idle, _) = run_frames(&mut world, 120);
    assert_that(&idle.bob_phase).is_equal_to(0.0);
    assert_that(&idle.bob_offset.abs()).is_less_than(1e-4);
}
