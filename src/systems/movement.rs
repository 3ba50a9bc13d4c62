use bevy_ecs::query::With;
use bevy_ecs::system::{Query, Res};
use glam::{Vec2, Vec3};
use tracing::trace;

use crate::constants::{collider::PLAYER_SIZE, player};
use crate::input::InputState;
use crate::map::collider::{Aabb, ColliderSet};
use crate::map::grid::GridMap;
use crate::systems::components::{DeltaTime, Player, PlayerControlled, Position};
use crate::systems::power_up::ActivePowerUps;

/// Moves a box of `size` centred on `position` by `delta`, one horizontal axis at a time.
///
/// The X displacement is kept only if the moved box is clear of every collider; the Z
/// displacement is then tried from wherever X left the box. Blocking on one axis therefore
/// never cancels motion along the other (wall-slide), and a box pushed into a corner stays
/// put. The vertical component of `delta` is ignored.
pub fn try_move<C: ColliderSet + ?Sized>(position: Vec3, delta: Vec3, size: Vec3, colliders: &C) -> Vec3 {
    let mut resolved = position;

    let along_x = resolved + Vec3::new(delta.x, 0.0, 0.0);
    if !colliders.blocks(&Aabb::from_center_size(along_x, size)) {
        resolved = along_x;
    }

    let along_z = resolved + Vec3::new(0.0, 0.0, delta.z);
    if !colliders.blocks(&Aabb::from_center_size(along_z, size)) {
        resolved = along_z;
    }

    resolved
}

/// Moves `position` straight towards `target` at `speed`, sliding along walls.
///
/// Never overshoots the target. Returns the new position.
pub fn step_towards<C: ColliderSet + ?Sized>(
    position: Vec3,
    target: Vec3,
    speed: f32,
    dt: f32,
    size: Vec3,
    colliders: &C,
) -> Vec3 {
    let offset = Vec3::new(target.x - position.x, 0.0, target.z - position.z);
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return position;
    }
    let travel = (speed * dt).min(distance);
    try_move(position, offset / distance * travel, size, colliders)
}

/// Damps and accelerates the player's local velocity for one frame.
fn integrate_velocity(velocity: Vec2, axes: Vec2, speed: f32, dt: f32) -> Vec2 {
    let mut velocity = velocity - velocity * player::DAMPING * dt;
    let direction = axes.normalize_or_zero();
    if axes.x != 0.0 || axes.y != 0.0 {
        velocity += direction * speed * player::ACCELERATION * dt;
    }
    velocity
}

/// Advances the cosmetic head bob. Returns the new phase and offset.
fn advance_bob(phase: f32, offset: f32, moving: bool, dt: f32) -> (f32, f32) {
    if moving {
        let phase = phase + dt * player::BOB_SPEED;
        (phase, phase.sin() * player::BOB_AMPLITUDE)
    } else {
        (0.0, offset - offset * (dt * player::BOB_RELAX_RATE).min(1.0))
    }
}

/// Applies the held movement keys to the player and resolves the move against the maze.
pub fn player_movement_system(
    map: Res<GridMap>,
    delta_time: Res<DeltaTime>,
    input: Res<InputState>,
    power_ups: Res<ActivePowerUps>,
    mut players: Query<(&mut Player, &mut Position), With<PlayerControlled>>,
) {
    let dt = delta_time.0;
    for (mut motion, mut position) in players.iter_mut() {
        motion.yaw = input.yaw;
        let speed = power_ups.player_speed(motion.speed);
        motion.velocity = integrate_velocity(motion.velocity, input.axes(), speed, dt);

        let delta = (motion.right() * motion.velocity.x + motion.forward() * motion.velocity.y) * dt;
        let previous = position.0;
        position.0 = try_move(position.0, delta, PLAYER_SIZE, &*map);
        if previous != position.0 {
            trace!(from = %previous, to = %position.0, "Player moved");
        }

        let (phase, offset) = advance_bob(motion.bob_phase, motion.bob_offset, input.is_moving(), dt);
        motion.bob_phase = phase;
        motion.bob_offset = offset;
    }
}
