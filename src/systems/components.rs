use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use glam::{IVec2, Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use strum_macros::{Display, EnumCount, EnumIter, IntoStaticStr};
use tracing::debug;

use crate::constants::ghost;
use crate::map::grid::GridCell;

/// World-space position of an entity. The player sits at eye height; everything else sits on
/// the floor plane or just above it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec3);

impl Position {
    /// Distance to `other` ignoring height.
    pub fn horizontal_distance(&self, other: &Position) -> f32 {
        Vec2::new(self.0.x - other.0.x, self.0.z - other.0.z).length()
    }
}

/// A tag component for entities that are controlled by the player.
#[derive(Default, Component)]
pub struct PlayerControlled;

/// First-person motion state of the player.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// Velocity in the player's local frame: `x` to the right, `y` forward.
    pub velocity: Vec2,
    /// Facing angle around the vertical axis, copied from the input provider each frame.
    pub yaw: f32,
    /// Base movement speed, before power-ups.
    pub speed: f32,
    pub bob_phase: f32,
    /// Cosmetic vertical camera offset. Never affects collision.
    pub bob_offset: f32,
}

impl Player {
    pub fn new(speed: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            yaw: 0.0,
            speed,
            bob_phase: 0.0,
            bob_offset: 0.0,
        }
    }

    /// Unit vector the player looks along, on the floor plane.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Unit vector to the player's right, on the floor plane.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }
}

/// The four ghost personalities. The discriminant order is also the slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, Display, IntoStaticStr)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    /// The pen cell this ghost starts from and returns to.
    pub fn spawn_cell(self) -> GridCell {
        match self {
            GhostKind::Blinky => IVec2::new(9, 8),
            GhostKind::Pinky => IVec2::new(9, 9),
            GhostKind::Inky => IVec2::new(8, 8),
            GhostKind::Clyde => IVec2::new(10, 8),
        }
    }

    pub fn slot(self) -> usize {
        self as usize
    }
}

/// Static identity of a ghost plus the level-dependent tuning applied to it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Ghost {
    pub kind: GhostKind,
    pub spawn: Vec3,
    pub speed: f32,
    /// Slots beyond the level's active ghost count are parked and ignored.
    pub active: bool,
}

impl Ghost {
    pub fn new(kind: GhostKind, spawn: Vec3) -> Self {
        Self {
            kind,
            spawn,
            speed: ghost::BASE_SPEED,
            active: true,
        }
    }
}

/// The behaviour state of a ghost. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IntoStaticStr)]
pub enum GhostState {
    #[default]
    Chasing,
    Scatter,
    Frightened,
    Eaten,
}

/// Mutable per-ghost AI state.
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct GhostBehavior {
    state: GhostState,
    /// Seconds of fright left; zero outside [`GhostState::Frightened`].
    pub frightened_timer: f32,
    /// Cached path from the last repath, only kept while chasing or scattering.
    pub path: Option<Vec<GridCell>>,
    pub repath_cooldown: f32,
    /// Corner a frightened ghost is currently fleeing towards.
    pub flee_corner: Option<GridCell>,
}

impl GhostBehavior {
    pub fn state(&self) -> GhostState {
        self.state
    }

    pub fn is_frightened(&self) -> bool {
        self.state == GhostState::Frightened
    }

    /// Whether the ghost is hunting the player, i.e. touching it costs a life.
    pub fn is_hostile(&self) -> bool {
        matches!(self.state, GhostState::Chasing | GhostState::Scatter)
    }

    /// Moves to `state`, clearing whatever belonged to the previous one.
    ///
    /// Returns `true` if the state actually changed.
    pub fn enter(&mut self, state: GhostState) -> bool {
        if self.state == state {
            return false;
        }
        debug!(from = %self.state, to = %state, "Ghost state transition");
        self.state = state;
        self.path = None;
        self.repath_cooldown = 0.0;
        if state != GhostState::Frightened {
            self.frightened_timer = 0.0;
            self.flee_corner = None;
        }
        true
    }

    /// Enters (or re-enters) the frightened state for `duration` seconds.
    ///
    /// Returns `true` if the ghost was not frightened before.
    pub fn frighten(&mut self, duration: f32) -> bool {
        let changed = self.enter(GhostState::Frightened);
        self.frightened_timer = duration;
        changed
    }

    /// Back to a freshly spawned ghost.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A collectible pellet. Power pellets frighten the ghosts.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pellet {
    pub power: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, Display, IntoStaticStr)]
pub enum PowerUpKind {
    /// Temporary movement speed boost.
    Speed,
    /// Frightens every hunting ghost.
    Freeze,
    /// Doubles ghost-eating rewards.
    DoubleScore,
}

/// A power-up pickup lying in the maze.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
}

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: PlayerControlled,
    pub motion: Player,
    pub position: Position,
}

#[derive(Bundle)]
pub struct GhostBundle {
    pub ghost: Ghost,
    pub behavior: GhostBehavior,
    pub position: Position,
}

#[derive(Bundle)]
pub struct PelletBundle {
    pub pellet: Pellet,
    pub position: Position,
}

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DeltaTime(pub f32);

/// The simulation's only source of randomness.
#[derive(Resource, Debug, Clone)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    /// Seeds deterministically when a seed is given, otherwise from the thread RNG.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(SmallRng::seed_from_u64(seed)),
            None => Self(SmallRng::from_rng(&mut rand::rng())),
        }
    }
}
