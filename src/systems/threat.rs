//! Proximity sensing for the danger overlay and the proximity tone.

use bevy_ecs::query::{With, Without};
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Query, ResMut};
use glam::Vec3;
use smallvec::SmallVec;

use crate::constants::threat::{DANGER_DISTANCE, MAX_INFLUENCE};
use crate::systems::components::{Ghost, GhostBehavior, GhostState, Player, PlayerControlled, Position};

/// How strongly nearby ghosts press in on the player from each side, each in `0..=0.8`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThreatInfluence {
    pub front: f32,
    pub back: f32,
    pub left: f32,
    pub right: f32,
}

impl ThreatInfluence {
    fn capped(self) -> Self {
        Self {
            front: self.front.min(MAX_INFLUENCE),
            back: self.back.min(MAX_INFLUENCE),
            left: self.left.min(MAX_INFLUENCE),
            right: self.right.min(MAX_INFLUENCE),
        }
    }
}

/// Latest threat readings, refreshed every frame.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct Threat {
    pub influence: ThreatInfluence,
    /// Distance to the closest chasing ghost, if any is chasing.
    pub nearest: Option<f32>,
}

/// Sums the directional pull of every threat within [`DANGER_DISTANCE`].
///
/// Each threat contributes `1 - distance / DANGER_DISTANCE`, split over the sides it lies on
/// relative to `forward` and `right`.
pub fn threat_influence(
    player: Vec3,
    forward: Vec3,
    right: Vec3,
    threats: impl IntoIterator<Item = Vec3>,
) -> ThreatInfluence {
    let mut total = ThreatInfluence::default();
    for threat in threats {
        let offset = threat - player;
        let distance = offset.length();
        if distance >= DANGER_DISTANCE {
            continue;
        }
        let proximity = 1.0 - distance / DANGER_DISTANCE;
        let direction = offset.normalize_or_zero();
        let ahead = direction.dot(forward);
        let side = direction.dot(right);
        total.front += proximity * ahead.max(0.0);
        total.back += proximity * (-ahead).max(0.0);
        total.right += proximity * side.max(0.0);
        total.left += proximity * (-side).max(0.0);
    }
    total.capped()
}

pub fn threat_system(
    mut threat: ResMut<Threat>,
    players: Query<(&Position, &Player), (With<PlayerControlled>, Without<Ghost>)>,
    ghosts: Query<(&Ghost, &GhostBehavior, &Position), Without<PlayerControlled>>,
) {
    let Ok((player_position, player)) = players.single() else {
        return;
    };
    let chasing: SmallVec<[Vec3; 4]> = ghosts
        .iter()
        .filter(|(ghost, behavior, _)| ghost.active && behavior.state() == GhostState::Chasing)
        .map(|(_, _, position)| position.0)
        .collect();

    threat.influence = threat_influence(player_position.0, player.forward(), player.right(), chasing.iter().copied());
    threat.nearest = chasing
        .iter()
        .map(|position| position.distance(player_position.0))
        .min_by(f32::total_cmp);
}
