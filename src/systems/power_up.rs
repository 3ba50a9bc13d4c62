use bevy_ecs::event::EventWriter;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Res, ResMut};
use smallvec::SmallVec;
use strum::{EnumCount, IntoEnumIterator};
use tracing::debug;

use crate::constants::power_up;
use crate::events::GameEvent;
use crate::systems::components::{DeltaTime, PowerUpKind};

/// Countdown timers for the power-up effects currently running, one slot per kind.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ActivePowerUps {
    remaining: [f32; PowerUpKind::COUNT],
}

impl ActivePowerUps {
    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.remaining[kind as usize] > 0.0
    }

    pub fn remaining(&self, kind: PowerUpKind) -> f32 {
        self.remaining[kind as usize]
    }

    /// Starts (or restarts) the effect of `kind` for the standard duration.
    pub fn activate(&mut self, kind: PowerUpKind) {
        debug!(power_up = %kind, duration = power_up::DURATION, "Power-up activated");
        self.remaining[kind as usize] = power_up::DURATION;
    }

    /// Counts every running effect down by `dt`; returns the kinds that ran out.
    pub fn tick(&mut self, dt: f32) -> SmallVec<[PowerUpKind; 3]> {
        let mut expired = SmallVec::new();
        for kind in PowerUpKind::iter() {
            let slot = &mut self.remaining[kind as usize];
            if *slot <= 0.0 {
                continue;
            }
            *slot -= dt;
            if *slot <= 0.0 {
                *slot = 0.0;
                expired.push(kind);
            }
        }
        expired
    }

    pub fn clear(&mut self) {
        self.remaining = [0.0; PowerUpKind::COUNT];
    }

    /// The player's effective speed given its base speed.
    pub fn player_speed(&self, base: f32) -> f32 {
        if self.is_active(PowerUpKind::Speed) {
            power_up::SPEED_FLOOR.max(base + power_up::SPEED_BONUS)
        } else {
            base
        }
    }

    /// Multiplier applied to ghost-eating rewards.
    pub fn score_multiplier(&self) -> u32 {
        if self.is_active(PowerUpKind::DoubleScore) {
            2
        } else {
            1
        }
    }
}

/// Counts down running power-up effects and reports the ones that ended.
pub fn power_up_timer_system(
    delta_time: Res<DeltaTime>,
    mut active: ResMut<ActivePowerUps>,
    mut events: EventWriter<GameEvent>,
) {
    for kind in active.tick(delta_time.0) {
        debug!(power_up = %kind, "Power-up expired");
        events.write(GameEvent::PowerUpExpired(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_boost() {
        let mut active = ActivePowerUps::default();
        assert_eq!(active.player_speed(2.5), 2.5);
        active.activate(PowerUpKind::Speed);
        assert!((active.player_speed(2.5) - 4.1).abs() < 1e-6);
        assert_eq!(active.player_speed(1.0), 3.0);
    }

    #[test]
    fn test_expiry_is_reported_once() {
        let mut active = ActivePowerUps::default();
        active.activate(PowerUpKind::DoubleScore);
        assert_eq!(active.score_multiplier(), 2);
        assert!(active.tick(7.0).is_empty());
        assert_eq!(active.tick(1.5).as_slice(), &[PowerUpKind::DoubleScore]);
        assert!(active.tick(1.0).is_empty());
        assert_eq!(active.score_multiplier(), 1);
    }

    #[test]
    fn test_reactivation_restarts_timer() {
        let mut active = ActivePowerUps::default();
        active.activate(PowerUpKind::Speed);
        active.tick(5.0);
        active.activate(PowerUpKind::Speed);
        assert_eq!(active.remaining(PowerUpKind::Speed), power_up::DURATION);
    }
}
