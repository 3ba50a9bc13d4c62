//! The abstract per-frame input state polled by the simulation.

use bevy_ecs::resource::Resource;
use bitflags::bitflags;

bitflags! {
    /// Movement keys currently held.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveButtons: u8 {
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const STRAFE_LEFT = 1 << 2;
        const STRAFE_RIGHT = 1 << 3;
    }
}

/// Snapshot of the input provider, taken once per step.
#[derive(Resource, Default, Clone, Copy, Debug, PartialEq)]
pub struct InputState {
    pub buttons: MoveButtons,
    /// Whether the pointer is locked to the game. The simulation is paused while unlocked.
    pub locked: bool,
    /// Facing angle around the vertical axis, in radians. Zero looks down negative Z.
    pub yaw: f32,
}

impl InputState {
    pub fn locked() -> Self {
        Self {
            locked: true,
            ..Self::default()
        }
    }

    pub fn with_buttons(mut self, buttons: MoveButtons) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn is_moving(&self) -> bool {
        !self.buttons.is_empty()
    }

    /// Requested movement in the player's local frame: `x` strafes right, `y` moves forward.
    /// Opposing keys cancel out.
    pub fn axes(&self) -> glam::Vec2 {
        let axis = |positive: MoveButtons, negative: MoveButtons| {
            self.buttons.contains(positive) as i32 as f32 - self.buttons.contains(negative) as i32 as f32
        };
        glam::Vec2::new(
            axis(MoveButtons::STRAFE_RIGHT, MoveButtons::STRAFE_LEFT),
            axis(MoveButtons::FORWARD, MoveButtons::BACKWARD),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_axes() {
        let input = InputState::locked().with_buttons(MoveButtons::FORWARD | MoveButtons::STRAFE_LEFT);
        assert_eq!(input.axes(), Vec2::new(-1.0, 1.0));
        assert!(input.is_moving());
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let input = InputState::locked().with_buttons(MoveButtons::FORWARD | MoveButtons::BACKWARD);
        assert_eq!(input.axes(), Vec2::ZERO);
        assert!(input.is_moving());
    }

    #[test]
    fn test_default_is_unlocked_and_idle() {
        let input = InputState::default();
        assert!(!input.locked);
        assert!(!input.is_moving());
    }
}
