//! The Entity-Component-System (ECS) module.
//!
//! This module contains the components, resources and systems that make up one simulation
//! step, plus the world-level stage operations.

pub mod collision;
pub mod components;
pub mod ghost;
pub mod movement;
pub mod power_up;
pub mod progression;
pub mod stage;
pub mod threat;

pub use self::collision::collision_system;
pub use self::components::*;
pub use self::ghost::{ghost_system, scatter_mode_system, ScatterClock};
pub use self::movement::player_movement_system;
pub use self::power_up::{power_up_timer_system, ActivePowerUps};
pub use self::progression::{GamePhase, ProgressionState};
pub use self::stage::stage_system;
pub use self::threat::{threat_system, Threat};
