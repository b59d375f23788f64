//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick interval only, time comes from an injected `Clock`
//! - Seeded RNG only
//! - Stable iteration order (obstacles kept in spawn order)
//! - No rendering, platform or disk dependencies

pub mod collision;
pub mod obstacles;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::{Collision, find_collision};
pub use obstacles::ObstacleField;
pub use scheduler::{Clock, Due, ManualClock, Scheduler, SystemClock, TimerId, TimerTask};
pub use session::GameSession;
pub use state::{
    GameEvent, Intent, JumpPhase, Lane, Obstacle, ObstacleId, ObstacleKind, PlayerState,
    PlayerView, SessionPhase, Snapshot, Stance,
};
