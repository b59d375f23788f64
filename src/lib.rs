//! Crystal Cart - a three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scheduler, obstacles, collisions, session)
//! - `ledger`: Finished-run score records
//! - `tuning`: Data-driven game balance
//! - `runtime`: Real-time driver thread for a session
//! - `autopilot`: Idle/demo mode player

pub mod autopilot;
pub mod ledger;
pub mod runtime;
pub mod sim;
pub mod tuning;

pub use ledger::{JsonFileLedger, LedgerError, MemoryLedger, ScoreLedger, ScoreRecord};
pub use sim::{GameEvent, GameSession, Intent, Lane, ObstacleKind, SessionPhase, Snapshot};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed tick interval (16 ms, ~62.5 Hz)
    pub const TICK_INTERVAL_MS: u64 = 16;
    /// Maximum overdue ticks fired by one pump before the schedule re-anchors
    pub const MAX_CATCHUP_TICKS: u32 = 8;

    /// Distance travelled per tick at level 1
    pub const BASE_SPEED: f64 = 5.0;
    /// Travelled distance per score point
    pub const DISTANCE_PER_POINT: f64 = 10.0;
    /// Score needed per level
    pub const POINTS_PER_LEVEL: u64 = 1000;
    /// Level cap
    pub const MAX_LEVEL: u32 = 10;

    /// Gap between consecutive obstacle spawn points
    pub const SPAWN_SPACING: f64 = 400.0;
    /// Where the first obstacle of a run is placed
    pub const INITIAL_OFFSET: f64 = 800.0;
    /// Obstacles generated when a run starts
    pub const INITIAL_BATCH: usize = 10;
    /// How far ahead of the player the field is kept populated
    pub const SPAWN_LOOKAHEAD: f64 = 2000.0;
    /// Obstacles at or behind this distance are pruned
    pub const PRUNE_DISTANCE: f64 = -200.0;

    /// Collision band (exclusive on both ends)
    pub const COLLISION_NEAR: f64 = 50.0;
    pub const COLLISION_FAR: f64 = 150.0;
    /// Score bonus for picking up a crystal
    pub const CRYSTAL_BONUS: u64 = 100;

    /// Jump lasts this long in total
    pub const JUMP_MS: u64 = 900;
    /// Time from takeoff to the top of the jump
    pub const JUMP_APEX_MS: u64 = 300;
    pub const SLIDE_MS: u64 = 1000;
    /// Level-complete banner time before play resumes
    pub const LEVEL_PAUSE_MS: u64 = 3000;
}
