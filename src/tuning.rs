//! Game balance and timing
//!
//! Loaded from a JSON file; any field left out takes its default from
//! [`crate::consts`].

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Why a tuning file was rejected
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "cannot read tuning file: {e}"),
            TuningError::Parse(e) => write!(f, "malformed tuning file: {e}"),
            TuningError::Invalid(reason) => write!(f, "invalid tuning: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// All gameplay numbers in one place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Clock ===
    pub tick_interval_ms: u64,
    pub max_catchup_ticks: u32,

    // === Speed & scoring ===
    /// Distance per tick at level 1
    pub base_speed: f64,
    /// Extra distance per tick for each level above 1
    pub speed_per_level: f64,
    pub distance_per_point: f64,
    pub points_per_level: u64,
    pub max_level: u32,
    pub crystal_bonus: u64,

    // === Obstacle field ===
    pub spawn_spacing: f64,
    pub initial_offset: f64,
    pub initial_batch: usize,
    pub spawn_lookahead: f64,
    pub prune_distance: f64,

    // === Collision band ===
    pub collision_near: f64,
    pub collision_far: f64,

    // === Timed actions ===
    pub jump_ms: u64,
    pub jump_apex_ms: u64,
    pub slide_ms: u64,
    pub level_pause_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            max_catchup_ticks: MAX_CATCHUP_TICKS,

            base_speed: BASE_SPEED,
            speed_per_level: 0.0,
            distance_per_point: DISTANCE_PER_POINT,
            points_per_level: POINTS_PER_LEVEL,
            max_level: MAX_LEVEL,
            crystal_bonus: CRYSTAL_BONUS,

            spawn_spacing: SPAWN_SPACING,
            initial_offset: INITIAL_OFFSET,
            initial_batch: INITIAL_BATCH,
            spawn_lookahead: SPAWN_LOOKAHEAD,
            prune_distance: PRUNE_DISTANCE,

            collision_near: COLLISION_NEAR,
            collision_far: COLLISION_FAR,

            jump_ms: JUMP_MS,
            jump_apex_ms: JUMP_APEX_MS,
            slide_ms: SLIDE_MS,
            level_pause_ms: LEVEL_PAUSE_MS,
        }
    }
}

impl Tuning {
    /// Per-tick speed at a given level
    pub fn speed_for_level(&self, level: u32) -> f64 {
        self.base_speed + self.speed_per_level * level.saturating_sub(1) as f64
    }

    /// Level reached with a given score, capped at `max_level`
    pub fn level_for_score(&self, score: u64) -> u32 {
        let level = score / self.points_per_level + 1;
        level.min(self.max_level as u64) as u32
    }

    /// Reject numbers that would break the simulation.
    ///
    /// The collision band must be at least as wide as the fastest per-tick
    /// step, otherwise an obstacle can hop over the band between two ticks.
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |reason: String| -> Result<(), TuningError> { Err(TuningError::Invalid(reason)) };

        if self.tick_interval_ms == 0 {
            return invalid("tick_interval_ms must be positive".into());
        }
        if !(self.base_speed > 0.0) || self.speed_per_level < 0.0 {
            return invalid("speed must be positive and non-decreasing".into());
        }
        if !(self.distance_per_point > 0.0) || self.points_per_level == 0 {
            return invalid("scoring divisors must be positive".into());
        }
        if self.max_level == 0 {
            return invalid("max_level must be at least 1".into());
        }
        if !(self.spawn_spacing > 0.0) {
            return invalid("spawn_spacing must be positive".into());
        }
        if !(self.collision_far > self.collision_near) {
            return invalid(format!(
                "collision band ({}, {}) is empty",
                self.collision_near, self.collision_far
            ));
        }
        if self.prune_distance >= self.collision_near {
            return invalid("prune_distance must lie behind the collision band".into());
        }
        let top_speed = self.speed_for_level(self.max_level);
        let band = self.collision_far - self.collision_near;
        if top_speed > band {
            return invalid(format!(
                "top speed {top_speed} exceeds collision band width {band}"
            ));
        }
        if self.jump_apex_ms > self.jump_ms {
            return invalid("jump_apex_ms must not exceed jump_ms".into());
        }
        Ok(())
    }

    /// Parse and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = fs::read_to_string(path.as_ref())?;
        let tuning: Tuning = serde_json::from_str(&json)?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// These numbers if they pass [`Tuning::validate`], the defaults otherwise
    pub fn validated_or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    /// Like [`Tuning::load`], falling back to defaults on any problem
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), TuningError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
