//! Game state and core simulation types
//!
//! Everything the presentation layer can observe is defined here.

use serde::{Deserialize, Serialize};

/// One of the three parallel lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Lane {
    Left = 0,
    #[default]
    Center = 1,
    Right = 2,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lane `delta` steps away, clamped to the outer lanes (never wraps)
    pub fn shifted(self, delta: i32) -> Self {
        let index = (self as i32 + delta).clamp(0, 2);
        Self::ALL[index as usize]
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Jump over it
    Rock,
    /// Slide under it
    LowCeiling,
    /// Jump across it
    Gap,
    /// Pickup, never blocks
    Crystal,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Rock,
        ObstacleKind::LowCeiling,
        ObstacleKind::Gap,
        ObstacleKind::Crystal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::Rock => "rock",
            ObstacleKind::LowCeiling => "low ceiling",
            ObstacleKind::Gap => "gap",
            ObstacleKind::Crystal => "crystal",
        }
    }
}

pub type ObstacleId = u32;

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub lane: Lane,
    pub kind: ObstacleKind,
    /// Signed distance ahead of the player (negative once passed)
    pub distance: f64,
}

/// Which half of the jump arc the player is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpPhase {
    Rising,
    Falling,
}

/// Timed action state. Jumping and sliding can never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stance {
    #[default]
    Running,
    Jumping(JumpPhase),
    Sliding,
}

/// The player's cart
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerState {
    pub lane: Lane,
    pub stance: Stance,
}

impl PlayerState {
    pub fn is_jumping(&self) -> bool {
        matches!(self.stance, Stance::Jumping(_))
    }

    pub fn is_sliding(&self) -> bool {
        self.stance == Stance::Sliding
    }

    /// Shift lanes, returns true if the lane changed
    pub fn shift(&mut self, delta: i32) -> bool {
        let lane = self.lane.shifted(delta);
        let moved = lane != self.lane;
        self.lane = lane;
        moved
    }

    /// Take off, only from a plain run
    pub fn begin_jump(&mut self) -> bool {
        if self.stance != Stance::Running {
            return false;
        }
        self.stance = Stance::Jumping(JumpPhase::Rising);
        true
    }

    /// Duck, only from a plain run
    pub fn begin_slide(&mut self) -> bool {
        if self.stance != Stance::Running {
            return false;
        }
        self.stance = Stance::Sliding;
        true
    }

    /// Top of the arc: still airborne for collision purposes
    pub fn reach_apex(&mut self) {
        if self.stance == Stance::Jumping(JumpPhase::Rising) {
            self.stance = Stance::Jumping(JumpPhase::Falling);
        }
    }

    pub fn land(&mut self) {
        if self.is_jumping() {
            self.stance = Stance::Running;
        }
    }

    pub fn stand_up(&mut self) {
        if self.is_sliding() {
            self.stance = Stance::Running;
        }
    }
}

/// Discrete player intents coming from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    Slide,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing started yet
    #[default]
    Idle,
    /// Ticking
    Active,
    /// Stopped by the player, resumed explicitly
    Paused,
    /// Level-complete banner, resumes automatically
    LevelTransition,
    /// Run ended, only `start()` leaves this phase
    GameOver,
}

/// Notifications emitted by the session for observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { seed: u64 },
    Paused,
    Resumed,
    LevelComplete { completed_level: u32, next_level: u32 },
    LevelResumed { level: u32 },
    CrystalCollected { id: ObstacleId, bonus: u64 },
    GameOver {
        score: u64,
        level: u32,
        /// Obstacle that ended the run, `None` when ended by command
        cause: Option<ObstacleKind>,
    },
}

/// Read-only view of the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub lane: Lane,
    pub is_jumping: bool,
    pub is_sliding: bool,
    pub jump_phase: Option<JumpPhase>,
}

impl From<&PlayerState> for PlayerView {
    fn from(player: &PlayerState) -> Self {
        Self {
            lane: player.lane,
            is_jumping: player.is_jumping(),
            is_sliding: player.is_sliding(),
            jump_phase: match player.stance {
                Stance::Jumping(phase) => Some(phase),
                _ => None,
            },
        }
    }
}

/// Everything the UI layer polls once per tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub score: u64,
    pub distance: f64,
    pub level: u32,
    pub active: bool,
    pub game_over: bool,
    pub level_complete_showing: bool,
    pub completed_level: u32,
    pub player: PlayerView,
    pub obstacles: Vec<Obstacle>,
}
