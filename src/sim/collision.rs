//! Lane + distance-band collision detection and per-kind resolution
//!
//! The player sits at distance 0. An obstacle is "touching" when it shares
//! the player's lane and lies strictly inside the collision band. What that
//! means depends on the kind and on what the player is doing.

use super::state::{Obstacle, ObstacleId, ObstacleKind, PlayerState};

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Player ran into something they did not clear
    Blocked { id: ObstacleId, kind: ObstacleKind },
    /// Player drove through a crystal
    Pickup { id: ObstacleId },
}

/// True if the player's current stance gets them past this kind safely
pub fn is_cleared(kind: ObstacleKind, player: &PlayerState) -> bool {
    match kind {
        ObstacleKind::Rock | ObstacleKind::Gap => player.is_jumping(),
        ObstacleKind::LowCeiling => player.is_sliding(),
        ObstacleKind::Crystal => true,
    }
}

/// True if the obstacle is in the player's lane and inside `(near, far)`
pub fn in_band(obstacle: &Obstacle, player: &PlayerState, near: f64, far: f64) -> bool {
    obstacle.lane == player.lane && obstacle.distance > near && obstacle.distance < far
}

/// Find the first obstacle that does something to the player this tick.
///
/// At most one collision is reported. Obstacles the player clears are
/// skipped; crystals always count as a pickup.
pub fn find_collision(
    player: &PlayerState,
    obstacles: &[Obstacle],
    near: f64,
    far: f64,
) -> Option<Collision> {
    obstacles
        .iter()
        .filter(|o| in_band(o, player, near, far))
        .find_map(|o| match o.kind {
            ObstacleKind::Crystal => Some(Collision::Pickup { id: o.id }),
            kind if !is_cleared(kind, player) => Some(Collision::Blocked { id: o.id, kind }),
            _ => None,
        })
}
