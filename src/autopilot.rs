//! Idle/demo mode - a simple AI that plays the game
//!
//! Looks only at the snapshot and the session's tuning, so it can drive a local
//! session or one running on the runtime thread. Prefers dodging into a clear
//! lane; jumps or slides only when boxed in. Drifts toward crystals when
//! nothing is threatening.

use crate::sim::{Intent, Lane, Obstacle, ObstacleKind, Snapshot};
use crate::tuning::Tuning;

/// How far past the collision band the autopilot looks for trouble
const DANGER_MARGIN: f64 = 150.0;
/// How far past the collision band it will chase a crystal
const CRYSTAL_MARGIN: f64 = 300.0;

fn is_blocking(obstacle: &Obstacle) -> bool {
    obstacle.kind != ObstacleKind::Crystal
}

/// Anything in the lane that could still end the run soon
fn lane_threat<'a>(snapshot: &'a Snapshot, tuning: &Tuning, lane: Lane) -> Option<&'a Obstacle> {
    let window = tuning.collision_far + DANGER_MARGIN;
    snapshot
        .obstacles
        .iter()
        .filter(|o| o.lane == lane && is_blocking(o))
        .filter(|o| o.distance > tuning.collision_near && o.distance < window)
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

fn step_toward(from: Lane, to: Lane) -> Option<Intent> {
    match to.index().cmp(&from.index()) {
        std::cmp::Ordering::Less => Some(Intent::MoveLeft),
        std::cmp::Ordering::Greater => Some(Intent::MoveRight),
        std::cmp::Ordering::Equal => None,
    }
}

/// Adjacent lanes, nearest first
fn neighbours(lane: Lane) -> impl Iterator<Item = Lane> {
    [lane.shifted(-1), lane.shifted(1)]
        .into_iter()
        .filter(move |&l| l != lane)
}

/// Pick at most one intent for this tick
pub fn decide(snapshot: &Snapshot, tuning: &Tuning) -> Option<Intent> {
    if !snapshot.active {
        return None;
    }
    let player = &snapshot.player;

    if let Some(threat) = lane_threat(snapshot, tuning, player.lane) {
        // Dodge if there's somewhere to go
        if let Some(lane) =
            neighbours(player.lane).find(|&l| lane_threat(snapshot, tuning, l).is_none())
        {
            return step_toward(player.lane, lane);
        }

        // Boxed in: wait until it is close enough that the action covers the band
        if threat.distance < tuning.collision_far + 10.0 && !player.is_jumping && !player.is_sliding {
            return Some(match threat.kind {
                ObstacleKind::LowCeiling => Intent::Slide,
                _ => Intent::Jump,
            });
        }
        return None;
    }

    // Nothing dangerous: go shopping
    let crystal = snapshot
        .obstacles
        .iter()
        .filter(|o| o.kind == ObstacleKind::Crystal)
        .filter(|o| {
            o.distance > tuning.collision_far
                && o.distance < tuning.collision_far + CRYSTAL_MARGIN
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))?;

    let intent = step_toward(player.lane, crystal.lane)?;
    let next = player.lane.shifted(if intent == Intent::MoveLeft { -1 } else { 1 });
    if lane_threat(snapshot, tuning, next).is_some() {
        return None;
    }
    Some(intent)
}
