//! Fixed-interval simulation tick
//!
//! Advances a session by one step: distance and score, level progression,
//! obstacle movement and spawning, then collision resolution.

use super::collision::{Collision, find_collision};
use super::session::GameSession;
use super::state::{GameEvent, SessionPhase};

impl GameSession {
    /// Run one tick. Does nothing unless the session is active.
    pub(crate) fn update(&mut self) {
        if self.phase != SessionPhase::Active {
            return;
        }
        self.ticks += 1;

        // Speed can only change at a level-up below; keep this tick consistent
        let step = self.speed;
        self.distance += step;

        // May start the level-complete sequence; the rest of the tick still runs
        self.refresh_score();

        let pruned = self.field.advance(step);
        if pruned > 0 {
            log::trace!("Pruned {pruned} obstacles");
        }
        self.field
            .maybe_spawn(self.distance, self.tuning.spawn_lookahead);

        let near = self.tuning.collision_near;
        let far = self.tuning.collision_far;
        match find_collision(&self.player, self.field.obstacles(), near, far) {
            Some(Collision::Blocked { id, kind }) => {
                log::debug!("Blocked by {} #{id} in {:?}", kind.as_str(), self.player.lane);
                self.finish_run(Some(kind));
            }
            Some(Collision::Pickup { id }) => {
                self.field.remove(id);
                let bonus = self.tuning.crystal_bonus;
                self.bonus += bonus;
                self.refresh_score();
                self.emit(GameEvent::CrystalCollected { id, bonus });
            }
            None => {}
        }
    }
}
