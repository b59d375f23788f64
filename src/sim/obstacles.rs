//! Procedural obstacle stream
//!
//! Obstacles are placed at a fixed spacing along the track, each with a
//! uniformly random lane and kind. No smoothing or difficulty shaping: two
//! blocking obstacles may well sit side by side.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Lane, Obstacle, ObstacleId, ObstacleKind};
use crate::tuning::Tuning;

/// Live obstacles ahead of (and just behind) the player
#[derive(Debug, Clone)]
pub struct ObstacleField {
    /// Kept in spawn order
    obstacles: Vec<Obstacle>,
    /// Track distance where the next obstacle will be placed
    next_spawn: f64,
    next_id: ObstacleId,
    rng: Pcg32,
    spacing: f64,
    prune_distance: f64,
}

impl ObstacleField {
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        Self {
            obstacles: Vec::new(),
            next_spawn: tuning.initial_offset,
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
            spacing: tuning.spawn_spacing,
            prune_distance: tuning.prune_distance,
        }
    }

    /// Throw everything away and lay down a fresh opening batch
    pub fn reseed(&mut self, seed: u64, initial_offset: f64, batch: usize) {
        self.obstacles.clear();
        self.rng = Pcg32::seed_from_u64(seed);
        self.next_spawn = initial_offset;
        self.next_id = 1;
        for _ in 0..batch {
            self.generate(0.0);
        }
        log::debug!(
            "Obstacle field seeded: {} obstacles, next spawn at {}",
            self.obstacles.len(),
            self.next_spawn
        );
    }

    /// Place one random obstacle at the spawn cursor and move the cursor on
    pub fn generate(&mut self, travelled: f64) -> ObstacleId {
        let lane = Lane::ALL[self.rng.random_range(0..Lane::ALL.len())];
        let kind = ObstacleKind::ALL[self.rng.random_range(0..ObstacleKind::ALL.len())];
        let distance = self.next_spawn - travelled;
        self.next_spawn += self.spacing;
        self.place(lane, kind, distance)
    }

    /// Insert an obstacle at an explicit position without touching the cursor
    pub fn place(&mut self, lane: Lane, kind: ObstacleKind, distance: f64) -> ObstacleId {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle {
            id,
            lane,
            kind,
            distance,
        });
        id
    }

    /// Generate one obstacle if the cursor is inside the lookahead window.
    ///
    /// Fires at most once per call, so a cursor that has fallen far behind
    /// catches up one spacing per tick.
    pub fn maybe_spawn(&mut self, travelled: f64, lookahead: f64) -> Option<ObstacleId> {
        if self.next_spawn < travelled + lookahead {
            Some(self.generate(travelled))
        } else {
            None
        }
    }

    /// Move every obstacle toward the player and drop the ones left behind.
    /// Returns how many were pruned.
    pub fn advance(&mut self, step: f64) -> usize {
        for obstacle in &mut self.obstacles {
            obstacle.distance -= step;
        }
        let before = self.obstacles.len();
        let prune = self.prune_distance;
        self.obstacles.retain(|o| o.distance > prune);
        before - self.obstacles.len()
    }

    pub fn remove(&mut self, id: ObstacleId) -> Option<Obstacle> {
        let index = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(index))
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn next_spawn(&self) -> f64 {
        self.next_spawn
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
