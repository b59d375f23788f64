//! Tick source and one-shot timers
//!
//! The scheduler never sleeps and never spawns anything. It keeps a single
//! fixed-interval tick source plus a queue of one-shot timers, and hands out
//! whatever is due when asked. Time comes from a [`Clock`] so the same code
//! runs against the wall clock in the runtime and a manual clock in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Time source for a session
pub trait Clock: Send {
    /// Monotonic milliseconds since an arbitrary origin
    fn now_ms(&self) -> u64;
    /// Wall-clock Unix time in milliseconds, used for score records
    fn timestamp_ms(&self) -> u64;
}

/// Real time
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn timestamp_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
    epoch_ms: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock whose timestamps start at the given Unix time
    pub fn with_timestamp(epoch_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(0)),
            epoch_ms,
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn timestamp_ms(&self) -> u64 {
        self.epoch_ms + self.now_ms()
    }
}

pub type TimerId = u64;

/// Delayed state changes a session can schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    JumpApex,
    JumpLand,
    SlideEnd,
    LevelResume,
}

/// Something the scheduler says is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    Tick { at_ms: u64 },
    Timer { task: TimerTask, epoch: u64, at_ms: u64 },
}

#[derive(Debug, Clone)]
struct PendingTimer {
    id: TimerId,
    due_ms: u64,
    epoch: u64,
    task: TimerTask,
}

#[derive(Debug, Clone, Copy)]
struct TickSource {
    generation: u64,
    next_due_ms: u64,
}

/// Fixed-interval tick source plus cancelable one-shot timers
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval_ms: u64,
    max_catchup: u32,
    source: Option<TickSource>,
    paused: bool,
    /// Bumped every time a tick source is created
    generation: u64,
    timers: Vec<PendingTimer>,
    next_timer_id: TimerId,
}

impl Scheduler {
    /// Idle scheduler. Zero interval or catch-up limits are raised to 1.
    pub fn new(interval_ms: u64, max_catchup: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            max_catchup: max_catchup.max(1),
            source: None,
            paused: false,
            generation: 0,
            timers: Vec::new(),
            next_timer_id: 1,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of tick sources created so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin ticking, replacing any live tick source
    pub fn start(&mut self, now_ms: u64) {
        if self.source.is_some() {
            log::debug!("Replacing live tick source (generation {})", self.generation);
        }
        self.generation += 1;
        self.source = Some(TickSource {
            generation: self.generation,
            next_due_ms: now_ms + self.interval_ms,
        });
        self.paused = false;
    }

    /// Halt ticking, remembering that we may resume
    pub fn pause(&mut self) {
        if self.source.take().is_some() {
            self.paused = true;
        }
    }

    /// Restart ticking if currently halted. Returns true if a source was created.
    pub fn resume(&mut self, now_ms: u64) -> bool {
        if self.source.is_some() {
            return false;
        }
        self.start(now_ms);
        true
    }

    /// Halt ticking. Idempotent; returns true if a source was live.
    pub fn stop(&mut self) -> bool {
        self.paused = false;
        match self.source.take() {
            Some(source) => {
                log::debug!("Tick source {} stopped", source.generation);
                true
            }
            None => false,
        }
    }

    /// Queue a one-shot task `delay_ms` from now, tagged with the caller's epoch
    pub fn schedule_once(
        &mut self,
        now_ms: u64,
        delay_ms: u64,
        epoch: u64,
        task: TimerTask,
    ) -> TimerId {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        self.timers.push(PendingTimer {
            id,
            due_ms: now_ms + delay_ms,
            epoch,
            task,
        });
        id
    }

    /// Drop a pending timer. Returns false if it already fired or was never queued.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Drop every pending timer; the tick source is untouched
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether a timer for `task` is still queued
    pub fn has_pending(&self, task: TimerTask) -> bool {
        self.timers.iter().any(|t| t.task == task)
    }

    /// Earliest instant at which something becomes due
    pub fn next_deadline(&self) -> Option<u64> {
        let tick = self.source.map(|s| s.next_due_ms);
        let timer = self.timers.iter().map(|t| t.due_ms).min();
        match (tick, timer) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Take the earliest item due at or before `now_ms`.
    ///
    /// Timers win ties with the tick. When the tick source has fallen more
    /// than `max_catchup` intervals behind, the backlog is dropped and the
    /// schedule is re-anchored to `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Due> {
        let timer_idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i);
        let tick_due = self
            .source
            .map(|s| s.next_due_ms)
            .filter(|&due| due <= now_ms);

        match (timer_idx, tick_due) {
            (Some(i), Some(tick)) if self.timers[i].due_ms <= tick => Some(self.take_timer(i)),
            (Some(i), None) => Some(self.take_timer(i)),
            (_, Some(_)) => self.take_tick(now_ms),
            (None, None) => None,
        }
    }

    fn take_timer(&mut self, index: usize) -> Due {
        let timer = self.timers.remove(index);
        Due::Timer {
            task: timer.task,
            epoch: timer.epoch,
            at_ms: timer.due_ms,
        }
    }

    fn take_tick(&mut self, now_ms: u64) -> Option<Due> {
        let interval = self.interval_ms;
        let max_catchup = self.max_catchup as u64;
        let source = self.source.as_mut()?;

        let behind = now_ms.saturating_sub(source.next_due_ms) / interval;
        if behind >= max_catchup {
            log::debug!("Tick source fell {} intervals behind, re-anchoring", behind);
            source.next_due_ms = now_ms;
        }
        let at_ms = source.next_due_ms;
        source.next_due_ms += interval;
        Some(Due::Tick { at_ms })
    }
}
