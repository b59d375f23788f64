//! Game session orchestrator
//!
//! Owns the player, the obstacle field and the world counters, exposes the
//! command surface, and turns scheduler output into ticks and delayed state
//! changes. Every delayed change is tagged with the session epoch, which is
//! bumped on `start()` and on game over, so a timer from an old run can never
//! touch a new one.

use super::obstacles::ObstacleField;
use super::scheduler::{Clock, Due, Scheduler, TimerId, TimerTask};
use super::state::{
    GameEvent, Intent, Obstacle, ObstacleKind, PlayerState, PlayerView, SessionPhase, Snapshot,
};
use crate::ledger::{ScoreLedger, ScoreRecord};
use crate::tuning::Tuning;

/// One player's game, from `start()` to game over and back
pub struct GameSession {
    pub(crate) tuning: Tuning,
    /// Base seed; run `n` uses `seed + n`
    pub(crate) seed: u64,
    pub(crate) runs: u64,
    /// Invalidates delayed tasks from earlier runs
    pub(crate) epoch: u64,
    pub(crate) phase: SessionPhase,

    pub(crate) score: u64,
    /// Crystal points on top of the distance score
    pub(crate) bonus: u64,
    pub(crate) distance: f64,
    pub(crate) speed: f64,
    pub(crate) level: u32,
    pub(crate) completed_level: u32,
    pub(crate) ticks: u64,

    pub(crate) player: PlayerState,
    pub(crate) field: ObstacleField,

    pub(crate) scheduler: Scheduler,
    pub(crate) level_timer: Option<TimerId>,
    /// Time of whatever is being processed right now
    pub(crate) now_ms: u64,

    pub(crate) events: Vec<GameEvent>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) ledger: Box<dyn ScoreLedger>,
}

impl GameSession {
    /// Build an idle session. Tuning that fails [`Tuning::validate`] is
    /// replaced by the defaults.
    pub fn new(
        tuning: Tuning,
        seed: u64,
        clock: impl Clock + 'static,
        ledger: impl ScoreLedger + 'static,
    ) -> Self {
        let tuning = tuning.validated_or_default();
        let scheduler = Scheduler::new(tuning.tick_interval_ms, tuning.max_catchup_ticks);
        let field = ObstacleField::new(&tuning, seed);
        let now_ms = clock.now_ms();
        Self {
            speed: tuning.base_speed,
            tuning,
            seed,
            runs: 0,
            epoch: 0,
            phase: SessionPhase::Idle,
            score: 0,
            bonus: 0,
            distance: 0.0,
            level: 1,
            completed_level: 0,
            ticks: 0,
            player: PlayerState::default(),
            field,
            scheduler,
            level_timer: None,
            now_ms,
            events: Vec::new(),
            clock: Box::new(clock),
            ledger: Box::new(ledger),
        }
    }

    // === Commands ===

    /// Reset everything and begin a new run
    pub fn start(&mut self) {
        self.epoch += 1;
        self.scheduler.stop();
        self.scheduler.cancel_all();
        self.level_timer = None;

        let run_seed = self.seed.wrapping_add(self.runs);
        self.runs += 1;

        self.score = 0;
        self.bonus = 0;
        self.distance = 0.0;
        self.level = 1;
        self.completed_level = 0;
        self.speed = self.tuning.speed_for_level(1);
        self.ticks = 0;
        self.player = PlayerState::default();
        self.field.reseed(
            run_seed,
            self.tuning.initial_offset,
            self.tuning.initial_batch,
        );

        self.phase = SessionPhase::Active;
        self.now_ms = self.clock.now_ms();
        self.scheduler.start(self.now_ms);
        log::info!("Run {} started (seed {})", self.runs, run_seed);
        self.emit(GameEvent::Started { seed: run_seed });
    }

    /// Stop ticking without losing any state
    pub fn pause(&mut self) {
        if self.phase != SessionPhase::Active {
            log::debug!("pause ignored in {:?}", self.phase);
            return;
        }
        self.phase = SessionPhase::Paused;
        self.scheduler.pause();
        log::info!("Paused at distance {}", self.distance);
        self.emit(GameEvent::Paused);
    }

    /// Continue after `pause()`, or cut a level-complete banner short
    pub fn resume(&mut self) {
        match self.phase {
            SessionPhase::Paused => {
                self.phase = SessionPhase::Active;
                self.now_ms = self.clock.now_ms();
                self.scheduler.resume(self.now_ms);
                log::info!("Resumed");
                self.emit(GameEvent::Resumed);
            }
            SessionPhase::LevelTransition => {
                if let Some(id) = self.level_timer.take() {
                    self.scheduler.cancel(id);
                }
                self.now_ms = self.clock.now_ms();
                self.finish_level_transition();
            }
            phase => log::debug!("resume ignored in {phase:?}"),
        }
    }

    pub fn move_left(&mut self) {
        self.shift(-1);
    }

    pub fn move_right(&mut self) {
        self.shift(1);
    }

    fn shift(&mut self, delta: i32) {
        if !self.is_active() {
            return;
        }
        self.player.shift(delta);
    }

    pub fn jump(&mut self) {
        if !self.is_active() || !self.player.begin_jump() {
            return;
        }
        let now = self.clock.now_ms();
        self.scheduler
            .schedule_once(now, self.tuning.jump_apex_ms, self.epoch, TimerTask::JumpApex);
        self.scheduler
            .schedule_once(now, self.tuning.jump_ms, self.epoch, TimerTask::JumpLand);
    }

    pub fn slide(&mut self) {
        if !self.is_active() || !self.player.begin_slide() {
            return;
        }
        let now = self.clock.now_ms();
        self.scheduler
            .schedule_once(now, self.tuning.slide_ms, self.epoch, TimerTask::SlideEnd);
    }

    /// Dispatch a player intent
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::MoveLeft => self.move_left(),
            Intent::MoveRight => self.move_right(),
            Intent::Jump => self.jump(),
            Intent::Slide => self.slide(),
        }
    }

    /// Finish the run and record it. Repeated calls do nothing.
    pub fn end_game(&mut self) {
        self.finish_run(None);
    }

    // === Driving ===

    /// Process every tick and timer that has come due on the clock.
    /// Returns the number of ticks run.
    pub fn pump(&mut self) -> u32 {
        let now = self.clock.now_ms();
        let mut ticks = 0;
        while let Some(due) = self.scheduler.pop_due(now) {
            match due {
                Due::Tick { at_ms } => {
                    self.now_ms = at_ms;
                    self.update();
                    ticks += 1;
                }
                Due::Timer { task, epoch, at_ms } => {
                    self.now_ms = at_ms;
                    self.fire_timer(task, epoch);
                }
            }
        }
        self.now_ms = now;
        ticks
    }

    /// Current clock reading
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// When the next tick or timer is due, in clock milliseconds
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    fn fire_timer(&mut self, task: TimerTask, epoch: u64) {
        if epoch != self.epoch {
            log::debug!("Discarding stale {task:?} from epoch {epoch}");
            return;
        }
        match task {
            TimerTask::JumpApex => self.player.reach_apex(),
            TimerTask::JumpLand => self.player.land(),
            TimerTask::SlideEnd => self.player.stand_up(),
            TimerTask::LevelResume => {
                self.level_timer = None;
                self.finish_level_transition();
            }
        }
    }

    // === Transitions used by the tick ===

    /// Recompute score from distance and bonus, then the level from score
    pub(crate) fn refresh_score(&mut self) {
        self.score = (self.distance / self.tuning.distance_per_point).floor() as u64 + self.bonus;
        let level = self.tuning.level_for_score(self.score);
        if level > self.level {
            self.level = level;
            self.speed = self.tuning.speed_for_level(level);
            self.begin_level_transition(level);
        }
    }

    fn begin_level_transition(&mut self, next_level: u32) {
        if self.phase == SessionPhase::LevelTransition {
            return;
        }
        self.phase = SessionPhase::LevelTransition;
        self.completed_level = next_level - 1;
        self.scheduler.stop();
        self.level_timer = Some(self.scheduler.schedule_once(
            self.now_ms,
            self.tuning.level_pause_ms,
            self.epoch,
            TimerTask::LevelResume,
        ));
        log::info!("Level {} complete", self.completed_level);
        self.emit(GameEvent::LevelComplete {
            completed_level: self.completed_level,
            next_level,
        });
    }

    fn finish_level_transition(&mut self) {
        if self.phase != SessionPhase::LevelTransition {
            return;
        }
        self.phase = SessionPhase::Active;
        self.scheduler.start(self.now_ms);
        log::info!("Level {} underway", self.level);
        self.emit(GameEvent::LevelResumed { level: self.level });
    }

    pub(crate) fn finish_run(&mut self, cause: Option<ObstacleKind>) {
        if matches!(self.phase, SessionPhase::Idle | SessionPhase::GameOver) {
            return;
        }
        self.phase = SessionPhase::GameOver;
        self.epoch += 1;
        self.scheduler.stop();
        self.scheduler.cancel_all();
        self.level_timer = None;

        let record = ScoreRecord {
            score: self.score,
            level: self.level,
            timestamp: self.clock.timestamp_ms(),
        };
        if let Err(e) = self.ledger.append(record) {
            log::warn!("Score {} not recorded: {e}", record.score);
        }

        match cause {
            Some(kind) => log::info!(
                "Game over: hit a {} at score {} (level {})",
                kind.as_str(),
                self.score,
                self.level
            ),
            None => log::info!("Game ended at score {} (level {})", self.score, self.level),
        }
        self.emit(GameEvent::GameOver {
            score: self.score,
            level: self.level,
            cause,
        });
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    // === Observation ===

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            distance: self.distance,
            level: self.level,
            active: self.is_active(),
            game_over: self.is_game_over(),
            level_complete_showing: self.level_complete_showing(),
            completed_level: self.completed_level,
            player: PlayerView::from(&self.player),
            obstacles: self.field.obstacles().to_vec(),
        }
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn level_complete_showing(&self) -> bool {
        self.phase == SessionPhase::LevelTransition
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn completed_level(&self) -> u32 {
        self.completed_level
    }

    /// Ticks run since the last `start()`
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.field.obstacles()
    }

    /// Direct access for tools and scripted scenarios
    pub fn field_mut(&mut self) -> &mut ObstacleField {
        &mut self.field
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn ledger(&self) -> &dyn ScoreLedger {
        self.ledger.as_ref()
    }

    pub fn ledger_mut(&mut self) -> &mut dyn ScoreLedger {
        self.ledger.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerError, MemoryLedger};
    use crate::sim::scheduler::ManualClock;
    use crate::sim::state::{JumpPhase, Lane, Stance};

    /// Ledger whose storage is gone
    struct BrokenLedger;

    impl ScoreLedger for BrokenLedger {
        fn append(&mut self, _record: ScoreRecord) -> Result<(), LedgerError> {
            Err(LedgerError::Io(std::io::Error::other("disk full")))
        }

        fn load_all(&self) -> Vec<ScoreRecord> {
            Vec::new()
        }

        fn clear_all(&mut self) -> Result<(), LedgerError> {
            Ok(())
        }
    }

    fn session() -> (GameSession, ManualClock) {
        let clock = ManualClock::with_timestamp(1_700_000_000_000);
        let session = GameSession::new(Tuning::default(), 42, clock.clone(), MemoryLedger::new());
        (session, clock)
    }

    /// Advance one tick interval
    fn step(session: &mut GameSession, clock: &ManualClock) {
        clock.advance(16);
        session.pump();
    }

    fn wait(session: &mut GameSession, clock: &ManualClock, ms: u64) {
        clock.advance(ms);
        session.pump();
    }

    #[test]
    fn test_start_resets_world() {
        let (mut session, clock) = session();
        assert_eq!(session.phase(), SessionPhase::Idle);
        session.start();

        assert!(session.is_active());
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.player().lane, Lane::Center);
        assert_eq!(session.obstacles().len(), 10);
        assert_eq!(session.obstacles()[0].distance, 800.0);
        assert!(session.scheduler().is_running());

        step(&mut session, &clock);
        assert_eq!(session.ticks(), 1);
        assert_eq!(session.distance(), 5.0);
    }

    #[test]
    fn test_commands_ignored_before_start() {
        let (mut session, clock) = session();
        session.move_left();
        session.jump();
        session.resume();
        session.end_game();
        wait(&mut session, &clock, 1000);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.player().lane, Lane::Center);
        assert!(!session.player().is_jumping());
        assert!(session.ledger().load_all().is_empty());
    }

    #[test]
    fn test_lane_clamping() {
        let (mut session, _clock) = session();
        session.start();
        session.move_left();
        session.move_left();
        session.move_left();
        assert_eq!(session.player().lane, Lane::Left);
        for _ in 0..5 {
            session.move_right();
        }
        assert_eq!(session.player().lane, Lane::Right);
    }

    #[test]
    fn test_jump_two_stages_then_lands() {
        let (mut session, clock) = session();
        session.start();
        session.jump();
        assert_eq!(session.player().stance, Stance::Jumping(JumpPhase::Rising));

        // Slide and second jump are no-ops mid-air
        session.slide();
        session.jump();
        assert_eq!(session.scheduler().pending_timers(), 2);

        wait(&mut session, &clock, 300);
        assert_eq!(session.player().stance, Stance::Jumping(JumpPhase::Falling));
        wait(&mut session, &clock, 599);
        assert!(session.player().is_jumping());
        wait(&mut session, &clock, 1);
        assert_eq!(session.player().stance, Stance::Running);
        assert!(session.is_active());
    }

    #[test]
    fn test_slide_clears_itself() {
        let (mut session, clock) = session();
        session.start();
        session.slide();
        session.jump();
        assert!(session.player().is_sliding());
        wait(&mut session, &clock, 999);
        assert!(session.player().is_sliding());
        wait(&mut session, &clock, 1);
        assert!(!session.player().is_sliding());
        // Free to jump again
        session.jump();
        assert!(session.player().is_jumping());
    }

    #[test]
    fn test_actions_need_active_session() {
        let (mut session, _clock) = session();
        session.start();
        session.pause();
        session.jump();
        session.move_right();
        assert!(!session.player().is_jumping());
        assert_eq!(session.player().lane, Lane::Center);
    }

    #[test]
    fn test_pause_and_resume_keep_state() {
        let (mut session, clock) = session();
        session.start();
        for _ in 0..10 {
            step(&mut session, &clock);
        }
        session.pause();
        let frozen = session.snapshot();
        assert!(!frozen.active);

        wait(&mut session, &clock, 5000);
        assert_eq!(session.snapshot(), frozen);

        session.resume();
        assert!(session.is_active());
        step(&mut session, &clock);
        assert_eq!(session.distance(), 55.0);
    }

    #[test]
    fn test_rock_ends_game_once_inside_band() {
        let (mut session, clock) = session();
        session.start();
        session.field_mut().clear();
        let rock = session.field_mut().place(Lane::Center, ObstacleKind::Rock, 200.0);

        let mut ended_at = None;
        for tick in 1..=32 {
            step(&mut session, &clock);
            if session.is_game_over() && ended_at.is_none() {
                ended_at = Some(tick);
            }
        }

        // 200 - 11 * 5 = 145 is the first distance inside (50, 150)
        assert_eq!(ended_at, Some(11));
        assert_eq!(session.field.get(rock).map(|o| o.distance), Some(145.0));
        assert_eq!(session.ledger().load_all().len(), 1);
        assert!(!session.scheduler().is_running());

        let game_overs = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_jumping_clears_rock() {
        let (mut session, clock) = session();
        session.start();
        session.field_mut().clear();
        session.field_mut().place(Lane::Center, ObstacleKind::Rock, 200.0);
        session.jump();
        // 54 ticks = 864 ms, still airborne, rock is behind the band by then
        for _ in 0..54 {
            step(&mut session, &clock);
        }
        assert!(session.is_active());
    }

    #[test]
    fn test_crystal_pickup() {
        let (mut session, clock) = session();
        session.start();
        session.field_mut().clear();
        let crystal = session.field_mut().place(Lane::Center, ObstacleKind::Crystal, 200.0);

        for _ in 0..10 {
            step(&mut session, &clock);
        }
        assert_eq!(session.score(), 5);
        step(&mut session, &clock);

        assert!(session.is_active());
        // Distance score for 11 ticks is 5, plus the bonus
        assert_eq!(session.score(), 5 + 100);
        assert!(session.field.get(crystal).is_none());

        // Bonus survives later ticks
        step(&mut session, &clock);
        assert_eq!(session.score(), 6 + 100);
    }

    #[test]
    fn test_level_complete_round_trip() {
        let (mut session, clock) = session();
        session.start();
        session.field_mut().clear();
        let far = session.field_mut().place(Lane::Left, ObstacleKind::Rock, 1500.0);
        session.distance = 9995.0;

        step(&mut session, &clock);
        assert_eq!(session.score(), 1000);
        assert_eq!(session.level(), 2);
        assert!(session.level_complete_showing());
        assert!(!session.is_active());
        assert_eq!(session.completed_level(), 1);
        assert!(!session.scheduler().is_running());

        let before = session.snapshot();
        wait(&mut session, &clock, 2999);
        assert!(session.level_complete_showing());
        assert_eq!(session.snapshot(), before);

        wait(&mut session, &clock, 1);
        assert!(!session.level_complete_showing());
        assert!(session.is_active());
        assert_eq!(session.score(), 1000);
        assert_eq!(session.field.get(far).map(|o| o.distance), Some(1495.0));

        step(&mut session, &clock);
        assert_eq!(session.distance(), 10_005.0);
        assert_eq!(session.level(), 2);
    }

    #[test]
    fn test_level_caps_at_ten() {
        let (mut session, clock) = session();
        session.start();
        session.field_mut().clear();
        session.distance = 99_995.0;
        session.level = 10;
        step(&mut session, &clock);
        assert_eq!(session.score(), 10_000);
        assert_eq!(session.level(), 10);
        assert!(session.is_active());
    }

    #[test]
    fn test_resume_skips_level_banner() {
        let (mut session, clock) = session();
        session.start();
        session.field_mut().clear();
        session.distance = 9995.0;
        step(&mut session, &clock);
        assert!(session.level_complete_showing());

        session.resume();
        assert!(session.is_active());
        assert!(!session.scheduler().has_pending(TimerTask::LevelResume));
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::LevelResumed { level: 2 }));
    }

    #[test]
    fn test_end_game_is_idempotent() {
        let (mut session, clock) = session();
        session.start();
        step(&mut session, &clock);
        session.end_game();
        session.end_game();

        assert!(session.is_game_over());
        assert!(!session.is_active());
        let records = session.ledger().load_all();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, 1_700_000_000_016);
        assert!(!session.scheduler().is_running());
    }

    #[test]
    fn test_end_game_cancels_level_timer() {
        let (mut session, clock) = session();
        session.start();
        session.field_mut().clear();
        session.distance = 9995.0;
        step(&mut session, &clock);
        assert!(session.level_complete_showing());

        session.end_game();
        wait(&mut session, &clock, 5000);
        assert!(session.is_game_over());
        assert!(!session.is_active());
        assert!(!session.level_complete_showing());
    }

    #[test]
    fn test_restart_invalidates_pending_timers() {
        let (mut session, clock) = session();
        session.start();
        session.jump();
        wait(&mut session, &clock, 100);

        session.start();
        assert_eq!(session.player().stance, Stance::Running);
        wait(&mut session, &clock, 100);
        session.jump();

        // The first run's landing would have been at 900 ms
        wait(&mut session, &clock, 750);
        assert!(session.player().is_jumping());
        wait(&mut session, &clock, 150);
        assert!(!session.player().is_jumping());
    }

    #[test]
    fn test_stale_epoch_is_discarded() {
        let (mut session, _clock) = session();
        session.start();
        session.phase = SessionPhase::LevelTransition;
        let stale = session.epoch - 1;
        session.fire_timer(TimerTask::LevelResume, stale);
        assert_eq!(session.phase(), SessionPhase::LevelTransition);
        let current = session.epoch;
        session.fire_timer(TimerTask::LevelResume, current);
        assert!(session.is_active());
    }

    #[test]
    fn test_restart_after_game_over() {
        let (mut session, clock) = session();
        session.start();
        session.end_game();
        session.start();
        assert!(session.is_active());
        assert_eq!(session.score(), 0);
        step(&mut session, &clock);
        assert_eq!(session.ticks(), 1);
        let events = session.drain_events();
        assert!(matches!(events.first(), Some(GameEvent::Started { seed: 42 })));
        assert!(matches!(events.last(), Some(GameEvent::Started { seed: 43 })));
    }

    #[test]
    fn test_same_seed_same_run() {
        let (mut a, clock_a) = session();
        let (mut b, clock_b) = session();
        a.start();
        b.start();
        for i in 0..500 {
            if i % 37 == 0 {
                a.move_left();
                b.move_left();
            }
            step(&mut a, &clock_a);
            step(&mut b, &clock_b);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_band_skipping_speed_falls_back_to_defaults() {
        let clock = ManualClock::new();
        let tuning = Tuning {
            base_speed: 120.0,
            ..Default::default()
        };
        let mut session = GameSession::new(tuning, 42, clock.clone(), MemoryLedger::new());
        assert_eq!(session.tuning(), &Tuning::default());

        session.start();
        session.field_mut().clear();
        session.field_mut().place(Lane::Center, ObstacleKind::Rock, 160.0);
        for _ in 0..5 {
            step(&mut session, &clock);
        }
        // 160 - 3 * 5 = 145 lands inside the band
        assert!(session.is_game_over());
    }

    #[test]
    fn test_zero_points_per_level_falls_back_to_defaults() {
        let clock = ManualClock::new();
        let tuning = Tuning {
            points_per_level: 0,
            ..Default::default()
        };
        let mut session = GameSession::new(tuning, 42, clock.clone(), MemoryLedger::new());
        assert_eq!(session.tuning().points_per_level, 1000);

        session.start();
        for _ in 0..5 {
            step(&mut session, &clock);
        }
        assert!(session.is_active());
        assert_eq!(session.level(), 1);
    }

    #[test]
    fn test_failed_ledger_write_still_ends_game() {
        let clock = ManualClock::new();
        let mut session = GameSession::new(Tuning::default(), 42, clock.clone(), BrokenLedger);
        session.start();
        for _ in 0..20 {
            step(&mut session, &clock);
        }
        session.end_game();

        assert!(session.is_game_over());
        assert_eq!(session.score(), 10);
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::GameOver {
            score: 10,
            level: 1,
            cause: None,
        }));
    }

    #[test]
    fn test_failed_ledger_write_on_collision() {
        let clock = ManualClock::new();
        let mut session = GameSession::new(Tuning::default(), 42, clock.clone(), BrokenLedger);
        session.start();
        session.field_mut().clear();
        session.field_mut().place(Lane::Center, ObstacleKind::Rock, 200.0);
        for _ in 0..11 {
            step(&mut session, &clock);
        }

        assert!(session.is_game_over());
        assert_eq!(session.score(), 5);
        assert!(!session.scheduler().is_running());
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::GameOver {
            score: 5,
            level: 1,
            cause: Some(ObstacleKind::Rock),
        }));
    }
}
