//! Real-time driver for a game session
//!
//! ```text
//! SessionHandle (input/UI thread)          session thread
//!   start()/apply()/pause() ──Command──►  recv_timeout(next deadline)
//!   snapshot()              ──Command──►    handle command
//!                           ◄─Snapshot──    pump() ticks + timers
//!   events()                ◄─GameEvent─    forward drained events
//! ```
//!
//! The session lives on exactly one thread and every command goes through a
//! single channel, so commands and ticks never interleave mid-update.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, unbounded};

use crate::sim::{GameEvent, GameSession, Intent, Snapshot};

/// How long the thread sleeps when nothing is scheduled
const IDLE_WAIT: Duration = Duration::from_millis(100);

/// Messages from the input/UI side to the session thread
#[derive(Debug)]
pub enum Command {
    Start,
    Pause,
    Resume,
    EndGame,
    Intent(Intent),
    /// Reply with a fresh snapshot
    Snapshot(Sender<Snapshot>),
    Shutdown,
}

enum Flow {
    Continue,
    Exit,
}

/// Owner side of a running session thread
pub struct SessionHandle {
    commands: Sender<Command>,
    events: Receiver<GameEvent>,
    thread: Option<thread::JoinHandle<GameSession>>,
}

/// Move a session onto its own thread and start driving it in real time
pub fn spawn(session: GameSession) -> SessionHandle {
    let (command_tx, command_rx) = unbounded();
    let (event_tx, event_rx) = unbounded();

    let thread = thread::Builder::new()
        .name("session".into())
        .spawn(move || run(session, command_rx, event_tx));

    let thread = match thread {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::error!("Failed to spawn session thread: {e}");
            None
        }
    };

    SessionHandle {
        commands: command_tx,
        events: event_rx,
        thread,
    }
}

fn run(
    mut session: GameSession,
    commands: Receiver<Command>,
    events: Sender<GameEvent>,
) -> GameSession {
    log::info!("Session thread running");
    loop {
        let timeout = match session.next_deadline() {
            Some(deadline) => Duration::from_millis(deadline.saturating_sub(session.now_ms())),
            None => IDLE_WAIT,
        };

        let flow = match commands.recv_timeout(timeout) {
            Ok(command) => handle(&mut session, command),
            Err(RecvTimeoutError::Timeout) => Flow::Continue,
            Err(RecvTimeoutError::Disconnected) => Flow::Exit,
        };
        if let Flow::Exit = flow {
            break;
        }

        // Drain whatever else queued up while we were busy
        let mut exit = false;
        while let Ok(command) = commands.try_recv() {
            if let Flow::Exit = handle(&mut session, command) {
                exit = true;
                break;
            }
        }

        session.pump();
        forward(&mut session, &events);
        if exit {
            break;
        }
    }
    forward(&mut session, &events);
    log::info!("Session thread exiting");
    session
}

fn handle(session: &mut GameSession, command: Command) -> Flow {
    match command {
        Command::Start => session.start(),
        Command::Pause => session.pause(),
        Command::Resume => session.resume(),
        Command::EndGame => session.end_game(),
        Command::Intent(intent) => session.apply(intent),
        Command::Snapshot(reply) => {
            // Bring the world up to date before anyone looks at it
            session.pump();
            let _ = reply.send(session.snapshot());
        }
        Command::Shutdown => return Flow::Exit,
    }
    Flow::Continue
}

fn forward(session: &mut GameSession, events: &Sender<GameEvent>) {
    for event in session.drain_events() {
        // Nobody listening is fine
        let _ = events.send(event);
    }
}

impl SessionHandle {
    /// Queue a command. Returns false if the session thread is gone.
    pub fn send(&self, command: Command) -> bool {
        match self.commands.send(command) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("Session thread is gone, command dropped");
                false
            }
        }
    }

    pub fn start(&self) -> bool {
        self.send(Command::Start)
    }

    pub fn pause(&self) -> bool {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> bool {
        self.send(Command::Resume)
    }

    pub fn end_game(&self) -> bool {
        self.send(Command::EndGame)
    }

    pub fn apply(&self, intent: Intent) -> bool {
        self.send(Command::Intent(intent))
    }

    /// Current state, after all commands sent so far have been applied
    pub fn snapshot(&self) -> Option<Snapshot> {
        let (tx, rx) = bounded(1);
        if !self.send(Command::Snapshot(tx)) {
            return None;
        }
        rx.recv().ok()
    }

    pub fn events(&self) -> &Receiver<GameEvent> {
        &self.events
    }

    /// Stop the thread and hand the session back
    pub fn shutdown(mut self) -> Option<GameSession> {
        let _ = self.commands.send(Command::Shutdown);
        let thread = self.thread.take()?;
        match thread.join() {
            Ok(session) => Some(session),
            Err(e) => {
                log::error!("Session thread panicked: {e:?}");
                None
            }
        }
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.commands.send(Command::Shutdown);
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{MemoryLedger, ScoreLedger};
    use crate::sim::{Lane, ManualClock, SessionPhase};
    use crate::tuning::Tuning;

    fn spawn_manual() -> (SessionHandle, ManualClock) {
        let clock = ManualClock::new();
        let session = GameSession::new(Tuning::default(), 1, clock.clone(), MemoryLedger::new());
        (spawn(session), clock)
    }

    #[test]
    fn test_commands_apply_in_order() {
        let (handle, clock) = spawn_manual();
        handle.start();
        handle.apply(Intent::MoveLeft);
        handle.apply(Intent::MoveLeft);
        handle.apply(Intent::MoveRight);

        let snapshot = handle.snapshot().unwrap();
        assert_eq!(snapshot.phase, SessionPhase::Active);
        assert_eq!(snapshot.player.lane, Lane::Center);

        for _ in 0..10 {
            clock.advance(16);
            handle.snapshot();
        }
        let snapshot = handle.snapshot().unwrap();
        assert_eq!(snapshot.distance, 50.0);

        handle.pause();
        clock.advance(1000);
        let snapshot = handle.snapshot().unwrap();
        assert!(!snapshot.active);
        assert_eq!(snapshot.distance, 50.0);
    }

    #[test]
    fn test_events_are_forwarded() {
        let (handle, _clock) = spawn_manual();
        handle.start();
        handle.end_game();
        handle.snapshot();

        let events: Vec<_> = handle
            .events()
            .recv_timeout(Duration::from_secs(1))
            .into_iter()
            .chain(handle.events().recv_timeout(Duration::from_secs(1)))
            .collect();
        assert!(matches!(events[0], GameEvent::Started { .. }));
        assert!(matches!(events[1], GameEvent::GameOver { cause: None, .. }));
    }

    #[test]
    fn test_shutdown_returns_session() {
        let (handle, _clock) = spawn_manual();
        handle.start();
        handle.end_game();
        let session = handle.shutdown().unwrap();
        assert!(session.is_game_over());
        assert_eq!(session.ledger().load_all().len(), 1);
    }
}
