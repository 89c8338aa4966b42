use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tracing::{debug, warn};

use crate::input::{self, Command, Signal};
use crate::language::WordSourceError;
use crate::scores::ScoreRecord;
use crate::session::Session;
use crate::word_generator::WordGenerator;

/// Unified event type consumed by the app runner
#[derive(Debug)]
pub enum KeyboredEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// Completion of a word fetch started with [`spawn_word_fetch`]
    Words {
        request: u64,
        result: Result<Vec<String>, WordSourceError>,
    },
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait KeyboredEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<KeyboredEvent, RecvTimeoutError>;

    /// Channel on which background work can post events back to the loop
    fn sender(&self) -> Sender<KeyboredEvent>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<KeyboredEvent>,
    tx: Sender<KeyboredEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let reader_tx = tx.clone();

        thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if reader_tx.send(KeyboredEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if reader_tx.send(KeyboredEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "terminal event reader stopped");
                    break;
                }
            }
        });

        Self { rx, tx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboredEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<KeyboredEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<KeyboredEvent> {
        self.tx.clone()
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Channel-backed event source for tests and headless driving
pub struct TestEventSource {
    rx: Receiver<KeyboredEvent>,
    tx: Sender<KeyboredEvent>,
}

impl TestEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { rx, tx }
    }
}

impl Default for TestEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboredEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<KeyboredEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn sender(&self) -> Sender<KeyboredEvent> {
        self.tx.clone()
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: KeyboredEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: KeyboredEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> KeyboredEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                KeyboredEvent::Tick
            }
        }
    }

    pub fn sender(&self) -> Sender<KeyboredEvent> {
        self.event_source.sender()
    }
}

/// Fetch words off the event loop and post the result back as
/// [`KeyboredEvent::Words`]
pub fn spawn_word_fetch(
    generator: WordGenerator,
    request: u64,
    tx: Sender<KeyboredEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let result = generator.generate();
        if tx.send(KeyboredEvent::Words { request, result }).is_err() {
            debug!(request, "event loop gone before words arrived");
        }
    })
}

/// Converts wall time into whole-second session ticks
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    started_at: Instant,
    fired: u64,
}

impl SessionClock {
    pub fn start(now: Instant) -> Self {
        Self {
            started_at: now,
            fired: 0,
        }
    }

    /// Whole seconds passed since the last call
    pub fn due_ticks(&mut self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs();
        let due = elapsed.saturating_sub(self.fired);
        self.fired = elapsed.max(self.fired);
        due
    }
}

/// A live session together with its clock.
///
/// The clock exists exactly while the session is running: it is armed by the
/// first keystroke and dropped on finish or restart. Replacing the driver
/// drops its clock with it, so a replaced session never sees another tick.
#[derive(Debug)]
pub struct SessionDriver {
    session: Session,
    clock: Option<SessionClock>,
}

impl SessionDriver {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            clock: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn clock_running(&self) -> bool {
        self.clock.is_some()
    }

    /// Apply a key command at `now`. Seconds that elapsed since the last
    /// tick are counted first, so input arriving after the deadline is
    /// rejected by the finished session.
    pub fn apply(&mut self, command: Command, now: Instant) -> Signal {
        self.drain_clock(now);
        let signal = input::apply(&mut self.session, command);
        if signal == Signal::Restart {
            self.clock = None;
        }
        self.sync_clock(now);
        signal
    }

    /// Feed elapsed whole seconds into the session
    pub fn on_tick(&mut self, now: Instant) {
        self.drain_clock(now);
        self.sync_clock(now);
    }

    pub fn restart(&mut self) {
        self.session.reset();
        self.clock = None;
    }

    pub fn take_record(&mut self) -> Option<ScoreRecord> {
        self.session.take_record()
    }

    fn drain_clock(&mut self, now: Instant) {
        if let Some(clock) = self.clock.as_mut() {
            for _ in 0..clock.due_ticks(now) {
                self.session.tick();
                if !self.session.is_running() {
                    break;
                }
            }
        }
    }

    fn sync_clock(&mut self, now: Instant) {
        match (self.clock.is_some(), self.session.is_running()) {
            (false, true) => {
                self.clock = Some(SessionClock::start(now));
                debug!("session clock started");
            }
            (true, false) => {
                self.clock = None;
                debug!("session clock stopped");
            }
            _ => {}
        }
    }
}
