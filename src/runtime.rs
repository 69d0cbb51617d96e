use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

pub const TICK_RATE_MS: u64 = 100;

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum WheelEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait WheelEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<WheelEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // Windows reports releases too; only presses are intents
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => WheelEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => WheelEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!(error = %err, "terminal event reader stopped");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl WheelEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
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

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<WheelEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<WheelEvent>) -> Self {
        Self { rx }
    }
}

impl WheelEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<WheelEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: WheelEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: WheelEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> WheelEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => WheelEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => {
                // input is gone but the timer still needs its cadence
                std::thread::sleep(self.ticker.interval());
                WheelEvent::Tick
            }
        }
    }
}
