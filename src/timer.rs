use std::time::Duration;

pub const DEFAULT_MINUTES: u32 = 5;
pub const MIN_MINUTES: u32 = 1;
pub const MAX_MINUTES: u32 = 999;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Discussion countdown. Owns its one-second schedule: `advance` feeds it wall-clock
/// time and it fires `tick` for every whole second that passes while running.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    remaining_secs: u32,
    duration_secs: u32,
    running: bool,
    since_tick: Duration,
}

impl Countdown {
    pub fn new(minutes: u32) -> Self {
        let duration_secs = clamp_minutes(minutes) * 60;
        Self {
            remaining_secs: duration_secs,
            duration_secs,
            running: false,
            since_tick: Duration::ZERO,
        }
    }

    /// Starting an elapsed countdown does nothing.
    pub fn start(&mut self) {
        if self.running || self.remaining_secs == 0 {
            return;
        }
        self.running = true;
        self.since_tick = Duration::ZERO;
        tracing::debug!(remaining = self.remaining_secs, "timer started");
    }

    pub fn pause(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.since_tick = Duration::ZERO;
        tracing::debug!(remaining = self.remaining_secs, "timer paused");
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.since_tick = Duration::ZERO;
        self.remaining_secs = self.duration_secs;
    }

    /// Applies immediately, even to a running countdown.
    pub fn set_duration_minutes(&mut self, minutes: u32) {
        self.duration_secs = clamp_minutes(minutes) * 60;
        self.remaining_secs = self.duration_secs;
        self.since_tick = Duration::ZERO;
        tracing::debug!(
            duration = self.duration_secs,
            running = self.running,
            "timer duration changed"
        );
    }

    pub fn adjust_duration_minutes(&mut self, delta: i32) {
        let minutes = self.duration_minutes().saturating_add_signed(delta);
        self.set_duration_minutes(minutes);
    }

    /// Returns the number of ticks fired.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }

        self.since_tick += elapsed;
        let mut fired = 0;
        while self.running && self.since_tick >= TICK_INTERVAL {
            self.since_tick -= TICK_INTERVAL;
            self.tick();
            fired += 1;
        }
        fired
    }

    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            self.since_tick = Duration::ZERO;
            tracing::info!("timer finished");
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_secs / 60
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fraction of the duration still remaining, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        f64::from(self.remaining_secs) / f64::from(self.duration_secs)
    }

    pub fn format_remaining(&self) -> String {
        format_mm_ss(self.remaining_secs)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_MINUTES)
    }
}

pub fn clamp_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_MINUTES, MAX_MINUTES)
}

pub fn format_mm_ss(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
