use std::time::{Duration, Instant};

pub const DEFAULT_SPIN_DELAY: Duration = Duration::from_secs(5);
/// Longer delays are clamped to this.
pub const MAX_SPIN_DELAY: Duration = Duration::from_secs(60);

/// Four full turns before the random offset.
pub const SPIN_BASE_DEGREES: u64 = 1440;

/// Pool and history as they were when a spin was committed.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSnapshot {
    pub pool: Vec<String>,
    pub used: Vec<String>,
}

/// A spin that has been committed but not yet resolved.
#[derive(Debug, Clone)]
pub struct PendingSpin {
    pub started_at: Instant,
    pub resolve_at: Instant,
    pub from_degrees: u64,
    pub snapshot: SpinSnapshot,
}

impl PendingSpin {
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.resolve_at
    }

    /// Linear progress through the delay in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        let total = self.resolve_at.saturating_duration_since(self.started_at);
        if total.is_zero() {
            return 1.0;
        }
        let done = now.saturating_duration_since(self.started_at);
        (done.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// The spinning wheel: visual rotation plus the single pending spin, if any.
#[derive(Debug, Clone)]
pub struct Wheel {
    rotation_degrees: u64,
    delay: Duration,
    pending: Option<PendingSpin>,
}

impl Wheel {
    pub fn new(delay: Duration) -> Self {
        Self {
            rotation_degrees: 0,
            delay: delay.min(MAX_SPIN_DELAY),
            pending: None,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.pending.is_some()
    }

    /// Rotation target of the latest spin. Accumulates across spins.
    pub fn rotation_degrees(&self) -> u64 {
        self.rotation_degrees
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn pending(&self) -> Option<&PendingSpin> {
        self.pending.as_ref()
    }

    /// Starts a spin unless one is already in flight. `offset_degrees` is reduced
    /// modulo 360.
    pub fn commit(&mut self, now: Instant, offset_degrees: u64, snapshot: SpinSnapshot) -> bool {
        if self.pending.is_some() {
            return false;
        }

        let from_degrees = self.rotation_degrees;
        self.rotation_degrees = self
            .rotation_degrees
            .saturating_add(SPIN_BASE_DEGREES + offset_degrees % 360);
        self.pending = Some(PendingSpin {
            started_at: now,
            resolve_at: now.checked_add(self.delay).unwrap_or(now),
            from_degrees,
            snapshot,
        });
        true
    }

    /// Hands back the pending spin once its delay has elapsed.
    pub fn take_due(&mut self, now: Instant) -> Option<PendingSpin> {
        if self.pending.as_ref().is_some_and(|p| p.is_due(now)) {
            self.pending.take()
        } else {
            None
        }
    }

    pub fn cancel(&mut self) -> Option<PendingSpin> {
        self.pending.take()
    }

    /// Angle to draw at `now`, eased from the previous rest position to the target.
    pub fn displayed_degrees(&self, now: Instant) -> f64 {
        match &self.pending {
            Some(p) => {
                let from = p.from_degrees as f64;
                let to = self.rotation_degrees as f64;
                from + (to - from) * ease_out_cubic(p.progress(now))
            }
            None => self.rotation_degrees as f64,
        }
    }
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new(DEFAULT_SPIN_DELAY)
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SpinSnapshot {
        SpinSnapshot {
            pool: vec!["A".into()],
            used: vec![],
        }
    }

    #[test]
    fn test_commit_sets_rotation_target() {
        let mut wheel = Wheel::default();
        let now = Instant::now();

        assert!(wheel.commit(now, 90, snapshot()));
        assert!(wheel.is_spinning());
        assert_eq!(wheel.rotation_degrees(), 1530);
    }

    #[test]
    fn test_offset_is_reduced_below_full_turn() {
        let mut wheel = Wheel::default();
        wheel.commit(Instant::now(), 725, snapshot());
        assert_eq!(wheel.rotation_degrees(), 1440 + 5);
    }

    #[test]
    fn test_second_commit_rejected_while_spinning() {
        let mut wheel = Wheel::default();
        let now = Instant::now();

        assert!(wheel.commit(now, 0, snapshot()));
        assert!(!wheel.commit(now, 10, snapshot()));
        assert_eq!(wheel.rotation_degrees(), 1440);
    }

    #[test]
    fn test_take_due_waits_for_delay() {
        let mut wheel = Wheel::new(Duration::from_secs(5));
        let now = Instant::now();
        wheel.commit(now, 0, snapshot());

        assert!(wheel.take_due(now + Duration::from_secs(4)).is_none());
        assert!(wheel.is_spinning());

        let pending = wheel.take_due(now + Duration::from_secs(5)).unwrap();
        assert_eq!(pending.snapshot, snapshot());
        assert!(!wheel.is_spinning());
    }

    #[test]
    fn test_rotation_accumulates_across_spins() {
        let mut wheel = Wheel::new(Duration::ZERO);
        let now = Instant::now();

        wheel.commit(now, 10, snapshot());
        wheel.take_due(now);
        wheel.commit(now, 20, snapshot());

        assert_eq!(wheel.rotation_degrees(), 1450 + 1460);
    }

    #[test]
    fn test_cancel() {
        let mut wheel = Wheel::default();
        wheel.commit(Instant::now(), 0, snapshot());

        assert!(wheel.cancel().is_some());
        assert!(!wheel.is_spinning());
        assert!(wheel.cancel().is_none());
    }

    #[test]
    fn test_displayed_degrees_eases_to_target() {
        let mut wheel = Wheel::new(Duration::from_secs(4));
        let now = Instant::now();
        wheel.commit(now, 0, snapshot());

        assert_eq!(wheel.displayed_degrees(now), 0.0);
        let midway = wheel.displayed_degrees(now + Duration::from_secs(2));
        assert!(midway > 720.0 && midway < 1440.0);
        assert_eq!(wheel.displayed_degrees(now + Duration::from_secs(4)), 1440.0);
    }

    #[test]
    fn test_huge_delay_is_clamped() {
        let mut wheel = Wheel::new(Duration::from_secs(u64::MAX));
        assert_eq!(wheel.delay(), MAX_SPIN_DELAY);

        let now = Instant::now();
        assert!(wheel.commit(now, 0, snapshot()));
        assert!(wheel.take_due(now + MAX_SPIN_DELAY - Duration::from_secs(1)).is_none());
        assert!(wheel.take_due(now + MAX_SPIN_DELAY).is_some());
    }

    #[test]
    fn test_ease_out_cubic_bounds() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
    }
}
