use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::prompts::PromptPool;
use crate::selection::{available_prompts, choose_prompt, ResolvePolicy};
use crate::timer::{Countdown, DEFAULT_MINUTES};
use crate::wheel::{SpinSnapshot, Wheel, DEFAULT_SPIN_DELAY};

pub const EXHAUSTED_MESSAGE: &str =
    "All questions have been asked. Reset the wheel to start over.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionResult {
    Prompt(String),
    Exhausted,
}

impl SelectionResult {
    pub fn text(&self) -> &str {
        match self {
            SelectionResult::Prompt(p) => p,
            SelectionResult::Exhausted => EXHAUSTED_MESSAGE,
        }
    }
}

impl fmt::Display for SelectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Every user action, as consumed by [`Session::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Spin,
    ResetWheel,
    AddPrompt(String),
    RemovePrompt(usize),
    StartTimer,
    PauseTimer,
    ToggleTimer,
    ResetTimer,
    SetDurationMinutes(u32),
    AdjustDurationMinutes(i32),
    /// Wall-clock time passed since the previous tick.
    Tick(Duration),
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub timer_minutes: u32,
    pub spin_delay: Duration,
    pub policy: ResolvePolicy,
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timer_minutes: DEFAULT_MINUTES,
            spin_delay: DEFAULT_SPIN_DELAY,
            policy: ResolvePolicy::default(),
            seed: None,
        }
    }
}

/// All state of one discussion session.
#[derive(Debug)]
pub struct Session {
    pool: PromptPool,
    history: Vec<String>,
    result: Option<SelectionResult>,
    timer: Countdown,
    wheel: Wheel,
    policy: ResolvePolicy,
    rng: StdRng,
}

impl Session {
    pub fn new(pool: PromptPool, config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            pool,
            history: Vec::new(),
            result: None,
            timer: Countdown::new(config.timer_minutes),
            wheel: Wheel::new(config.spin_delay),
            policy: config.policy,
            rng,
        }
    }

    pub fn apply(&mut self, intent: Intent, now: Instant) {
        match intent {
            Intent::Spin => {
                self.spin(now);
            }
            Intent::ResetWheel => self.reset_wheel(),
            Intent::AddPrompt(text) => {
                self.add_prompt(&text);
            }
            Intent::RemovePrompt(index) => {
                self.remove_prompt(index);
            }
            Intent::StartTimer => self.timer.start(),
            Intent::PauseTimer => self.timer.pause(),
            Intent::ToggleTimer => self.timer.toggle(),
            Intent::ResetTimer => self.timer.reset(),
            Intent::SetDurationMinutes(minutes) => self.timer.set_duration_minutes(minutes),
            Intent::AdjustDurationMinutes(delta) => self.timer.adjust_duration_minutes(delta),
            Intent::Tick(elapsed) => {
                self.timer.advance(elapsed);
                self.poll(now);
            }
        }
    }

    /// Commits a spin. No-op while spinning or with an empty pool.
    pub fn spin(&mut self, now: Instant) -> bool {
        if !self.can_spin() {
            return false;
        }

        let offset = self.rng.gen_range(0..360);
        let snapshot = SpinSnapshot {
            pool: self.pool.as_slice().to_vec(),
            used: self.history.clone(),
        };
        let committed = self.wheel.commit(now, offset, snapshot);
        if committed {
            info!(
                pool = self.pool.len(),
                used = self.history.len(),
                rotation = self.wheel.rotation_degrees(),
                "spin started"
            );
        }
        committed
    }

    /// Resolves the pending spin if its delay has elapsed. Returns true when a result
    /// was produced.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(pending) = self.wheel.take_due(now) else {
            return false;
        };

        let chosen = match self.policy {
            ResolvePolicy::Live => {
                let available = available_prompts(self.pool.as_slice(), &self.history);
                choose_prompt(&available, &mut self.rng).map(str::to_string)
            }
            ResolvePolicy::Snapshot => {
                let available =
                    available_prompts(&pending.snapshot.pool, &pending.snapshot.used);
                choose_prompt(&available, &mut self.rng).map(str::to_string)
            }
        };

        match chosen {
            Some(prompt) => {
                info!(policy = %self.policy, prompt = %prompt, "spin resolved");
                if !self.history.contains(&prompt) {
                    self.history.push(prompt.clone());
                }
                self.timer.reset();
                self.result = Some(SelectionResult::Prompt(prompt));
            }
            None => {
                info!(used = self.history.len(), "spin resolved with every prompt used");
                self.result = Some(SelectionResult::Exhausted);
            }
        }
        true
    }

    /// Clears history and result and drops any spin still in flight.
    pub fn reset_wheel(&mut self) {
        if self.wheel.cancel().is_some() {
            info!("pending spin cancelled by reset");
        }
        self.history.clear();
        self.result = None;
        info!("wheel reset");
    }

    pub fn add_prompt(&mut self, text: &str) -> bool {
        let added = self.pool.add(text);
        if added {
            debug!(pool = self.pool.len(), "prompt added");
        }
        added
    }

    pub fn remove_prompt(&mut self, index: usize) -> Option<String> {
        let removed = self.pool.remove(index);
        if removed.is_some() {
            debug!(index, pool = self.pool.len(), "prompt removed");
        }
        removed
    }

    pub fn can_spin(&self) -> bool {
        !self.wheel.is_spinning() && !self.pool.is_empty()
    }

    pub fn is_spinning(&self) -> bool {
        self.wheel.is_spinning()
    }

    pub fn pool(&self) -> &PromptPool {
        &self.pool
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn result(&self) -> Option<&SelectionResult> {
        self.result.as_ref()
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    pub fn policy(&self) -> ResolvePolicy {
        self.policy
    }
}
