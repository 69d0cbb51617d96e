use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::{Intent, Session};
use crate::timer::MAX_MINUTES;

/// Where typed keys go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    AddPrompt,
    Minutes,
}

/// Presentation-only state: which panels are open, list cursor, text being typed.
#[derive(Debug, Default)]
pub struct ViewState {
    pub show_pool: bool,
    pub show_history: bool,
    pub show_help: bool,
    pub pool_cursor: usize,
    pub input: String,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub view: ViewState,
    pub mode: InputMode,
    pub should_quit: bool,
    last_advance: Instant,
}

impl App {
    pub fn new(session: Session, now: Instant) -> Self {
        Self {
            session,
            view: ViewState::default(),
            mode: InputMode::Normal,
            should_quit: false,
            last_advance: now,
        }
    }

    /// Instant of the latest advance; rendering animates against this.
    pub fn now(&self) -> Instant {
        self.last_advance
    }

    /// Feeds the time elapsed since the last call into the session.
    pub fn advance(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_advance);
        self.last_advance = now;
        self.session.apply(Intent::Tick(elapsed), now);
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let intent = match self.mode {
            InputMode::Normal => self.normal_key(key),
            InputMode::AddPrompt => self.add_prompt_key(key),
            InputMode::Minutes => self.minutes_key(key),
        };

        if let Some(intent) = intent {
            let removed = matches!(intent, Intent::RemovePrompt(_));
            self.session.apply(intent, now);
            if removed {
                self.clamp_pool_cursor();
            }
        }
    }

    fn normal_key(&mut self, key: KeyEvent) -> Option<Intent> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => Some(Intent::Spin),
            KeyCode::Char('r') => Some(Intent::ResetWheel),
            KeyCode::Char('a') => {
                self.enter_mode(InputMode::AddPrompt);
                None
            }
            KeyCode::Char('m') => {
                self.enter_mode(InputMode::Minutes);
                None
            }
            KeyCode::Char('l') => {
                self.view.show_pool = !self.view.show_pool;
                None
            }
            KeyCode::Char('h') => {
                self.view.show_history = !self.view.show_history;
                None
            }
            KeyCode::Char('?') => {
                self.view.show_help = !self.view.show_help;
                None
            }
            KeyCode::Up if self.view.show_pool => {
                self.view.pool_cursor = self.view.pool_cursor.saturating_sub(1);
                None
            }
            KeyCode::Down if self.view.show_pool => {
                if self.view.pool_cursor + 1 < self.session.pool().len() {
                    self.view.pool_cursor += 1;
                }
                None
            }
            KeyCode::Char('d') | KeyCode::Delete if self.view.show_pool => {
                Some(Intent::RemovePrompt(self.view.pool_cursor))
            }
            KeyCode::Char('t') => Some(Intent::ToggleTimer),
            KeyCode::Char('0') => Some(Intent::ResetTimer),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Intent::AdjustDurationMinutes(1)),
            KeyCode::Char('-') => Some(Intent::AdjustDurationMinutes(-1)),
            _ => None,
        }
    }

    fn add_prompt_key(&mut self, key: KeyEvent) -> Option<Intent> {
        match key.code {
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.view.input);
                self.mode = InputMode::Normal;
                Some(Intent::AddPrompt(text))
            }
            KeyCode::Esc => {
                self.leave_input();
                None
            }
            KeyCode::Backspace => {
                self.view.input.pop();
                None
            }
            KeyCode::Char(c) => {
                self.view.input.push(c);
                None
            }
            _ => None,
        }
    }

    fn minutes_key(&mut self, key: KeyEvent) -> Option<Intent> {
        match key.code {
            KeyCode::Enter => {
                let typed = std::mem::take(&mut self.view.input);
                self.mode = InputMode::Normal;
                // empty or zero input is clamped to the minimum
                typed
                    .parse::<u32>()
                    .ok()
                    .map(|minutes| Intent::SetDurationMinutes(minutes.min(MAX_MINUTES)))
            }
            KeyCode::Esc => {
                self.leave_input();
                None
            }
            KeyCode::Backspace => {
                self.view.input.pop();
                None
            }
            KeyCode::Char(c) if c.is_ascii_digit() && self.view.input.len() < 3 => {
                self.view.input.push(c);
                None
            }
            _ => None,
        }
    }

    fn enter_mode(&mut self, mode: InputMode) {
        self.view.input.clear();
        self.mode = mode;
    }

    fn leave_input(&mut self) {
        self.view.input.clear();
        self.mode = InputMode::Normal;
    }

    fn clamp_pool_cursor(&mut self) {
        let len = self.session.pool().len();
        if self.view.pool_cursor >= len {
            self.view.pool_cursor = len.saturating_sub(1);
        }
    }
}
