use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Stdout},
    path::PathBuf,
    time::Instant,
};
use topicwheel::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, RuntimeSettings, MAX_SPIN_SECS},
    logging,
    prompts::{PromptFileError, PromptPool, PromptSet, DEFAULT_PROMPT_SET},
    runtime::{CrosstermEventSource, FixedTicker, Runner, WheelEvent},
    selection::ResolvePolicy,
    session::Session,
    timer::{MAX_MINUTES, MIN_MINUTES},
};

/// spin-the-wheel discussion starter with prompt tracking and a countdown timer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Spin a wheel to pick a random, not-yet-asked discussion question from a configurable pool, keep track of what has been asked, and time each discussion with a countdown."
)]
pub struct Cli {
    /// discussion timer length in minutes
    #[clap(short = 'm', long, value_parser = clap::value_parser!(u32).range(MIN_MINUTES as i64..=MAX_MINUTES as i64))]
    minutes: Option<u32>,

    /// load prompts from a file: a JSON array of strings, or one prompt per line
    #[clap(short = 'p', long)]
    prompts: Option<PathBuf>,

    /// leave out the challenging (🚨) prompts
    #[clap(long)]
    skip_challenging: bool,

    /// how long the wheel spins before landing, in seconds
    #[clap(long, value_parser = clap::value_parser!(u64).range(0..=MAX_SPIN_SECS))]
    spin_secs: Option<u64>,

    /// whether a spin lands on the pool as it is when the wheel stops (live) or as it was when the spin started (snapshot)
    #[clap(long, value_enum)]
    policy: Option<ResolvePolicy>,

    /// seed for the random number generator, for reproducible sessions
    #[clap(long)]
    seed: Option<u64>,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags layered over the stored config
    fn settings(&self, cfg: &Config) -> RuntimeSettings {
        let mut settings = RuntimeSettings::from(cfg);
        if let Some(minutes) = self.minutes {
            settings.timer_minutes = minutes;
        }
        if let Some(path) = &self.prompts {
            settings.prompts_file = Some(path.clone());
        }
        if let Some(secs) = self.spin_secs {
            settings.spin_secs = secs;
        }
        if let Some(policy) = self.policy {
            settings.resolve_policy = policy;
        }
        settings.skip_challenging |= self.skip_challenging;
        settings.seed = self.seed;
        settings
    }
}

fn load_pool(settings: &RuntimeSettings) -> Result<PromptPool, PromptFileError> {
    let set = match &settings.prompts_file {
        Some(path) => PromptSet::from_file(path)?,
        None => PromptSet::builtin(DEFAULT_PROMPT_SET)?,
    };
    tracing::info!(set = %set.name, prompts = set.prompts.len(), "prompt set loaded");

    let pool = PromptPool::from(set);
    Ok(if settings.skip_challenging {
        pool.without_challenging()
    } else {
        pool
    })
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Prompts(#[from] PromptFileError),
    #[error("could not save config: {0}")]
    SaveConfig(#[from] io::Error),
}

/// Loads the pool and, when `save` is set, stores the settings. Nothing is stored
/// unless the pool loads.
fn prepare_pool<S: ConfigStore>(
    settings: &RuntimeSettings,
    store: &S,
    save: bool,
) -> Result<PromptPool, StartupError> {
    let pool = load_pool(settings)?;
    if save {
        store.save(&Config::from(settings))?;
    }
    Ok(pool)
}

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    undo_on_error(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        },
        || {
            let mut stdout = io::stdout();
            let _ = execute!(stdout, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )
}

fn undo_on_error<T, E>(setup: impl FnOnce() -> Result<T, E>, undo: impl FnOnce()) -> Result<T, E> {
    setup().map_err(|err| {
        undo();
        err
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // logging is best effort; the wheel works without it
    if let Some(log_path) = AppDirs::log_path() {
        let _ = logging::init(&log_path);
    }

    let store = FileConfigStore::new();
    let settings = cli.settings(&store.load());

    let pool = match prepare_pool(&settings, &store, cli.save_config) {
        Ok(pool) => pool,
        Err(err) => {
            let kind = match err {
                StartupError::Prompts(_) => ErrorKind::InvalidValue,
                StartupError::SaveConfig(_) => ErrorKind::Io,
            };
            let mut cmd = Cli::command();
            cmd.error(kind, err).exit();
        }
    };
    tracing::info!(?settings, pool = pool.len(), "starting session");

    let session = Session::new(pool, settings.session_config());

    let mut terminal = setup_terminal()?;

    let mut app = App::new(session, Instant::now());
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!(asked = app.session.history().len(), "session ended");
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    while !app.should_quit {
        let event = runner.step();
        app.advance(Instant::now());

        match event {
            WheelEvent::Key(key) => {
                let now = app.now();
                app.on_key(key, now);
            }
            WheelEvent::Resize | WheelEvent::Tick => {}
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
