use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TOPICWHEEL_LOG";

/// Install the global subscriber, appending to `log_path`. The terminal belongs to the
/// UI, so nothing is ever written to stdout or stderr.
pub fn init(log_path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init()
}

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}
