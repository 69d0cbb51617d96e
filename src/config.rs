use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_dirs::AppDirs;
use crate::selection::ResolvePolicy;
use crate::session::SessionConfig;
use crate::timer::DEFAULT_MINUTES;
use crate::wheel::MAX_SPIN_DELAY;

pub const DEFAULT_SPIN_SECS: u64 = 5;
pub const MAX_SPIN_SECS: u64 = MAX_SPIN_DELAY.as_secs();

/// Persisted user defaults. Missing fields fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub timer_minutes: u32,
    pub spin_secs: u64,
    pub resolve_policy: ResolvePolicy,
    pub skip_challenging: bool,
    pub prompts_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer_minutes: DEFAULT_MINUTES,
            spin_secs: DEFAULT_SPIN_SECS,
            resolve_policy: ResolvePolicy::Live,
            skip_challenging: false,
            prompts_file: None,
        }
    }
}

/// Effective settings for one run: config values with command line overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub timer_minutes: u32,
    pub spin_secs: u64,
    pub resolve_policy: ResolvePolicy,
    pub skip_challenging: bool,
    pub prompts_file: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl RuntimeSettings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            timer_minutes: self.timer_minutes,
            spin_delay: Duration::from_secs(self.spin_secs.min(MAX_SPIN_SECS)),
            policy: self.resolve_policy,
            seed: self.seed,
        }
    }
}

impl From<&Config> for RuntimeSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            timer_minutes: cfg.timer_minutes,
            spin_secs: cfg.spin_secs,
            resolve_policy: cfg.resolve_policy,
            skip_challenging: cfg.skip_challenging,
            prompts_file: cfg.prompts_file.clone(),
            seed: None,
        }
    }
}

impl From<&RuntimeSettings> for Config {
    fn from(rs: &RuntimeSettings) -> Self {
        Self {
            timer_minutes: rs.timer_minutes,
            spin_secs: rs.spin_secs,
            resolve_policy: rs.resolve_policy,
            skip_challenging: rs.skip_challenging,
            prompts_file: rs.prompts_file.clone(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Config::default(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "unable to read config, using defaults");
                return Config::default();
            }
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "invalid config, using defaults");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        tracing::info!(path = %self.path.display(), "config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            timer_minutes: 12,
            spin_secs: 2,
            resolve_policy: ResolvePolicy::Snapshot,
            skip_challenging: true,
            prompts_file: Some(PathBuf::from("/tmp/prompts.txt")),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_or_invalid_config_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"{not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"timer_minutes": 8}"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.timer_minutes, 8);
        assert_eq!(cfg.spin_secs, DEFAULT_SPIN_SECS);
        assert_eq!(cfg.resolve_policy, ResolvePolicy::Live);
    }

    #[test]
    fn runtime_settings_roundtrip_through_config() {
        let cfg = Config {
            timer_minutes: 3,
            ..Config::default()
        };
        let mut rs = RuntimeSettings::from(&cfg);
        rs.seed = Some(9);

        let session = rs.session_config();
        assert_eq!(session.timer_minutes, 3);
        assert_eq!(session.spin_delay, Duration::from_secs(5));
        assert_eq!(session.seed, Some(9));

        assert_eq!(Config::from(&rs), cfg);
    }

    #[test]
    fn oversized_spin_secs_still_spins() {
        let rs = RuntimeSettings {
            spin_secs: u64::MAX,
            ..RuntimeSettings::from(&Config::default())
        };
        let session_config = rs.session_config();
        assert_eq!(session_config.spin_delay, Duration::from_secs(MAX_SPIN_SECS));

        let pool = crate::prompts::PromptPool::new(vec!["A".into()]);
        let mut session = crate::session::Session::new(pool, session_config);
        assert!(session.spin(std::time::Instant::now()));
    }
}
