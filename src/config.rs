use crate::app_dirs::AppDirs;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Word speed in hundredths of a play unit per motion step
pub const SPEED_SETTINGS: RangeInclusive<u32> = 1..=10;
/// Spawn frequency floor in tenths of a second
pub const MAX_FREQ_SETTINGS: RangeInclusive<u32> = 5..=10;
pub const MAX_NICKNAME_CHARS: usize = 21;
/// Motion steps simulated per second of wall time
pub const DEFAULT_STEPS_PER_SECOND: f64 = 2000.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub nickname: Option<String>,
    pub speed_setting: u32,
    pub max_freq_setting: u32,
    pub steps_per_second: f64,
    pub words_file: Option<PathBuf>,
    pub scores_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nickname: None,
            speed_setting: 3,
            max_freq_setting: 7,
            steps_per_second: DEFAULT_STEPS_PER_SECOND,
            words_file: None,
            scores_file: None,
        }
    }
}

/// Values the core runs a match with, already clamped to the allowed ranges
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    pub nickname: String,
    /// Option value the speed was derived from, `1..=10`
    pub speed_setting: u32,
    /// Option value the frequency floor was derived from, `5..=10`
    pub max_freq_setting: u32,
    /// Play units per motion step
    pub speed: f64,
    /// Spawn frequency floor in seconds
    pub max_frequency: f64,
    pub steps_per_second: f64,
}

impl GameSettings {
    pub fn new(nickname: &str, speed_setting: u32, max_freq_setting: u32) -> Self {
        let speed_setting = speed_setting.clamp(*SPEED_SETTINGS.start(), *SPEED_SETTINGS.end());
        let max_freq_setting =
            max_freq_setting.clamp(*MAX_FREQ_SETTINGS.start(), *MAX_FREQ_SETTINGS.end());
        Self {
            nickname: sanitize_nickname(nickname, &mut rand::thread_rng()),
            speed_setting,
            max_freq_setting,
            speed: f64::from(speed_setting) / 100.0,
            max_frequency: f64::from(max_freq_setting) / 10.0,
            steps_per_second: DEFAULT_STEPS_PER_SECOND,
        }
    }

    pub fn with_steps_per_second(mut self, steps: f64) -> Self {
        if steps.is_finite() && steps > 0.0 {
            self.steps_per_second = steps;
        }
        self
    }

    /// Play units a word moves in `delta_secs`
    pub fn motion(&self, delta_secs: f64) -> f64 {
        self.speed * self.steps_per_second * delta_secs
    }
}

impl From<&Config> for GameSettings {
    fn from(cfg: &Config) -> Self {
        GameSettings::new(
            cfg.nickname.as_deref().unwrap_or_default(),
            cfg.speed_setting,
            cfg.max_freq_setting,
        )
        .with_steps_per_second(cfg.steps_per_second)
    }
}

/// Strip whitespace (the score log is space separated) and cap the length.
/// An empty name becomes a random guest name.
pub fn sanitize_nickname<R: Rng + ?Sized>(raw: &str, rng: &mut R) -> String {
    let name: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .take(MAX_NICKNAME_CHARS)
        .collect();
    if name.is_empty() {
        format!("Guest{}", rng.gen_range(1000..=9999))
    } else {
        name
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
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("stantyper_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable config {}: {e}", self.path.display());
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
