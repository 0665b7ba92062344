use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::motion::kinematics::GRAVITY_CM_S2;
use crate::motion::{MotionError, ProcessingSettings};
use crate::periods;

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults — the config file is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Directories to scan for records (used when a command has no path args).
    pub motion_dirs: Vec<PathBuf>,
    /// Number of parallel workers. 0 = auto-detect (cores / 2, min 1).
    pub workers: usize,
    /// Response spectrum settings.
    pub spectrum: SpectrumConfig,
}

/// Response spectrum configuration.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Fraction of critical damping.
    pub damping: f64,
    /// Shortest oscillator period (s).
    pub period_min: f64,
    /// Longest oscillator period (s).
    pub period_max: f64,
    /// Number of log-spaced periods.
    pub period_count: usize,
    /// Acceleration-to-velocity unit conversion (cm/s² per g by default).
    pub gravity: f64,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            damping: 0.05,
            period_min: periods::DEFAULT_PERIOD_MIN,
            period_max: periods::DEFAULT_PERIOD_MAX,
            period_count: periods::DEFAULT_PERIOD_COUNT,
            gravity: GRAVITY_CM_S2,
        }
    }
}

impl SpectrumConfig {
    /// Build processing settings, optionally overriding the damping.
    pub fn settings(&self, damping: Option<f64>) -> Result<ProcessingSettings, MotionError> {
        Ok(ProcessingSettings {
            damping: damping.unwrap_or(self.damping),
            periods: periods::log_spaced(self.period_min, self.period_max, self.period_count)?,
            gravity: self.gravity,
        })
    }
}

impl AppConfig {
    /// Load config from `--config` when given, else from
    /// `~/.config/groundmotion/config.toml`. Missing or unreadable files
    /// fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        match explicit.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(path) => read_toml_or_default(&path),
            None => Self::default(),
        }
    }

    /// Resolve worker count: 0 → auto-detect (cores / 2, min 1).
    pub fn resolve_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| (n.get() / 2).max(1))
            .unwrap_or(1)
    }

    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Deserialize a TOML file, logging and returning `T::default()` when the
/// file is absent, unreadable or invalid.
fn read_toml_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return T::default();
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| toml::from_str::<T>(&text).map_err(|e| e.to_string()));

    match parsed {
        Ok(value) => {
            log::info!("Loaded config from {}", path.display());
            value
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}. Using defaults.", path.display(), e);
            T::default()
        }
    }
}
