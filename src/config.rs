//! Application configuration loaded from environment variables.
//!
//! Every knob has a typed default. Command-line flags override the
//! environment after loading (see `main.rs`), and the result is validated
//! once before anything else starts.

use std::path::PathBuf;

use canvas::consts::DEFAULT_GRID_SIZE;

use crate::error::ErrorCode;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

const DEFAULT_DATA_DIR: &str = "./.moodboard";
const DEFAULT_FLUSH_INTERVAL_MS: u64 = 250;
const DEFAULT_SNAP_TO_GRID: bool = true;
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size must be a positive number, got {0}")]
    InvalidGridSize(f64),
    #[error("flush interval must be at least 1 ms")]
    InvalidFlushInterval,
    #[error("upload size cap must be at least 1 byte")]
    InvalidUploadCap,
    #[error("{key} must be a boolean (true/false, 1/0, yes/no, on/off), got {value:?}")]
    InvalidFlag { key: &'static str, value: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidGridSize(_) => "E_CONFIG_GRID_SIZE",
            Self::InvalidFlushInterval => "E_CONFIG_FLUSH_INTERVAL",
            Self::InvalidUploadCap => "E_CONFIG_UPLOAD_CAP",
            Self::InvalidFlag { .. } => "E_CONFIG_FLAG",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Directory of the file-backed key-value store.
    pub data_dir: PathBuf,
    /// Debounce interval of the background persistence task.
    pub flush_interval_ms: u64,
    /// Grid snap size in canvas units.
    pub grid_size: f64,
    pub snap_to_grid: bool,
    /// Per-file upload cap.
    pub max_upload_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            grid_size: DEFAULT_GRID_SIZE,
            snap_to_grid: DEFAULT_SNAP_TO_GRID,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is out of range or a flag is not
    /// a recognizable boolean.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            data_dir: lookup("MOODBOARD_DATA_DIR")
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            flush_interval_ms: env_parse(&lookup, "MOODBOARD_FLUSH_INTERVAL_MS", DEFAULT_FLUSH_INTERVAL_MS),
            grid_size: env_parse(&lookup, "MOODBOARD_GRID_SIZE", DEFAULT_GRID_SIZE),
            snap_to_grid: env_flag(&lookup, "MOODBOARD_SNAP_TO_GRID", DEFAULT_SNAP_TO_GRID)?,
            max_upload_bytes: env_parse(&lookup, "MOODBOARD_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.grid_size > 0.0 && self.grid_size.is_finite()) {
            return Err(ConfigError::InvalidGridSize(self.grid_size));
        }
        if self.flush_interval_ms == 0 {
            return Err(ConfigError::InvalidFlushInterval);
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidUploadCap);
        }
        Ok(())
    }

    /// Grid step used for commits, or `None` while snapping is off.
    #[must_use]
    pub fn snap_grid(&self) -> Option<f64> {
        self.snap_to_grid.then_some(self.grid_size)
    }
}

/// Parse `key` from `lookup`, falling back to `default` when unset or malformed.
pub(crate) fn env_parse<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Parse a boolean flag. Unset or blank gives `default`; anything that is not
/// a recognizable boolean is an error rather than a silent default.
pub(crate) fn env_flag<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value: raw }),
    }
}
