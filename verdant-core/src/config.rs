//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/verdant/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/verdant/` (~/.config/verdant/)
//! - State/Logs: `$XDG_STATE_HOME/verdant/` (~/.local/state/verdant/)
//!
//! Nothing the user does in the app is written back; the collection and task
//! list live in memory for the lifetime of the process.

use crate::error::{Error, Result};
use crate::media::PermissionStatus;
use crate::types::ScanMode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scan screen behavior
    #[serde(default)]
    pub scan: ScanConfig,

    /// Analysis backend settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Camera and photo library settings
    #[serde(default)]
    pub media: MediaConfig,

    /// Light and soil meter settings
    #[serde(default)]
    pub meters: MeterConfig,

    /// Profile settings
    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Scan screen configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ScanConfig {
    /// Mode used when the scan screen is opened without one
    #[serde(default)]
    pub default_mode: ScanMode,

    /// Start analysis as soon as an image is captured or picked
    #[serde(default = "default_true")]
    pub auto_analyze: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_mode: ScanMode::default(),
            auto_analyze: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Analysis backend configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    /// Simulated latency of the mock backend in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Give up on an analysis after this many seconds (0 disables)
    #[serde(default = "default_watchdog_secs")]
    pub watchdog_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            watchdog_secs: default_watchdog_secs(),
        }
    }
}

impl AnalysisConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Watchdog timeout, or `None` when disabled.
    pub fn watchdog(&self) -> Option<Duration> {
        (self.watchdog_secs > 0).then(|| Duration::from_secs(self.watchdog_secs))
    }
}

fn default_latency_ms() -> u64 {
    3000
}

fn default_watchdog_secs() -> u64 {
    30
}

/// Camera and photo library configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    /// Camera permission at startup
    #[serde(default = "default_camera_permission")]
    pub camera_permission: PermissionStatus,

    /// Whether re-requesting permission grants it
    #[serde(default = "default_true")]
    pub grant_on_request: bool,

    /// Whether the host has a controllable flash
    #[serde(default = "default_true")]
    pub flash_supported: bool,

    /// JPEG quality requested from the camera and picker (0.0 - 1.0)
    #[serde(default = "default_capture_quality")]
    pub capture_quality: f32,

    /// Directory browsed by the photo library picker
    pub library_dir: Option<PathBuf>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            camera_permission: default_camera_permission(),
            grant_on_request: true,
            flash_supported: true,
            capture_quality: default_capture_quality(),
            library_dir: None,
        }
    }
}

impl MediaConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.capture_quality) {
            return Err(Error::Config(
                "media.capture_quality must be between 0.0 and 1.0".to_string(),
            ));
        }
        Ok(())
    }

    /// Picker directory, defaulting to `~/Pictures`
    pub fn library_dir(&self) -> PathBuf {
        self.library_dir
            .clone()
            .unwrap_or_else(|| home_dir().join("Pictures"))
    }
}

fn default_camera_permission() -> PermissionStatus {
    PermissionStatus::Granted
}

fn default_capture_quality() -> f32 {
    0.8
}

/// Meter configuration
#[derive(Debug, Deserialize, Clone)]
pub struct MeterConfig {
    /// Interval between simulated readings in milliseconds
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: default_sample_interval_ms(),
        }
    }
}

impl MeterConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

fn default_sample_interval_ms() -> u64 {
    1000
}

/// Profile configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ProfileConfig {
    /// Browse without an account
    #[serde(default = "default_true")]
    pub guest: bool,

    /// Name shown in greetings when signed in
    pub display_name: Option<String>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            guest: true,
            display_name: None,
        }
    }
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.media.validate()?;
        if self.meters.sample_interval_ms == 0 {
            return Err(Error::Config(
                "meters.sample_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/verdant/config.toml` (~/.config/verdant/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("verdant").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/verdant/` (~/.local/state/verdant/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("verdant")
    }
}
