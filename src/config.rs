//! Configuration file handling for ascii-gesture.
//!
//! Loads configuration from `<config dir>/ascii-gesture/config.toml` or a
//! custom path. Every field is optional; missing fields take defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ascii::{GridSize, DEFAULT_CHAR_ASPECT_RATIO, DEFAULT_DENSITY, DENSITY_LEVELS};
use crate::camera::{CameraSettings, Resolution};
use crate::controller::{
    RenderParameters, BRIGHTNESS_MAX, BRIGHTNESS_MIN, DEFAULT_BRIGHTNESS_STEP,
};
use crate::gesture::ClassifierThresholds;
use crate::pipeline::DebounceConfig;

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub ascii: AsciiConfig,
    pub gesture: GestureConfig,
    pub detector: DetectorConfig,
    pub ui: UiConfig,
    pub recording: RecordingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Device index or platform device path/name
    pub device: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Flip horizontally so the view acts like a mirror
    pub mirror: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "0".to_string(),
            width: Resolution::MEDIUM.width,
            height: Resolution::MEDIUM.height,
            fps: 30,
            mirror: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiConfig {
    /// Character grid width
    pub columns: u16,
    /// Glyph height over width
    pub char_aspect: f32,
    /// Invert brightness (for light terminals)
    pub invert: bool,
    /// Initial glyph ramp index (also the reset value)
    pub density: usize,
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            columns: 120,
            char_aspect: DEFAULT_CHAR_ASPECT_RATIO,
            invert: false,
            density: DEFAULT_DENSITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Run hand detection at all
    pub enabled: bool,
    /// Brightness change per ThumbsUp/ThumbsDown
    pub brightness_step: i32,
    pub min_stable_ticks: u32,
    pub min_stable_ms: u64,
    pub cooldown_ms: u64,
    pub thresholds: ClassifierThresholds,
}

impl Default for GestureConfig {
    fn default() -> Self {
        let debounce = DebounceConfig::default();
        Self {
            enabled: true,
            brightness_step: DEFAULT_BRIGHTNESS_STEP,
            min_stable_ticks: debounce.min_stable_ticks,
            min_stable_ms: debounce.min_stable.as_millis() as u64,
            cooldown_ms: debounce.cooldown.as_millis() as u64,
            thresholds: ClassifierThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Landmark sidecar argv; empty disables detection
    pub command: Vec<String>,
    /// Longest wait for one detection
    pub timeout_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            timeout_ms: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show the raw camera window
    pub preview: bool,
    /// Draw the detected hand skeleton on the camera window
    pub landmarks: bool,
    pub status_bar: bool,
    /// Show the key help line on start
    pub help: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            preview: true,
            landmarks: true,
            status_bar: true,
            help: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Output directory for screenshots and recordings (default: current dir)
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; without one, log records are discarded
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

/// Errors that can occur when loading or writing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file '{}' already exists", path.display())]
    Exists { path: PathBuf },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config value {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Could not determine the user config directory")]
    NoConfigDir,
}

impl Config {
    /// Load configuration from `path`, or the default location when `None`.
    ///
    /// Returns defaults if the file doesn't exist. Returns an error if the
    /// file exists but cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) => path,
                None => return Ok(Config::default()),
            },
        };

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that have no sensible clamp.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if self.camera.width == 0 || self.camera.height == 0 {
            return invalid("camera.width/height", "must be greater than 0");
        }
        if !(1..=120).contains(&self.camera.fps) {
            return invalid("camera.fps", "must be between 1 and 120");
        }
        if self.ascii.columns == 0 {
            return invalid("ascii.columns", "must be greater than 0");
        }
        if self.ascii.density >= DENSITY_LEVELS {
            return invalid("ascii.density", "must be a glyph ramp index (see `ramps`)");
        }
        if !(1..=BRIGHTNESS_MAX - BRIGHTNESS_MIN).contains(&self.gesture.brightness_step) {
            return invalid("gesture.brightness_step", "must be between 1 and 200");
        }
        if self.gesture.min_stable_ticks == 0 {
            return invalid("gesture.min_stable_ticks", "must be at least 1");
        }
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write a default config file to `path`, refusing to overwrite.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::Exists {
                path: path.to_path_buf(),
            });
        }
        let write_err = |e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = Config::default().to_toml()?;
        std::fs::write(path, content).map_err(write_err)
    }

    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.camera.width,
            height: self.camera.height,
        }
    }

    pub fn camera_settings(&self) -> CameraSettings {
        CameraSettings {
            device: self.camera.device.clone(),
            resolution: self.resolution(),
            fps: self.camera.fps,
        }
    }

    /// Character grid for the configured capture size.
    pub fn grid(&self) -> GridSize {
        GridSize::for_capture(self.ascii.columns, self.resolution(), self.ascii.char_aspect)
    }

    /// Starting (and reset) render parameters.
    pub fn initial_parameters(&self) -> RenderParameters {
        RenderParameters {
            density: self.ascii.density,
            ..RenderParameters::default()
        }
    }

    pub fn debounce(&self) -> DebounceConfig {
        DebounceConfig {
            min_stable_ticks: self.gesture.min_stable_ticks,
            min_stable: Duration::from_millis(self.gesture.min_stable_ms),
            cooldown: Duration::from_millis(self.gesture.cooldown_ms),
        }
    }

    pub fn detector_timeout(&self) -> Duration {
        Duration::from_millis(self.detector.timeout_ms)
    }

    pub fn recording_dir(&self) -> PathBuf {
        self.recording
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Get the default config file path.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ascii-gesture").join("config.toml"))
}
