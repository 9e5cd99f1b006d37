//! Monitor configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! TOML file, then `DROWSY_*` environment variables
//! (e.g. `DROWSY_DMS__EAR_THRESHOLD=0.22`).

use std::path::Path;
use std::time::Duration;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use alerting::AlertConfig;
use dms::DmsConfig;
use serde::{Deserialize, Serialize};

use crate::MonitorError;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. "info" or "dms=debug,info"
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Tracker thresholds
    pub dms: DmsConfig,
    /// Alert sound
    pub alert: AlertConfig,
    /// Frames are resized to this width before analysis
    pub frame_width: u32,
    /// Wait between frames, during which quit is checked (milliseconds)
    pub poll_interval_ms: u64,
    /// Title used by the renderer
    pub window_title: String,
    pub log: LogConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            dms: DmsConfig::default(),
            alert: AlertConfig::default(),
            frame_width: 600,
            poll_interval_ms: 2,
            window_title: "Drowsiness Detector".to_string(),
            log: LogConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Load defaults, an optional file, and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, MonitorError> {
        let mut builder = Self::defaults()?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("DROWSY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
        Self::finish(builder)
    }

    /// Load defaults overlaid with a TOML document
    pub fn from_toml(toml: &str) -> Result<Self, MonitorError> {
        Self::finish(Self::defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        self.dms.validate()?;
        self.alert.validate()?;
        if self.frame_width == 0 {
            return Err(MonitorError::Invalid("frame_width must be positive".into()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Height of replayed frames: 4:3 at the configured width
    pub fn frame_height(&self) -> u32 {
        (self.frame_width * 3 / 4).max(1)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, MonitorError> {
        Ok(Config::builder().add_source(Config::try_from(&Self::default())?))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, MonitorError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
