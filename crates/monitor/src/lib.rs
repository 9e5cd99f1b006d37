//! Drowsiness Monitor
//!
//! Wires the DMS tracker to its collaborators: a frame source, the overlay
//! renderer, the alert player and the wall clock, and drives them from a
//! single-threaded frame loop.

pub mod clock;
pub mod config;
pub mod overlay;
pub mod render;
pub mod replay;
pub mod runner;

pub use clock::{Clock, SystemClock};
pub use self::config::{LogConfig, MonitorConfig};
pub use overlay::compose_overlay;
pub use render::{CanvasRenderer, Caption, Renderer};
pub use replay::{LandmarkTrace, TraceLocator, TracePredictor, TraceSource};
pub use runner::{Monitor, RunSummary, StopReason};

use alerting::AlertError;
use camera_capture::CameraError;
use dms::DmsError;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Trace {path} line {line}: {reason}")]
    Trace {
        path: String,
        line: usize,
        reason: String,
    },

    #[error(transparent)]
    Dms(#[from] DmsError),

    #[error(transparent)]
    Alert(#[from] AlertError),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize logging.
///
/// `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}
