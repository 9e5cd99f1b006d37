//! Alerting System
//!
//! Audible alert capability for the drowsiness monitor: a play-once gate that
//! never overlaps playback, the alert sound clip, and the visual-only fallback
//! used when no sound can be loaded.

mod manager;
mod player;

pub use manager::AlertManager;
pub use player::{open_player, AlertConfig, AudioPlayer, ClipPlayer, SilentPlayer};

use thiserror::Error;

/// Alerting error types
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Failed to load alert sound {path}: {reason}")]
    AssetLoad { path: String, reason: String },

    #[error("Audio output unavailable: {0}")]
    Output(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
