//! DMS configuration

use serde::{Deserialize, Serialize};

use crate::DmsError;

/// DMS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// EAR below this value counts as eyes closed
    pub ear_threshold: f32,

    /// EAR a closed eye must reach to count as reopened. `None` uses
    /// `ear_threshold` for both directions.
    pub open_threshold: Option<f32>,

    /// Consecutive closed frames before the alert is raised
    pub sustained_frames: u32,

    /// Shortest closure counted as a blink (frames, inclusive)
    pub blink_min_frames: u32,

    /// Closures this long or longer are not blinks (frames, exclusive)
    pub blink_max_frames: u32,

    /// Eye width (pixels) below which no EAR is computed
    pub min_eye_width: f32,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.20,
            open_threshold: None,
            sustained_frames: 20,
            blink_min_frames: 1,
            blink_max_frames: 3,
            min_eye_width: 1e-3,
        }
    }
}

impl DmsConfig {
    /// Threshold a closed eye has to reach to end the closure
    pub fn reopen_threshold(&self) -> f32 {
        self.open_threshold.unwrap_or(self.ear_threshold)
    }

    /// Whether a closure of `run_length` frames counts as a blink
    pub fn is_blink(&self, run_length: u32) -> bool {
        (self.blink_min_frames..self.blink_max_frames).contains(&run_length)
    }

    pub fn validate(&self) -> Result<(), DmsError> {
        if !self.ear_threshold.is_finite() || self.ear_threshold <= 0.0 {
            return Err(DmsError::Config(format!(
                "ear_threshold must be positive, got {}",
                self.ear_threshold
            )));
        }
        if let Some(open) = self.open_threshold {
            if !open.is_finite() || open < self.ear_threshold {
                return Err(DmsError::Config(format!(
                    "open_threshold {} must not be below ear_threshold {}",
                    open, self.ear_threshold
                )));
            }
        }
        if self.sustained_frames == 0 {
            return Err(DmsError::Config("sustained_frames must be at least 1".into()));
        }
        if self.blink_min_frames == 0 || self.blink_min_frames >= self.blink_max_frames {
            return Err(DmsError::Config(format!(
                "blink window [{}, {}) is empty or starts at zero",
                self.blink_min_frames, self.blink_max_frames
            )));
        }
        if !self.min_eye_width.is_finite() || self.min_eye_width <= 0.0 {
            return Err(DmsError::Config(format!(
                "min_eye_width must be positive, got {}",
                self.min_eye_width
            )));
        }
        Ok(())
    }
}
