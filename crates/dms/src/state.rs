//! Driver state tracking

use serde::{Deserialize, Serialize};

use crate::analysis::Color;
use crate::DmsConfig;

/// Per-frame drowsiness classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrowsinessStatus {
    /// Eyes open this frame
    #[default]
    Awake,
    /// Eyes closed, not yet for long enough to alert
    Drowsy,
    /// Eyes closed for the sustained-closure limit or longer
    Alert,
}

impl DrowsinessStatus {
    /// On-screen label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Awake => "Awake",
            Self::Drowsy => "Drowsy",
            Self::Alert => "ALERT!",
        }
    }

    /// On-screen color
    pub fn color(&self) -> Color {
        match self {
            Self::Awake => Color::GREEN,
            Self::Drowsy => Color::YELLOW,
            Self::Alert => Color::RED,
        }
    }
}

/// Closure counters carried from frame to frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerState {
    /// Frames in the current closed run; zero while eyes are open
    pub consecutive_low_frames: u32,

    /// Completed short closures
    pub blink_count: u32,

    /// Length of the closed run that ended most recently
    pub last_run_length: u32,
}

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: DrowsinessStatus,
    /// This frame ended a closure that counted as a blink
    pub blink_completed: bool,
    /// This frame is the first Alert frame of the current closure
    pub entered_alert: bool,
}

impl TrackerState {
    /// Advance by one EAR reading.
    ///
    /// While a closure is in progress the reopen threshold applies, so a
    /// configured hysteresis band keeps the run going until the eye clearly
    /// reopens.
    pub fn advance(self, ear: f32, config: &DmsConfig) -> (Self, Transition) {
        let threshold = if self.consecutive_low_frames > 0 {
            config.reopen_threshold()
        } else {
            config.ear_threshold
        };

        let mut next = self;

        if ear < threshold {
            next.consecutive_low_frames = self.consecutive_low_frames.saturating_add(1);
            let alert = next.consecutive_low_frames >= config.sustained_frames;
            let status = if alert {
                DrowsinessStatus::Alert
            } else {
                DrowsinessStatus::Drowsy
            };
            let transition = Transition {
                status,
                blink_completed: false,
                entered_alert: alert && self.consecutive_low_frames < config.sustained_frames,
            };
            return (next, transition);
        }

        let run_length = self.consecutive_low_frames;
        let blink_completed = config.is_blink(run_length);
        if blink_completed {
            next.blink_count = self.blink_count.saturating_add(1);
        }
        if run_length > 0 {
            next.last_run_length = run_length;
        }
        next.consecutive_low_frames = 0;

        let transition = Transition {
            status: DrowsinessStatus::Awake,
            blink_completed,
            entered_alert: false,
        };
        (next, transition)
    }

    /// Whether the current closed run has reached the alert limit
    pub fn alert_active(&self, config: &DmsConfig) -> bool {
        self.consecutive_low_frames >= config.sustained_frames
    }

    /// Reset state (on driver change)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
