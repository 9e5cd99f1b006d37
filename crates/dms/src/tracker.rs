//! Drowsiness tracker: EAR stream in, annotated frames out

use alerting::AlertManager;
use tracing::{debug, info, warn};

use crate::analysis::FrameAnnotation;
use crate::state::{DrowsinessStatus, TrackerState};
use crate::{DmsConfig, DmsError};

/// Owns the closure counters and the alert gate.
///
/// Every face of every frame feeds the same state; several faces in view
/// are treated as one stream.
pub struct DrowsinessTracker {
    config: DmsConfig,
    state: TrackerState,
    alerts: AlertManager,
}

impl DrowsinessTracker {
    pub fn new(config: DmsConfig, alerts: AlertManager) -> Self {
        Self {
            config,
            state: TrackerState::default(),
            alerts,
        }
    }

    /// Feed one EAR reading.
    ///
    /// Negative or non-finite readings are rejected without touching the
    /// state.
    pub fn update(&mut self, ear: f32) -> Result<FrameAnnotation, DmsError> {
        if !ear.is_finite() || ear < 0.0 {
            return Err(DmsError::InvalidEar(ear));
        }

        let (next, transition) = self.state.advance(ear, &self.config);
        self.state = next;

        if transition.blink_completed {
            debug!(
                "Blink after {} closed frames (total {})",
                next.last_run_length, next.blink_count
            );
        }
        if transition.entered_alert {
            warn!(
                "Eyes closed for {} frames, raising drowsiness alert",
                next.consecutive_low_frames
            );
        }

        let alert_just_triggered =
            transition.status == DrowsinessStatus::Alert && self.alerts.raise();

        Ok(FrameAnnotation {
            ear,
            status: transition.status,
            color: transition.status.color(),
            blink_count: next.blink_count,
            alert_just_triggered,
            closed_frames: next.consecutive_low_frames,
        })
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn config(&self) -> &DmsConfig {
        &self.config
    }

    pub fn alerts(&self) -> &AlertManager {
        &self.alerts
    }

    /// Whether the current closure has reached the alert limit
    pub fn alert_active(&self) -> bool {
        self.state.alert_active(&self.config)
    }

    /// Reset counters (on driver change)
    pub fn reset(&mut self) {
        info!(
            "Resetting tracker after {} blinks and {} alerts",
            self.state.blink_count,
            self.alerts.fire_count()
        );
        self.state.reset();
        self.alerts.clear();
    }
}
