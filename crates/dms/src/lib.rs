//! Driver Monitoring System (DMS)
//!
//! Drowsiness detection from facial landmarks:
//! - Eye aspect ratio (EAR) from the 68-point landmark layout
//! - Blink counting over short eye closures
//! - Sustained-closure alert with a play-once audio gate
//!
//! Face location and landmark prediction are supplied by the caller through
//! [`FaceLocator`] and [`LandmarkPredictor`].

pub mod analysis;
pub mod config;
pub mod detector;
pub mod ear;
pub mod landmarks;
pub mod state;
pub mod tracker;

pub use analysis::{Color, DmsAnalysis, FaceReading, FrameAnnotation};
pub use config::DmsConfig;
pub use detector::{FaceLocator, FaceRegion, LandmarkPredictor};
pub use ear::{eye_aspect_ratio, face_aspect_ratio, EarReading};
pub use landmarks::{EyeShape, FaceLandmarks, Point};
pub use state::{DrowsinessStatus, TrackerState, Transition};
pub use tracker::DrowsinessTracker;

use alerting::AlertManager;
use camera_capture::VideoFrame;
use thiserror::Error;
use tracing::{debug, info, warn};

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Face detection failed: {0}")]
    Detection(String),

    #[error("Landmark prediction failed: {0}")]
    Landmarks(String),

    #[error("Expected {expected} landmarks, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("Eye width {width} too small for a reliable EAR")]
    DegenerateEye { width: f32 },

    #[error("Invalid EAR reading: {0}")]
    InvalidEar(f32),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Driver monitoring module
pub struct DmsModule {
    config: DmsConfig,
    locator: Box<dyn FaceLocator>,
    predictor: Box<dyn LandmarkPredictor>,
    tracker: DrowsinessTracker,
    welcome_shown: bool,
}

impl DmsModule {
    /// Create a new DMS module with configuration
    pub fn new(
        config: DmsConfig,
        locator: Box<dyn FaceLocator>,
        predictor: Box<dyn LandmarkPredictor>,
        alerts: AlertManager,
    ) -> Result<Self, DmsError> {
        config.validate()?;
        Ok(Self {
            tracker: DrowsinessTracker::new(config.clone(), alerts),
            config,
            locator,
            predictor,
            welcome_shown: false,
        })
    }

    /// Analyze a single frame for driver state.
    ///
    /// A locator failure is returned to the caller. A face whose landmarks
    /// or eye geometry are unusable is skipped for this frame only.
    pub fn analyze(&mut self, frame: &VideoFrame) -> Result<DmsAnalysis, DmsError> {
        let regions = self.locator.detect(frame)?;

        let welcome = !regions.is_empty() && !self.welcome_shown;
        if welcome {
            self.welcome_shown = true;
            info!("Face detected on frame {}, monitoring started", frame.sequence);
        }

        let mut analysis = DmsAnalysis {
            sequence: frame.sequence,
            face_count: regions.len(),
            welcome,
            ..Default::default()
        };

        for region in regions {
            let landmarks = match self.predictor.predict(frame, &region) {
                Ok(landmarks) => landmarks,
                Err(e) => {
                    warn!(
                        "Skipping face {} on frame {}: {}",
                        region.slot, frame.sequence, e
                    );
                    analysis.skipped_faces += 1;
                    continue;
                }
            };

            let left_eye = landmarks.left_eye();
            let right_eye = landmarks.right_eye();

            let annotation = face_aspect_ratio(&left_eye, &right_eye, self.config.min_eye_width)
                .and_then(|reading| self.tracker.update(reading.mean));
            let annotation = match annotation {
                Ok(annotation) => Some(annotation),
                Err(e) => {
                    debug!(
                        "No EAR for face {} on frame {}: {}",
                        region.slot, frame.sequence, e
                    );
                    analysis.skipped_faces += 1;
                    None
                }
            };

            analysis.faces.push(FaceReading {
                region,
                left_eye,
                right_eye,
                annotation,
            });
        }

        Ok(analysis)
    }

    pub fn config(&self) -> &DmsConfig {
        &self.config
    }

    pub fn tracker(&self) -> &DrowsinessTracker {
        &self.tracker
    }

    /// Reset driver state (on driver change)
    pub fn reset_state(&mut self) {
        self.tracker.reset();
        self.welcome_shown = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Landmarks whose eyes both have the given EAR
    fn face_with_ear(ear: f32) -> FaceLandmarks {
        let mut points = vec![Point::new(100.0, 100.0); 68];
        let width = 30.0;
        let half = ear * width / 2.0;
        for (range, x0) in [(landmarks::RIGHT_EYE, 60.0), (landmarks::LEFT_EYE, 120.0)] {
            let eye = [
                Point::new(x0, 80.0),
                Point::new(x0 + width / 3.0, 80.0 - half),
                Point::new(x0 + 2.0 * width / 3.0, 80.0 - half),
                Point::new(x0 + width, 80.0),
                Point::new(x0 + 2.0 * width / 3.0, 80.0 + half),
                Point::new(x0 + width / 3.0, 80.0 + half),
            ];
            points[range].copy_from_slice(&eye);
        }
        FaceLandmarks::new(points).unwrap()
    }

    /// Scripted collaborators: frame N sees `script[N]` faces
    struct Script {
        frames: Vec<Vec<Option<FaceLandmarks>>>,
    }

    struct ScriptLocator(std::rc::Rc<Script>);
    struct ScriptPredictor(std::rc::Rc<Script>);

    impl FaceLocator for ScriptLocator {
        fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<FaceRegion>, DmsError> {
            let faces = self
                .0
                .frames
                .get(frame.sequence as usize)
                .ok_or_else(|| DmsError::Detection("script exhausted".into()))?;
            Ok((0..faces.len())
                .map(|slot| FaceRegion {
                    x: 0.0,
                    y: 0.0,
                    width: 10.0,
                    height: 10.0,
                    slot,
                })
                .collect())
        }
    }

    impl LandmarkPredictor for ScriptPredictor {
        fn predict(
            &mut self,
            frame: &VideoFrame,
            face: &FaceRegion,
        ) -> Result<FaceLandmarks, DmsError> {
            self.0.frames[frame.sequence as usize][face.slot]
                .clone()
                .ok_or_else(|| DmsError::Landmarks("occluded".into()))
        }
    }

    fn module(frames: Vec<Vec<Option<FaceLandmarks>>>) -> DmsModule {
        let script = std::rc::Rc::new(Script { frames });
        DmsModule::new(
            DmsConfig::default(),
            Box::new(ScriptLocator(script.clone())),
            Box::new(ScriptPredictor(script)),
            AlertManager::silent(),
        )
        .unwrap()
    }

    fn frame(sequence: u32) -> VideoFrame {
        VideoFrame::blank(4, 4, sequence)
    }

    #[test]
    fn test_no_face_leaves_state() {
        let mut dms = module(vec![vec![Some(face_with_ear(0.1))], vec![], vec![]]);
        dms.analyze(&frame(0)).unwrap();

        for seq in 1..3 {
            let analysis = dms.analyze(&frame(seq)).unwrap();
            assert!(!analysis.face_detected());
            assert!(analysis.faces.is_empty());
        }
        assert_eq!(dms.tracker().state().consecutive_low_frames, 1);
    }

    #[test]
    fn test_welcome_shown_once() {
        let mut dms = module(vec![
            vec![],
            vec![Some(face_with_ear(0.3))],
            vec![Some(face_with_ear(0.3))],
        ]);
        let welcomes: Vec<bool> = (0..3)
            .map(|seq| dms.analyze(&frame(seq)).unwrap().welcome)
            .collect();
        assert_eq!(welcomes, vec![false, true, false]);
    }

    #[test]
    fn test_blink_through_module() {
        let mut dms = module(vec![
            vec![Some(face_with_ear(0.1))],
            vec![Some(face_with_ear(0.1))],
            vec![Some(face_with_ear(0.3))],
        ]);
        let mut last = None;
        for seq in 0..3 {
            last = Some(dms.analyze(&frame(seq)).unwrap());
        }
        let annotation = *last.unwrap().latest_annotation().unwrap();
        assert_eq!(annotation.status, DrowsinessStatus::Awake);
        assert_eq!(annotation.blink_count, 1);
        assert!((annotation.ear - 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_eyes_skipped() {
        let collapsed = FaceLandmarks::new(vec![Point::new(5.0, 5.0); 68]).unwrap();
        let mut dms = module(vec![
            vec![Some(face_with_ear(0.1))],
            vec![Some(collapsed)],
            vec![Some(face_with_ear(0.1))],
        ]);

        dms.analyze(&frame(0)).unwrap();
        let analysis = dms.analyze(&frame(1)).unwrap();
        assert_eq!(analysis.skipped_faces, 1);
        assert_eq!(analysis.faces.len(), 1);
        assert!(analysis.faces[0].annotation.is_none());

        dms.analyze(&frame(2)).unwrap();
        assert_eq!(dms.tracker().state().consecutive_low_frames, 2);
    }

    #[test]
    fn test_failed_prediction_skips_face() {
        let mut dms = module(vec![vec![None, Some(face_with_ear(0.1))]]);
        let analysis = dms.analyze(&frame(0)).unwrap();
        assert_eq!(analysis.face_count, 2);
        assert_eq!(analysis.skipped_faces, 1);
        assert_eq!(analysis.faces.len(), 1);
        assert_eq!(analysis.faces[0].region.slot, 1);
    }

    #[test]
    fn test_faces_share_one_stream() {
        // Two faces per frame each advance the same counter
        let frames = (0..10)
            .map(|_| vec![Some(face_with_ear(0.1)), Some(face_with_ear(0.1))])
            .collect();
        let mut dms = module(frames);
        let mut last = None;
        for seq in 0..10 {
            last = Some(dms.analyze(&frame(seq)).unwrap());
        }
        let last = last.unwrap();
        assert_eq!(dms.tracker().state().consecutive_low_frames, 20);
        assert_eq!(
            last.latest_annotation().unwrap().status,
            DrowsinessStatus::Alert
        );
        assert!(last.alert_triggered());
    }

    #[test]
    fn test_locator_failure_propagates() {
        let mut dms = module(vec![]);
        assert!(matches!(
            dms.analyze(&frame(0)),
            Err(DmsError::Detection(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let script = std::rc::Rc::new(Script { frames: vec![] });
        let result = DmsModule::new(
            DmsConfig {
                sustained_frames: 0,
                ..Default::default()
            },
            Box::new(ScriptLocator(script.clone())),
            Box::new(ScriptPredictor(script)),
            AlertManager::silent(),
        );
        assert!(matches!(result, Err(DmsError::Config(_))));
    }

    #[test]
    fn test_reset_state() {
        let mut dms = module(vec![vec![Some(face_with_ear(0.1))]; 3]);
        for seq in 0..3 {
            dms.analyze(&frame(seq)).unwrap();
        }
        dms.reset_state();
        assert_eq!(*dms.tracker().state(), TrackerState::default());
    }
}
