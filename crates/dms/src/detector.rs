//! Face locator and landmark predictor contracts

use camera_capture::VideoFrame;
use serde::{Deserialize, Serialize};

use crate::landmarks::FaceLandmarks;
use crate::DmsError;

/// Face bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Detection index within the frame
    pub slot: usize,
}

impl FaceRegion {
    /// Smallest box around a landmark set
    pub fn enclosing(landmarks: &FaceLandmarks, slot: usize) -> Self {
        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in landmarks.points() {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
            slot,
        }
    }
}

/// Finds faces in a frame. Zero faces is a normal result.
pub trait FaceLocator {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<FaceRegion>, DmsError>;
}

/// Places the 68 facial landmarks inside a located face
pub trait LandmarkPredictor {
    fn predict(
        &mut self,
        frame: &VideoFrame,
        face: &FaceRegion,
    ) -> Result<FaceLandmarks, DmsError>;
}
