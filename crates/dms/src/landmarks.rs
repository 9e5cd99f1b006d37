//! Facial landmark types

use serde::{Deserialize, Serialize};

use crate::DmsError;

/// Number of points produced by the 68-point landmark predictor
pub const LANDMARK_COUNT: usize = 68;

/// Right eye contour indices (subject's right) in the 68-point layout
pub const RIGHT_EYE: std::ops::Range<usize> = 36..42;

/// Left eye contour indices (subject's left) in the 68-point layout
pub const LEFT_EYE: std::ops::Range<usize> = 42..48;

/// 2-D landmark position in image coordinates (pixels)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Six-point eye contour: outer corner, two upper lid points, inner
/// corner, two lower lid points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeShape(pub [Point; 6]);

impl EyeShape {
    pub fn points(&self) -> &[Point; 6] {
        &self.0
    }
}

/// Full 68-point face landmark set for one detected face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct FaceLandmarks {
    points: Vec<Point>,
}

impl FaceLandmarks {
    /// Wrap predictor output, rejecting anything that is not 68 points
    pub fn new(points: Vec<Point>) -> Result<Self, DmsError> {
        if points.len() != LANDMARK_COUNT {
            return Err(DmsError::LandmarkCount {
                expected: LANDMARK_COUNT,
                actual: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Subject's left eye
    pub fn left_eye(&self) -> EyeShape {
        self.eye(LEFT_EYE)
    }

    /// Subject's right eye
    pub fn right_eye(&self) -> EyeShape {
        self.eye(RIGHT_EYE)
    }

    fn eye(&self, range: std::ops::Range<usize>) -> EyeShape {
        let mut eye = [Point::default(); 6];
        eye.copy_from_slice(&self.points[range]);
        EyeShape(eye)
    }
}

impl TryFrom<Vec<Point>> for FaceLandmarks {
    type Error = DmsError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<FaceLandmarks> for Vec<Point> {
    fn from(landmarks: FaceLandmarks) -> Self {
        landmarks.points
    }
}
