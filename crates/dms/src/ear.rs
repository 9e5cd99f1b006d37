//! Eye aspect ratio
//!
//! EAR = (|p1 - p5| + |p2 - p4|) / (2 |p0 - p3|) over one six-point eye
//! contour. Open eyes sit around 0.25-0.35; a closed eye approaches zero.

use serde::{Deserialize, Serialize};

use crate::landmarks::EyeShape;
use crate::DmsError;

/// Per-face EAR reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarReading {
    pub left: f32,
    pub right: f32,
    /// Mean of both eyes; the value fed to the tracker
    pub mean: f32,
}

/// EAR of a single eye.
///
/// Eyes narrower than `min_width` have no reliable reading and yield
/// [`DmsError::DegenerateEye`].
pub fn eye_aspect_ratio(eye: &EyeShape, min_width: f32) -> Result<f32, DmsError> {
    let [p0, p1, p2, p3, p4, p5] = eye.0;

    let width = p0.distance(&p3);
    // NaN coordinates fail this comparison too
    if !(width >= min_width) {
        return Err(DmsError::DegenerateEye { width });
    }

    let vertical = p1.distance(&p5) + p2.distance(&p4);
    Ok(vertical / (2.0 * width))
}

/// EAR of both eyes and their mean
pub fn face_aspect_ratio(
    left: &EyeShape,
    right: &EyeShape,
    min_width: f32,
) -> Result<EarReading, DmsError> {
    let left = eye_aspect_ratio(left, min_width)?;
    let right = eye_aspect_ratio(right, min_width)?;
    Ok(EarReading {
        left,
        right,
        mean: (left + right) / 2.0,
    })
}
