//! DMS analysis results and frame annotations

use serde::{Deserialize, Serialize};

use crate::detector::FaceRegion;
use crate::landmarks::EyeShape;
use crate::state::DrowsinessStatus;

/// RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const GREEN: Color = Color([0, 255, 0]);
    pub const YELLOW: Color = Color([255, 255, 0]);
    pub const RED: Color = Color([255, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const GRAY: Color = Color([200, 200, 200]);
}

/// Per-face result of one tracker update, consumed by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameAnnotation {
    /// Mean EAR of both eyes
    pub ear: f32,
    pub status: DrowsinessStatus,
    pub color: Color,
    /// Blinks counted so far
    pub blink_count: u32,
    /// The alert sound was started on this frame
    pub alert_just_triggered: bool,
    /// Length of the current closed run
    pub closed_frames: u32,
}

impl FrameAnnotation {
    pub fn ear_text(&self) -> String {
        format!("EAR: {:.2}", self.ear)
    }

    pub fn blink_text(&self) -> String {
        format!("Blinks: {}", self.blink_count)
    }

    pub fn status_text(&self) -> String {
        format!("Status: {}", self.status.label())
    }
}

/// Everything observed about one detected face
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceReading {
    pub region: FaceRegion,
    pub left_eye: EyeShape,
    pub right_eye: EyeShape,
    /// `None` when the eyes gave no reliable reading and the tracker was
    /// left untouched
    pub annotation: Option<FrameAnnotation>,
}

/// Complete DMS analysis result for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DmsAnalysis {
    /// Frame sequence number
    pub sequence: u32,

    /// Faces reported by the locator
    pub face_count: usize,

    /// First frame of the session with a face in it
    pub welcome: bool,

    /// Faces with landmarks, in detection order
    pub faces: Vec<FaceReading>,

    /// Faces that did not update the tracker this frame
    pub skipped_faces: usize,
}

impl DmsAnalysis {
    /// Whether a face was detected
    pub fn face_detected(&self) -> bool {
        self.face_count > 0
    }

    /// Annotation from the last tracker update this frame
    pub fn latest_annotation(&self) -> Option<&FrameAnnotation> {
        self.faces.iter().rev().find_map(|f| f.annotation.as_ref())
    }

    /// Whether any face started the alert sound this frame
    pub fn alert_triggered(&self) -> bool {
        self.faces
            .iter()
            .filter_map(|f| f.annotation.as_ref())
            .any(|a| a.alert_just_triggered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(status: DrowsinessStatus, triggered: bool) -> FrameAnnotation {
        FrameAnnotation {
            ear: 0.123,
            status,
            color: status.color(),
            blink_count: 4,
            alert_just_triggered: triggered,
            closed_frames: 0,
        }
    }

    #[test]
    fn test_annotation_text() {
        let a = annotation(DrowsinessStatus::Alert, true);
        assert_eq!(a.ear_text(), "EAR: 0.12");
        assert_eq!(a.blink_text(), "Blinks: 4");
        assert_eq!(a.status_text(), "Status: ALERT!");
        assert_eq!(a.color, Color::RED);
    }

    #[test]
    fn test_empty_analysis() {
        let analysis = DmsAnalysis::default();
        assert!(!analysis.face_detected());
        assert!(analysis.latest_annotation().is_none());
        assert!(!analysis.alert_triggered());
    }
}
