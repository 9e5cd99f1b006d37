//! Landmark trace replay
//!
//! A trace is a JSON-lines file with one object per frame:
//!
//! ```text
//! {"faces": [[[x0, y0], [x1, y1], ... 68 points], ...]}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Replaying a trace
//! stands in for the camera, the face locator and the landmark predictor.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use camera_capture::{CameraError, FrameSource, VideoFrame};
use dms::{DmsError, FaceLandmarks, FaceLocator, FaceRegion, LandmarkPredictor, Point};
use serde::Deserialize;
use tracing::info;

use crate::MonitorError;

#[derive(Debug, Deserialize)]
struct TraceRecord {
    #[serde(default)]
    faces: Vec<Vec<[f32; 2]>>,
}

/// Recorded landmarks, indexed by frame
#[derive(Debug, Clone, Default)]
pub struct LandmarkTrace {
    frames: Vec<Vec<FaceLandmarks>>,
}

impl LandmarkTrace {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MonitorError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let trace = Self::parse(BufReader::new(file), &path.display().to_string())?;
        info!("Loaded {} frames from {}", trace.len(), path.display());
        Ok(trace)
    }

    /// Parse a trace; `name` only labels errors
    pub fn parse<R: BufRead>(reader: R, name: &str) -> Result<Self, MonitorError> {
        let mut frames = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let trace_error = |reason: String| MonitorError::Trace {
                path: name.to_string(),
                line: index + 1,
                reason,
            };

            let record: TraceRecord =
                serde_json::from_str(line).map_err(|e| trace_error(e.to_string()))?;
            let faces = record
                .faces
                .into_iter()
                .map(|points| FaceLandmarks::new(points.into_iter().map(Point::from).collect()))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| trace_error(e.to_string()))?;
            frames.push(faces);
        }

        Ok(Self { frames })
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Faces recorded for a frame; empty past the end
    pub fn faces(&self, sequence: u32) -> &[FaceLandmarks] {
        self.frames
            .get(sequence as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Split into the three collaborators that replay this trace
    pub fn into_replay(
        self,
        width: u32,
        height: u32,
    ) -> Result<(TraceSource, TraceLocator, TracePredictor), CameraError> {
        let trace = Arc::new(self);
        Ok((
            TraceSource::new(trace.clone(), width, height)?,
            TraceLocator {
                trace: trace.clone(),
            },
            TracePredictor { trace },
        ))
    }
}

/// Yields one blank frame per trace entry
pub struct TraceSource {
    trace: Arc<LandmarkTrace>,
    width: u32,
    height: u32,
    next: u32,
}

impl TraceSource {
    pub fn new(trace: Arc<LandmarkTrace>, width: u32, height: u32) -> Result<Self, CameraError> {
        if width == 0 || height == 0 {
            return Err(CameraError::Open(format!(
                "invalid replay frame size {}x{}",
                width, height
            )));
        }
        Ok(Self {
            trace,
            width,
            height,
            next: 0,
        })
    }
}

impl FrameSource for TraceSource {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        if self.next as usize >= self.trace.len() {
            return Err(CameraError::EndOfStream { frames: self.next });
        }
        let frame = VideoFrame::blank(self.width, self.height, self.next);
        self.next += 1;
        Ok(frame)
    }
}

/// Reports the recorded faces of each frame
pub struct TraceLocator {
    trace: Arc<LandmarkTrace>,
}

impl FaceLocator for TraceLocator {
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<FaceRegion>, DmsError> {
        Ok(self
            .trace
            .faces(frame.sequence)
            .iter()
            .enumerate()
            .map(|(slot, landmarks)| FaceRegion::enclosing(landmarks, slot))
            .collect())
    }
}

/// Returns the recorded landmarks for a located face
pub struct TracePredictor {
    trace: Arc<LandmarkTrace>,
}

impl LandmarkPredictor for TracePredictor {
    fn predict(
        &mut self,
        frame: &VideoFrame,
        face: &FaceRegion,
    ) -> Result<FaceLandmarks, DmsError> {
        self.trace
            .faces(frame.sequence)
            .get(face.slot)
            .cloned()
            .ok_or_else(|| {
                DmsError::Landmarks(format!(
                    "no face {} recorded for frame {}",
                    face.slot, frame.sequence
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_json(offset: f32) -> String {
        let points: Vec<String> = (0..68)
            .map(|i| format!("[{}, {}]", offset + i as f32, offset))
            .collect();
        format!("[{}]", points.join(", "))
    }

    fn trace_text() -> String {
        format!(
            "# recorded session\n{{\"faces\": [{}]}}\n\n{{\"faces\": []}}\n{{\"faces\": [{}, {}]}}\n",
            face_json(0.0),
            face_json(1.0),
            face_json(2.0)
        )
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let trace = LandmarkTrace::parse(trace_text().as_bytes(), "mem").unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.faces(0).len(), 1);
        assert!(trace.faces(1).is_empty());
        assert_eq!(trace.faces(2).len(), 2);
        assert!(trace.faces(99).is_empty());
    }

    #[test]
    fn test_parse_reports_line() {
        let text = "{\"faces\": []}\n{\"faces\": [[[1.0, 2.0]]]}\n";
        let err = LandmarkTrace::parse(text.as_bytes(), "short.jsonl").unwrap_err();
        match err {
            MonitorError::Trace { path, line, .. } => {
                assert_eq!(path, "short.jsonl");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            LandmarkTrace::parse("not json".as_bytes(), "bad"),
            Err(MonitorError::Trace { line: 1, .. })
        ));
    }

    #[test]
    fn test_replay_collaborators() {
        let trace = LandmarkTrace::parse(trace_text().as_bytes(), "mem").unwrap();
        let (mut source, mut locator, mut predictor) = trace.into_replay(60, 45).unwrap();

        let mut sequences = Vec::new();
        let mut faces = Vec::new();
        loop {
            let frame = match source.next_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    assert!(matches!(e, CameraError::EndOfStream { frames: 3 }));
                    break;
                }
            };
            assert_eq!((frame.width, frame.height), (60, 45));
            let regions = locator.detect(&frame).unwrap();
            for region in &regions {
                let landmarks = predictor.predict(&frame, region).unwrap();
                assert_eq!(landmarks.points()[0].x, region.x);
            }
            sequences.push(frame.sequence);
            faces.push(regions.len());
        }

        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(faces, vec![1, 0, 2]);
    }

    #[test]
    fn test_predictor_unknown_slot() {
        let trace = LandmarkTrace::parse(trace_text().as_bytes(), "mem").unwrap();
        let (_, _, mut predictor) = trace.into_replay(4, 4).unwrap();
        let region = FaceRegion {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            slot: 5,
        };
        assert!(matches!(
            predictor.predict(&VideoFrame::blank(4, 4, 0), &region),
            Err(DmsError::Landmarks(_))
        ));
    }

    #[test]
    fn test_zero_frame_size_rejected() {
        let result = LandmarkTrace::default().into_replay(0, 10);
        assert!(matches!(result, Err(CameraError::Open(_))));
    }
}
