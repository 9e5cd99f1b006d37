//! Frame source contract

use crate::{CameraError, VideoFrame};

/// Anything that can hand the monitor loop one frame at a time.
///
/// A source is read from a single thread. Any error ends the loop; there is
/// no retry. Implementations release their device when dropped.
pub trait FrameSource {
    /// Block until the next frame is available.
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
        (**self).next_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown(u32);

    impl FrameSource for Countdown {
        fn next_frame(&mut self) -> Result<VideoFrame, CameraError> {
            if self.0 == 0 {
                return Err(CameraError::EndOfStream { frames: 3 });
            }
            self.0 -= 1;
            Ok(VideoFrame::blank(2, 2, 3 - self.0))
        }
    }

    #[test]
    fn test_boxed_source_forwards() {
        let mut source: Box<dyn FrameSource> = Box::new(Countdown(3));
        let mut seen = Vec::new();
        loop {
            match source.next_frame() {
                Ok(frame) => seen.push(frame.sequence),
                Err(e) => {
                    assert!(e.is_end_of_stream());
                    break;
                }
            }
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }
}
