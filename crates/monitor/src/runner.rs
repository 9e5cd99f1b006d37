//! Frame loop

use std::future::Future;
use std::time::Duration;

use camera_capture::FrameSource;
use dms::{DmsAnalysis, DmsModule};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::overlay::compose_overlay;
use crate::render::Renderer;
use crate::MonitorConfig;

/// Why the loop ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// The source ran out of frames
    EndOfStream,
    /// The source failed to deliver a frame
    SourceFailed(String),
    /// Quit was requested
    Quit,
}

/// Totals for one monitoring session
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub faces: u64,
    /// Frames on which face detection failed
    pub failed_frames: u64,
    pub blinks: u32,
    pub alerts_fired: usize,
    pub stop: StopReason,
}

/// Single-threaded monitoring loop.
///
/// Owns the frame source and the renderer; both are dropped when `run`
/// returns, whatever ended the loop.
pub struct Monitor<S, R, C> {
    source: S,
    dms: DmsModule,
    renderer: R,
    clock: C,
    frame_width: u32,
    poll_interval: Duration,
}

impl<S, R, C> Monitor<S, R, C>
where
    S: FrameSource,
    R: Renderer,
    C: Clock,
{
    pub fn new(source: S, dms: DmsModule, renderer: R, clock: C, config: &MonitorConfig) -> Self {
        Self {
            source,
            dms,
            renderer,
            clock,
            frame_width: config.frame_width,
            poll_interval: config.poll_interval(),
        }
    }

    /// Process frames until the source ends or `shutdown` resolves.
    ///
    /// `shutdown` is polled once per frame, during the wait between frames.
    pub async fn run<F>(mut self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut frames = 0u64;
        let mut faces = 0u64;
        let mut failed_frames = 0u64;

        let stop = loop {
            let frame = match self.source.next_frame() {
                Ok(frame) => frame,
                Err(e) if e.is_end_of_stream() => {
                    info!("{}", e);
                    break StopReason::EndOfStream;
                }
                Err(e) => {
                    error!("Failed to grab frame: {}", e);
                    break StopReason::SourceFailed(e.to_string());
                }
            };

            let frame = frame.resize_to_width(self.frame_width);
            frames += 1;

            let analysis = match self.dms.analyze(&frame) {
                Ok(analysis) => analysis,
                Err(e) => {
                    warn!("Face detection failed on frame {}: {}", frame.sequence, e);
                    failed_frames += 1;
                    DmsAnalysis {
                        sequence: frame.sequence,
                        ..Default::default()
                    }
                }
            };
            faces += analysis.face_count as u64;

            self.renderer.begin(&frame);
            compose_overlay(&mut self.renderer, &analysis, &self.clock.timestamp());
            self.renderer.show();

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Quit requested");
                    break StopReason::Quit;
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        };

        let tracker = self.dms.tracker();
        let summary = RunSummary {
            frames,
            faces,
            failed_frames,
            blinks: tracker.state().blink_count,
            alerts_fired: tracker.alerts().fire_count(),
            stop,
        };
        info!(
            "Monitoring stopped ({:?}): {} frames, {} blinks, {} alerts",
            summary.stop, summary.frames, summary.blinks, summary.alerts_fired
        );
        summary
    }
}
