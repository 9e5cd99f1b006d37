//! Display sink

use camera_capture::VideoFrame;
use dms::{Color, Point};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use imageproc::geometry::convex_hull;
use imageproc::point::Point as PixelPoint;
use tracing::{debug, info};

/// Draw commands issued once per frame, finished by `show`
pub trait Renderer {
    /// Start a new frame
    fn begin(&mut self, frame: &VideoFrame);

    fn draw_text(&mut self, text: &str, origin: (i32, i32), color: Color);

    /// Outline the convex hull of `points`
    fn draw_contour(&mut self, points: &[Point], color: Color);

    /// Present the composed frame
    fn show(&mut self);
}

/// Text placed on a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub text: String,
    pub origin: (i32, i32),
    pub color: Color,
}

/// Headless renderer: contours are drawn into an RGB canvas, captions are
/// kept beside it and traced at debug. No window is opened.
pub struct CanvasRenderer {
    title: String,
    canvas: Option<RgbImage>,
    captions: Vec<Caption>,
    last_captions: Vec<Caption>,
    frames_shown: u64,
}

impl CanvasRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        info!("Rendering '{}' headless", title);
        Self {
            title,
            canvas: None,
            captions: Vec::new(),
            last_captions: Vec::new(),
            frames_shown: 0,
        }
    }

    /// Last presented frame
    pub fn last_frame(&self) -> Option<&RgbImage> {
        self.canvas.as_ref()
    }

    /// Captions of the last presented frame
    pub fn last_captions(&self) -> &[Caption] {
        &self.last_captions
    }

    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }
}

impl Renderer for CanvasRenderer {
    fn begin(&mut self, frame: &VideoFrame) {
        self.canvas = Some(
            frame
                .to_rgb_image()
                .unwrap_or_else(|| RgbImage::new(frame.width, frame.height)),
        );
        self.captions.clear();
    }

    fn draw_text(&mut self, text: &str, origin: (i32, i32), color: Color) {
        self.captions.push(Caption {
            text: text.to_string(),
            origin,
            color,
        });
    }

    fn draw_contour(&mut self, points: &[Point], color: Color) {
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };

        let pixels: Vec<PixelPoint<i32>> = points
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .map(|p| PixelPoint::new(p.x.round() as i32, p.y.round() as i32))
            .collect();
        if pixels.len() < 2 {
            return;
        }

        let hull: Vec<PixelPoint<i32>> = convex_hull(pixels.as_slice());
        let color = Rgb(color.0);
        for (i, start) in hull.iter().enumerate() {
            let end = hull[(i + 1) % hull.len()];
            draw_line_segment_mut(
                canvas,
                (start.x as f32, start.y as f32),
                (end.x as f32, end.y as f32),
                color,
            );
        }
    }

    fn show(&mut self) {
        self.frames_shown += 1;
        let text: Vec<&str> = self.captions.iter().map(|c| c.text.as_str()).collect();
        debug!("[{}] frame {}: {}", self.title, self.frames_shown, text.join(" | "));
        self.last_captions = std::mem::take(&mut self.captions);
    }
}

impl Drop for CanvasRenderer {
    fn drop(&mut self) {
        info!(
            "Renderer '{}' finished after {} frames",
            self.title, self.frames_shown
        );
    }
}
