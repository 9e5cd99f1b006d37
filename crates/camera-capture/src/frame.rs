//! Video frame types and processing

use image::{imageops, ImageBuffer, Rgb, RgbImage};

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Create a black frame
    pub fn blank(width: u32, height: u32, sequence: u32) -> Self {
        Self::new(
            vec![0; (width * height * 3) as usize],
            width,
            height,
            0,
            sequence,
        )
    }

    /// Borrow the frame as an `image` buffer.
    ///
    /// Returns `None` when the data length does not match the dimensions.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        ImageBuffer::<Rgb<u8>, _>::from_raw(self.width, self.height, self.data.clone())
    }

    /// Resize to the given width, keeping the aspect ratio.
    ///
    /// Frames that are already `width` wide, or whose buffer is malformed,
    /// are returned unchanged.
    pub fn resize_to_width(&self, width: u32) -> VideoFrame {
        if width == 0 || width == self.width || self.width == 0 {
            return self.clone();
        }
        let Some(img) = self.to_rgb_image() else {
            tracing::warn!(
                "Frame {} has {} bytes for {}x{}, skipping resize",
                self.sequence,
                self.data.len(),
                self.width,
                self.height
            );
            return self.clone();
        };

        let height = ((self.height as u64 * width as u64) / self.width as u64).max(1) as u32;
        let resized = imageops::resize(&img, width, height, imageops::FilterType::Triangle);

        VideoFrame {
            data: resized.into_raw(),
            width,
            height,
            timestamp_ns: self.timestamp_ns,
            sequence: self.sequence,
        }
    }
}
