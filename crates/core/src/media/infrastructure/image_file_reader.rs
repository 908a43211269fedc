use std::path::Path;

use crate::media::domain::image_reader::ImageReader;
use crate::shared::frame::Frame;

/// Decodes image files with the `image` crate.
///
/// Images with an alpha channel become 4-channel frames, everything else
/// 3-channel RGB.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::open(path)?;
        let (width, height) = (img.width(), img.height());
        let frame = if img.color().has_alpha() {
            Frame::new(img.into_rgba8().into_raw(), width, height, 4, 0)
        } else {
            Frame::new(img.into_rgb8().into_raw(), width, height, 3, 0)
        };
        log::debug!(
            "Read {} ({}x{}, {} channels)",
            path.display(),
            width,
            height,
            frame.channels()
        );
        Ok(frame)
    }
}
