use std::path::Path;

use crate::media::domain::image_writer::ImageWriter;
use crate::shared::frame::Frame;

/// Writes a frame to an image file using the `image` crate.
///
/// 3-channel frames are saved as RGB, 4-channel frames as RGBA.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let (w, h) = (frame.width(), frame.height());
        let data = frame.data().to_vec();
        match frame.channels() {
            3 => image::RgbImage::from_raw(w, h, data)
                .ok_or("Failed to create image from frame data")?
                .save(path)?,
            4 => image::RgbaImage::from_raw(w, h, data)
                .ok_or("Failed to create image from frame data")?
                .save(path)?,
            other => return Err(format!("Cannot write a {other}-channel frame").into()),
        }
        Ok(())
    }
}
