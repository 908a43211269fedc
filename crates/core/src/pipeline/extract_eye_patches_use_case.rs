use std::path::Path;

use crate::extraction::domain::eye_patch::{EyePatch, EyePatchOutcome};
use crate::media::domain::image_reader::ImageReader;
use crate::media::domain::image_writer::ImageWriter;
use crate::pipeline::eye_patch_tracker::EyePatchTracker;
use crate::rendering::domain::overlay_renderer::OverlayRenderer;
use crate::shared::constants::{LEFT_EYE_FILENAME, RIGHT_EYE_FILENAME};
use crate::shared::frame::Frame;

/// Single-image eye extraction: read → track → write patches (→ overlay).
pub struct ExtractEyePatchesUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    tracker: EyePatchTracker,
    renderer: Option<Box<dyn OverlayRenderer>>,
}

impl ExtractEyePatchesUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        tracker: EyePatchTracker,
        renderer: Option<Box<dyn OverlayRenderer>>,
    ) -> Self {
        Self {
            reader,
            writer,
            tracker,
            renderer,
        }
    }

    /// Reads `input_path`, writes both eye patches into `output_dir` on
    /// success and returns the tracker's outcome.
    ///
    /// With `overlay_path` set and a renderer configured, the input frame is
    /// also written there with the cached landmarks drawn on it. The overlay
    /// is written whenever landmarks exist, including for degenerate boxes.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_dir: &Path,
        overlay_path: Option<&Path>,
    ) -> Result<EyePatchOutcome, Box<dyn std::error::Error>> {
        let frame = self.reader.read(input_path)?;
        let outcome = self.tracker.get_eye_patches(&frame)?;

        if let EyePatchOutcome::Success(patches) = &outcome {
            self.write_patch(&output_dir.join(LEFT_EYE_FILENAME), &patches.left)?;
            self.write_patch(&output_dir.join(RIGHT_EYE_FILENAME), &patches.right)?;
        }

        if let (Some(path), Some(renderer)) = (overlay_path, self.renderer.as_ref()) {
            if let Some(positions) = self.tracker.get_positions() {
                let mut overlay = frame.clone();
                renderer.draw_points(&mut overlay, &positions.xy());
                self.writer.write(path, &overlay)?;
                log::info!("Landmark overlay written to {}", path.display());
            }
        }

        Ok(outcome)
    }

    pub fn tracker(&self) -> &EyePatchTracker {
        &self.tracker
    }

    fn write_patch(
        &self,
        path: &Path,
        patch: &EyePatch,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let frame = Frame::new(
            patch.patch.clone(),
            patch.width,
            patch.height,
            patch.channels() as u8,
            0,
        );
        self.writer.write(path, &frame)?;
        log::info!(
            "Eye patch {}x{} at ({}, {}) written to {}",
            patch.width,
            patch.height,
            patch.imagex,
            patch.imagey,
            path.display()
        );
        Ok(())
    }
}
