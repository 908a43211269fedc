use crate::detection::domain::landmark::{FaceKeypoints, LandmarkSequence};
use crate::shared::frame::Frame;

/// Domain interface for face-landmark detection.
///
/// Returns every face found in the frame, each as its full keypoint list
/// in topology order. Implementations may keep per-frame state, hence
/// `&mut self`.
pub trait LandmarkDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceKeypoints>, Box<dyn std::error::Error>>;
}

/// Builds a [`LandmarkDetector`] from externally supplied configuration.
///
/// Construction is typically expensive (model loading), so callers create
/// the detector once and keep the handle.
pub trait DetectorFactory: Send {
    fn create(&self) -> Result<Box<dyn LandmarkDetector>, Box<dyn std::error::Error>>;
}

/// Runs detection and normalizes the first face into a [`LandmarkSequence`].
///
/// Returns `Ok(None)` when no face was found. Additional faces are ignored.
pub fn first_face_landmarks(
    detector: &mut dyn LandmarkDetector,
    frame: &Frame,
) -> Result<Option<LandmarkSequence>, Box<dyn std::error::Error>> {
    let faces = detector.detect(frame)?;
    if faces.len() > 1 {
        log::debug!("{} faces detected, using the first", faces.len());
    }
    Ok(faces
        .first()
        .map(|keypoints| LandmarkSequence::from_keypoints(keypoints)))
}
