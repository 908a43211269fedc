use thiserror::Error;

use crate::detection::domain::landmark::LandmarkSequence;
use crate::detection::domain::landmark_detector::{
    first_face_landmarks, DetectorFactory, LandmarkDetector,
};
use crate::extraction::domain::bounding_box::{BoundingBox, BoundingBoxError};
use crate::extraction::domain::eye_index_set::{LEFT_EYE, RIGHT_EYE};
use crate::extraction::domain::eye_patch::{EyePatch, EyePatchOutcome, EyePatches};
use crate::shared::frame::{Frame, PixelBuffer};

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("failed to construct landmark detector: {0}")]
    DetectorInit(Box<dyn std::error::Error>),
    #[error("landmark detection failed: {0}")]
    Detection(Box<dyn std::error::Error>),
    #[error(transparent)]
    Geometry(#[from] BoundingBoxError),
    #[error("reset is not supported: the landmark detector has no reset primitive")]
    ResetUnsupported,
}

enum DetectorHandle {
    Pending(Box<dyn DetectorFactory>),
    Ready(Box<dyn LandmarkDetector>),
}

/// Turns frames into left/right eye patches and remembers the landmarks
/// behind the most recent detection.
///
/// The detector is built lazily on first use (or supplied ready-made) and
/// owned for the tracker's lifetime. Every operation takes `&mut self`, so
/// calls on one tracker are serialized.
pub struct EyePatchTracker {
    detector: DetectorHandle,
    positions: Option<LandmarkSequence>,
    ready: bool,
}

impl EyePatchTracker {
    /// Detector is constructed by `factory` on the first [`initialize`](Self::initialize).
    pub fn new(factory: Box<dyn DetectorFactory>) -> Self {
        Self {
            detector: DetectorHandle::Pending(factory),
            positions: None,
            ready: false,
        }
    }

    pub fn with_detector(detector: Box<dyn LandmarkDetector>) -> Self {
        Self {
            detector: DetectorHandle::Ready(detector),
            positions: None,
            ready: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.detector, DetectorHandle::Ready(_))
    }

    /// True once a patch pair has been produced.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Builds the detector if needed and returns it.
    ///
    /// Idempotent: once built, the same detector is returned on every call.
    /// A failed construction leaves the tracker uninitialized.
    pub fn initialize(&mut self) -> Result<&mut dyn LandmarkDetector, TrackerError> {
        if let DetectorHandle::Pending(factory) = &self.detector {
            log::info!("Constructing landmark detector");
            let detector = factory.create().map_err(TrackerError::DetectorInit)?;
            self.detector = DetectorHandle::Ready(detector);
        }
        match &mut self.detector {
            DetectorHandle::Ready(detector) => Ok(detector.as_mut()),
            DetectorHandle::Pending(_) => Err(TrackerError::DetectorInit(
                "detector construction did not complete".into(),
            )),
        }
    }

    /// Detects landmarks in `frame` and cuts both eye patches out of it.
    pub fn get_eye_patches(&mut self, frame: &Frame) -> Result<EyePatchOutcome, TrackerError> {
        self.get_eye_patches_from(frame, frame)
    }

    /// Like [`get_eye_patches`](Self::get_eye_patches), but reads pixels
    /// from `canvas` instead of the frame given to the detector.
    ///
    /// `canvas` must share the frame's coordinate system.
    pub fn get_eye_patches_from(
        &mut self,
        frame: &Frame,
        canvas: &dyn PixelBuffer,
    ) -> Result<EyePatchOutcome, TrackerError> {
        if canvas.width() == 0 {
            log::debug!("Canvas has zero width, skipping detection");
            return Ok(EyePatchOutcome::NotReady);
        }

        let detector = self.initialize()?;
        let landmarks = match first_face_landmarks(detector, frame)
            .map_err(TrackerError::Detection)?
        {
            Some(landmarks) => landmarks,
            None => {
                log::debug!("No face detected in frame {}", frame.index());
                return Ok(EyePatchOutcome::NoFaceDetected);
            }
        };

        // Cached before any geometry so a bad box still leaves positions readable.
        let landmarks = self.positions.insert(landmarks);

        let left = BoundingBox::from_landmarks(landmarks, &LEFT_EYE)?;
        let right = BoundingBox::from_landmarks(landmarks, &RIGHT_EYE)?;
        if left.is_degenerate() || right.is_degenerate() {
            log::debug!("Degenerate eye box: left={left:?} right={right:?}");
            return Ok(EyePatchOutcome::DegenerateBox);
        }

        let patches = EyePatches {
            left: EyePatch::extract(canvas, &left),
            right: EyePatch::extract(canvas, &right),
        };
        self.ready = true;
        Ok(EyePatchOutcome::Success(patches))
    }

    /// Landmarks from the last successful detection, if any.
    pub fn get_positions(&self) -> Option<&LandmarkSequence> {
        self.positions.as_ref()
    }

    /// Always fails: the detector cannot be reset. Cached positions and the
    /// detector are left as they are.
    pub fn reset(&mut self) -> Result<(), TrackerError> {
        log::warn!("EyePatchTracker::reset is not supported; state left unchanged");
        Err(TrackerError::ResetUnsupported)
    }
}
