use crate::extraction::domain::bounding_box::BoundingBox;
use crate::shared::frame::{PixelBuffer, RGBA_CHANNELS};

/// RGBA pixels of one eye plus where they came from in the frame.
#[derive(Clone, Debug, PartialEq)]
pub struct EyePatch {
    /// Row-major RGBA, `width * height * 4` bytes.
    pub patch: Vec<u8>,
    pub imagex: i32,
    pub imagey: i32,
    pub width: u32,
    pub height: u32,
}

impl EyePatch {
    /// Reads the box's pixels from `buffer`.
    ///
    /// The box must not be degenerate; callers check
    /// [`BoundingBox::is_degenerate`] first.
    pub fn extract(buffer: &dyn PixelBuffer, bbox: &BoundingBox) -> Self {
        debug_assert!(!bbox.is_degenerate(), "cannot extract a degenerate box");
        let width = bbox.width.max(0) as u32;
        let height = bbox.height.max(0) as u32;
        Self {
            patch: buffer.read_rgba(bbox.x, bbox.y, width, height),
            imagex: bbox.x,
            imagey: bbox.y,
            width,
            height,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            x: self.imagex,
            y: self.imagey,
            width: self.width as i32,
            height: self.height as i32,
        }
    }

    pub fn channels(&self) -> usize {
        RGBA_CHANNELS
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EyePatches {
    pub left: EyePatch,
    pub right: EyePatch,
}

/// Result of one extraction attempt.
///
/// `NotReady` and `DegenerateBox` both mean "nothing usable this frame,
/// try again"; `NoFaceDetected` means the detector ran and saw no one.
#[derive(Clone, Debug, PartialEq)]
pub enum EyePatchOutcome {
    /// The pixel buffer has no width yet; detection was skipped.
    NotReady,
    NoFaceDetected,
    /// A face was found but an eye box has zero width or height.
    DegenerateBox,
    Success(EyePatches),
}

impl EyePatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The two outcomes that carry no detection verdict.
    pub fn is_not_ready_or_degenerate(&self) -> bool {
        matches!(self, Self::NotReady | Self::DegenerateBox)
    }

    pub fn is_no_face(&self) -> bool {
        matches!(self, Self::NoFaceDetected)
    }

    pub fn into_patches(self) -> Option<EyePatches> {
        match self {
            Self::Success(patches) => Some(patches),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;
    use rstest::rstest;

    fn solid_frame(w: u32, h: u32) -> Frame {
        Frame::new(vec![200; (w * h * 3) as usize], w, h, 3, 0)
    }

    #[test]
    fn test_extract_copies_metadata_from_box() {
        let bbox = BoundingBox {
            x: 3,
            y: 4,
            width: 5,
            height: 2,
        };

        let patch = EyePatch::extract(&solid_frame(20, 20), &bbox);

        assert_eq!((patch.imagex, patch.imagey), (3, 4));
        assert_eq!((patch.width, patch.height), (5, 2));
        assert_eq!(patch.channels(), 4);
        assert_eq!(patch.patch.len(), 5 * 2 * patch.channels());
        assert_eq!(patch.bounding_box(), bbox);
    }

    #[test]
    fn test_extract_reads_frame_pixels() {
        let bbox = BoundingBox {
            x: 0,
            y: 0,
            width: 2,
            height: 1,
        };

        let patch = EyePatch::extract(&solid_frame(4, 4), &bbox);

        assert_eq!(patch.patch, vec![200, 200, 200, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn test_extract_partially_outside_frame_pads_with_zero() {
        let bbox = BoundingBox {
            x: 3,
            y: 0,
            width: 2,
            height: 1,
        };

        let patch = EyePatch::extract(&solid_frame(4, 4), &bbox);

        assert_eq!(&patch.patch[..4], &[200, 200, 200, 255]);
        assert_eq!(&patch.patch[4..], &[0, 0, 0, 0]);
    }

    fn dummy_patches() -> EyePatches {
        let patch = EyePatch {
            patch: vec![0; 4],
            imagex: 0,
            imagey: 0,
            width: 1,
            height: 1,
        };
        EyePatches {
            left: patch.clone(),
            right: patch,
        }
    }

    #[rstest]
    #[case::not_ready(EyePatchOutcome::NotReady, true, false)]
    #[case::degenerate(EyePatchOutcome::DegenerateBox, true, false)]
    #[case::no_face(EyePatchOutcome::NoFaceDetected, false, true)]
    #[case::success(EyePatchOutcome::Success(dummy_patches()), false, false)]
    fn test_outcome_classification(
        #[case] outcome: EyePatchOutcome,
        #[case] not_ready_or_degenerate: bool,
        #[case] no_face: bool,
    ) {
        assert_eq!(outcome.is_not_ready_or_degenerate(), not_ready_or_degenerate);
        assert_eq!(outcome.is_no_face(), no_face);
    }

    #[test]
    fn test_into_patches_only_on_success() {
        assert!(EyePatchOutcome::NotReady.into_patches().is_none());
        assert!(EyePatchOutcome::DegenerateBox.into_patches().is_none());
        assert!(EyePatchOutcome::NoFaceDetected.into_patches().is_none());
        assert_eq!(
            EyePatchOutcome::Success(dummy_patches()).into_patches(),
            Some(dummy_patches())
        );
    }
}
