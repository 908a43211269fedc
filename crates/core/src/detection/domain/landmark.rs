//! Face-mesh landmarks as emitted by a detector and as consumed by geometry code.
//!
//! Detectors report loosely shaped [`Keypoint`]s (depth and name are optional).
//! Everything downstream works on [`LandmarkSequence`], where depth has
//! already been defaulted and a point's identity is its index.

/// A keypoint as reported by a landmark detector, in frame pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Keypoint {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub name: Option<String>,
}

impl Keypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            name: None,
        }
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// All keypoints of one detected face, in topology order.
pub type FaceKeypoints = Vec<Keypoint>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
    /// 0.0 when the detector did not report depth.
    pub z: f64,
}

impl LandmarkPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<&Keypoint> for LandmarkPoint {
    fn from(kp: &Keypoint) -> Self {
        Self {
            x: kp.x,
            y: kp.y,
            z: kp.z.unwrap_or(0.0),
        }
    }
}

/// Ordered landmarks of a single face; index `i` is mesh vertex `i`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkSequence {
    points: Vec<LandmarkPoint>,
}

impl LandmarkSequence {
    pub fn new(points: Vec<LandmarkPoint>) -> Self {
        Self { points }
    }

    pub fn from_keypoints(keypoints: &[Keypoint]) -> Self {
        Self {
            points: keypoints.iter().map(LandmarkPoint::from).collect(),
        }
    }

    pub fn points(&self) -> &[LandmarkPoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&LandmarkPoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Image-plane projection, e.g. for overlay drawing.
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.x, p.y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_depth_defaults_to_zero() {
        let point = LandmarkPoint::from(&Keypoint::new(12.5, 40.0));
        assert_relative_eq!(point.z, 0.0);
    }

    #[test]
    fn test_reported_depth_is_kept() {
        let point = LandmarkPoint::from(&Keypoint::new(1.0, 2.0).with_z(-3.5));
        assert_eq!(point, LandmarkPoint::new(1.0, 2.0, -3.5));
    }

    #[test]
    fn test_name_does_not_affect_conversion() {
        let named = Keypoint::new(5.0, 6.0).with_name("leftEyeUpper0");
        let anonymous = Keypoint::new(5.0, 6.0);
        assert_eq!(LandmarkPoint::from(&named), LandmarkPoint::from(&anonymous));
    }

    #[test]
    fn test_from_keypoints_preserves_order() {
        let keypoints = vec![
            Keypoint::new(0.0, 0.0),
            Keypoint::new(1.0, 10.0).with_z(2.0),
            Keypoint::new(2.0, 20.0),
        ];
        let seq = LandmarkSequence::from_keypoints(&keypoints);

        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(1), Some(&LandmarkPoint::new(1.0, 10.0, 2.0)));
        assert_eq!(seq.xy(), vec![(0.0, 0.0), (1.0, 10.0), (2.0, 20.0)]);
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let seq = LandmarkSequence::from_keypoints(&[Keypoint::new(1.0, 1.0)]);
        assert!(seq.get(1).is_none());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(LandmarkSequence::default().is_empty());
    }
}
