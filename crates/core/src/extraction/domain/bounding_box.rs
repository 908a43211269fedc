use thiserror::Error;

use crate::detection::domain::landmark::{LandmarkPoint, LandmarkSequence};
use crate::extraction::domain::eye_index_set::EyeIndexSet;

#[derive(Error, Debug, PartialEq)]
pub enum BoundingBoxError {
    #[error("{eye} eye needs landmark {index}, but only {len} landmarks were detected")]
    MissingLandmark {
        eye: &'static str,
        index: usize,
        len: usize,
    },
    #[error("{eye} eye has an empty {arc} arc")]
    EmptyArc {
        eye: &'static str,
        arc: &'static str,
    },
    #[error("{eye} eye has a non-finite landmark coordinate")]
    NonFinite { eye: &'static str },
    #[error("{eye} eye box does not fit in 32-bit pixel coordinates")]
    OutOfRange { eye: &'static str },
}

/// Integer-aligned eye rectangle in frame pixel coordinates.
///
/// `x`/`y` may be negative when the eye sits partly outside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    /// Top-left from the upper arc's minima, bottom-right from the lower
    /// arc's maxima, each rounded to whole pixels.
    ///
    /// Only the near corner comes from the upper arc; a lower-arc point
    /// left of or above it does not grow the box.
    pub fn from_landmarks(
        landmarks: &LandmarkSequence,
        eye: &EyeIndexSet,
    ) -> Result<Self, BoundingBoxError> {
        let upper = gather(landmarks, eye, eye.upper_arc(), "upper")?;
        let lower = gather(landmarks, eye, eye.lower_arc(), "lower")?;

        let x = to_pixel(fold(&upper, |p| p.x, f64::min), eye)?;
        let y = to_pixel(fold(&upper, |p| p.y, f64::min), eye)?;
        let far_x = to_pixel(fold(&lower, |p| p.x, f64::max), eye)?;
        let far_y = to_pixel(fold(&lower, |p| p.y, f64::max), eye)?;

        let extent = |near: i32, far: i32| {
            i32::try_from(i64::from(far) - i64::from(near))
                .map_err(|_| BoundingBoxError::OutOfRange { eye: eye.name() })
        };
        Ok(Self {
            x,
            y,
            width: extent(x, far_x)?,
            height: extent(y, far_y)?,
        })
    }

    /// Zero (or inverted) extent on either axis; no pixels can be read.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

fn gather<'a>(
    landmarks: &'a LandmarkSequence,
    eye: &EyeIndexSet,
    indices: &[usize],
    arc: &'static str,
) -> Result<Vec<&'a LandmarkPoint>, BoundingBoxError> {
    if indices.is_empty() {
        return Err(BoundingBoxError::EmptyArc {
            eye: eye.name(),
            arc,
        });
    }
    indices
        .iter()
        .map(|&index| {
            let point = landmarks
                .get(index)
                .ok_or(BoundingBoxError::MissingLandmark {
                    eye: eye.name(),
                    index,
                    len: landmarks.len(),
                })?;
            // f64::min/max skip NaN, so it has to be caught here.
            if !(point.x.is_finite() && point.y.is_finite()) {
                return Err(BoundingBoxError::NonFinite { eye: eye.name() });
            }
            Ok(point)
        })
        .collect()
}

fn fold(
    points: &[&LandmarkPoint],
    coord: impl Fn(&LandmarkPoint) -> f64,
    pick: fn(f64, f64) -> f64,
) -> f64 {
    points
        .iter()
        .map(|p| coord(p))
        .reduce(pick)
        .unwrap_or(f64::NAN)
}

fn to_pixel(v: f64, eye: &EyeIndexSet) -> Result<i32, BoundingBoxError> {
    let rounded = round_half_up(v);
    if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&rounded) {
        return Err(BoundingBoxError::OutOfRange { eye: eye.name() });
    }
    Ok(rounded as i32)
}

/// Rounds .5 toward positive infinity (-2.5 → -2, 2.5 → 3).
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::domain::eye_index_set::{LEFT_EYE, RIGHT_EYE};
    use crate::shared::constants::FACE_MESH_LANDMARK_COUNT;
    use rstest::rstest;

    const TINY_EYE: EyeIndexSet = EyeIndexSet::new("tiny", &[0, 1], &[2, 3]);

    fn sequence(points: &[(f64, f64)]) -> LandmarkSequence {
        LandmarkSequence::new(
            points
                .iter()
                .map(|&(x, y)| LandmarkPoint::new(x, y, 0.0))
                .collect(),
        )
    }

    #[test]
    fn test_origin_from_upper_arc_far_corner_from_lower_arc() {
        let seq = sequence(&[(10.2, 20.7), (14.0, 18.4), (30.6, 25.0), (28.0, 29.5)]);

        let bbox = BoundingBox::from_landmarks(&seq, &TINY_EYE).unwrap();

        // origin = (round 10.2, round 18.4) = (10, 18)
        // far    = (round 30.6, round 29.5) = (31, 30)
        assert_eq!(
            bbox,
            BoundingBox {
                x: 10,
                y: 18,
                width: 21,
                height: 12
            }
        );
    }

    #[test]
    fn test_lower_arc_points_do_not_move_origin() {
        // Lower-arc points sit above and left of the upper arc.
        let seq = sequence(&[(10.0, 10.0), (12.0, 11.0), (2.0, 3.0), (20.0, 25.0)]);

        let bbox = BoundingBox::from_landmarks(&seq, &TINY_EYE).unwrap();

        assert_eq!((bbox.x, bbox.y), (10, 10));
        assert_eq!((bbox.width, bbox.height), (10, 15));
    }

    #[test]
    fn test_upper_arc_points_do_not_move_far_corner() {
        let seq = sequence(&[(10.0, 10.0), (90.0, 90.0), (20.0, 20.0), (15.0, 18.0)]);

        let bbox = BoundingBox::from_landmarks(&seq, &TINY_EYE).unwrap();

        assert_eq!((bbox.width, bbox.height), (10, 10));
    }

    #[rstest]
    #[case::half_up(2.5, 3.0)]
    #[case::negative_half_up(-2.5, -2.0)]
    #[case::below_half(7.49, 7.0)]
    #[case::negative_below_half(-7.6, -8.0)]
    #[case::whole(4.0, 4.0)]
    fn test_round_half_up(#[case] v: f64, #[case] expected: f64) {
        assert_eq!(round_half_up(v), expected);
    }

    #[rstest]
    #[case::corner_beyond_i32(&[(-3e9, 0.0), (0.0, 0.0), (3e9, 5.0), (0.0, 5.0)])]
    #[case::extent_beyond_i32(&[(-2e9, 0.0), (0.0, 0.0), (2e9, 5.0), (0.0, 5.0)])]
    fn test_far_off_landmarks_are_out_of_range(#[case] points: &[(f64, f64)]) {
        let err = BoundingBox::from_landmarks(&sequence(points), &TINY_EYE).unwrap_err();

        assert_eq!(err, BoundingBoxError::OutOfRange { eye: "tiny" });
    }

    #[rstest]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    #[case::negative_infinite(f64::NEG_INFINITY)]
    fn test_non_finite_landmark_is_rejected(#[case] v: f64) {
        let seq = sequence(&[(1.0, 1.0), (2.0, v), (5.0, 5.0), (6.0, 6.0)]);

        let err = BoundingBox::from_landmarks(&seq, &TINY_EYE).unwrap_err();

        assert_eq!(err, BoundingBoxError::NonFinite { eye: "tiny" });
    }

    #[test]
    fn test_zero_width_is_degenerate() {
        let seq = sequence(&[(10.0, 10.0), (10.0, 12.0), (10.0, 20.0), (10.2, 22.0)]);

        let bbox = BoundingBox::from_landmarks(&seq, &TINY_EYE).unwrap();

        assert_eq!(bbox.width, 0);
        assert!(bbox.is_degenerate());
    }

    #[rstest]
    #[case::zero_height(BoundingBox { x: 0, y: 0, width: 5, height: 0 }, true)]
    #[case::negative_width(BoundingBox { x: 9, y: 0, width: -3, height: 5 }, true)]
    #[case::unit(BoundingBox { x: 0, y: 0, width: 1, height: 1 }, false)]
    fn test_is_degenerate(#[case] bbox: BoundingBox, #[case] expected: bool) {
        assert_eq!(bbox.is_degenerate(), expected);
    }

    #[test]
    fn test_missing_landmark_is_reported() {
        let seq = sequence(&[(1.0, 1.0), (2.0, 2.0)]);

        let err = BoundingBox::from_landmarks(&seq, &TINY_EYE).unwrap_err();

        assert_eq!(
            err,
            BoundingBoxError::MissingLandmark {
                eye: "tiny",
                index: 2,
                len: 2
            }
        );
    }

    #[test]
    fn test_empty_arc_is_reported() {
        const NO_LOWER: EyeIndexSet = EyeIndexSet::new("broken", &[0], &[]);
        let seq = sequence(&[(1.0, 1.0)]);

        let err = BoundingBox::from_landmarks(&seq, &NO_LOWER).unwrap_err();

        assert_eq!(
            err,
            BoundingBoxError::EmptyArc {
                eye: "broken",
                arc: "lower"
            }
        );
    }

    #[test]
    fn test_mesh_eyes_on_full_topology() {
        // Every vertex at (i, 2i): min/max follow the index extremes of each arc.
        let seq = sequence(
            &(0..FACE_MESH_LANDMARK_COUNT)
                .map(|i| (i as f64, 2.0 * i as f64))
                .collect::<Vec<_>>(),
        );

        let left = BoundingBox::from_landmarks(&seq, &LEFT_EYE).unwrap();
        let right = BoundingBox::from_landmarks(&seq, &RIGHT_EYE).unwrap();

        // left: upper min index 25, lower max index 243
        assert_eq!(
            left,
            BoundingBox {
                x: 25,
                y: 50,
                width: 218,
                height: 436
            }
        );
        // right: upper min index 255, lower max index 463
        assert_eq!(
            right,
            BoundingBox {
                x: 255,
                y: 510,
                width: 208,
                height: 416
            }
        );
    }
}
