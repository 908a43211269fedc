use crate::shared::frame::Frame;

/// Domain interface for drawing landmark markers onto a frame.
///
/// Implementations modify the frame in-place and keep no state between calls.
pub trait OverlayRenderer: Send {
    fn draw_points(&self, frame: &mut Frame, points: &[(f64, f64)]);
}
