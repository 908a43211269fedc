pub mod landmark;
pub mod landmark_detector;
