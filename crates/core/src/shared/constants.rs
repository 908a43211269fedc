pub const FACE_DETECTION_MODEL_NAME: &str = "blazeface_short_range.onnx";
pub const FACE_MESH_MODEL_NAME: &str = "face_landmark_468.onnx";

/// Points per face in the face-mesh topology the eye index tables refer to.
pub const FACE_MESH_LANDMARK_COUNT: usize = 468;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

pub const LEFT_EYE_FILENAME: &str = "left_eye.png";
pub const RIGHT_EYE_FILENAME: &str = "right_eye.png";
