pub mod blazeface_box_detector;
pub mod detector_config;
pub mod execution_provider;
pub mod onnx_face_mesh_detector;
