//! 468-point face mesh detector using ONNX Runtime via `ort`.
//!
//! Two stages: BlazeFace finds face boxes, then the face-landmark model runs
//! on a square crop around each box and its vertices are mapped back to
//! frame pixels.
use std::path::{Path, PathBuf};

use crate::detection::domain::landmark::{FaceKeypoints, Keypoint};
use crate::detection::domain::landmark_detector::{DetectorFactory, LandmarkDetector};
use crate::shared::constants::{
    FACE_DETECTION_MODEL_NAME, FACE_MESH_LANDMARK_COUNT, FACE_MESH_MODEL_NAME,
};
use crate::shared::frame::Frame;
use crate::shared::model_resolver;

use super::blazeface_box_detector::{BlazefaceBoxDetector, FaceBox};
use super::detector_config::DetectorConfig;
use super::execution_provider::execution_providers_for;

/// Fallback mesh input resolution when the model shape is dynamic.
const DEFAULT_MESH_INPUT_SIZE: u32 = 192;

/// Face box is enlarged by this factor before cropping, so the mesh sees
/// the whole head outline.
const ROI_SCALE: f64 = 1.5;

/// Minimum face-presence probability for a mesh to be reported.
const PRESENCE_THRESH: f32 = 0.5;

const MESH_VALUES: usize = FACE_MESH_LANDMARK_COUNT * 3;

#[derive(Clone, Copy, Debug, PartialEq)]
enum TensorLayout {
    Nchw,
    Nhwc,
}

/// Square crop in frame pixels; may extend past the frame edges.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Roi {
    x: f64,
    y: f64,
    size: f64,
}

impl Roi {
    fn around(face: &FaceBox) -> Self {
        let (cx, cy) = face.center();
        let size = face.width().max(face.height()) * ROI_SCALE;
        Self {
            x: cx - size / 2.0,
            y: cy - size / 2.0,
            size,
        }
    }
}

pub struct OnnxFaceMeshDetector {
    boxes: BlazefaceBoxDetector,
    mesh: ort::session::Session,
    mesh_input_size: u32,
    mesh_layout: TensorLayout,
}

impl OnnxFaceMeshDetector {
    /// Load both models and prepare for inference.
    pub fn new(
        face_model_path: &Path,
        mesh_model_path: &Path,
        config: &DetectorConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let face_session = build_session(face_model_path, &config.backend)?;
        let mesh = build_session(mesh_model_path, &config.backend)?;
        let (mesh_input_size, mesh_layout) = mesh_input_shape(&mesh);
        log::debug!("Face mesh input: {mesh_input_size}px, {mesh_layout:?}");

        Ok(Self {
            boxes: BlazefaceBoxDetector::new(face_session, config.confidence),
            mesh,
            mesh_input_size,
            mesh_layout,
        })
    }

    fn run_mesh(
        &mut self,
        frame: &Frame,
        roi: Roi,
    ) -> Result<Option<FaceKeypoints>, Box<dyn std::error::Error>> {
        let input = crop_to_tensor(frame, roi, self.mesh_input_size, self.mesh_layout);
        let input_value = ort::value::Tensor::from_array(input)?;
        let outputs = self.mesh.run(ort::inputs![input_value])?;

        // The vertex tensor is identified by size; a single-value output,
        // when present, is the face-presence logit.
        let mut vertices = None;
        let mut presence = None;
        for i in 0..outputs.len() {
            let array = outputs[i].try_extract_array::<f32>()?;
            if array.len() == MESH_VALUES {
                vertices = Some(array.iter().copied().collect::<Vec<f32>>());
            } else if array.len() == 1 {
                presence = array.iter().next().copied();
            }
        }

        let vertices = vertices.ok_or_else(|| {
            format!("Face mesh model produced no output with {MESH_VALUES} values")
        })?;
        if let Some(logit) = presence {
            if sigmoid(logit) < PRESENCE_THRESH {
                return Ok(None);
            }
        }
        Ok(Some(to_keypoints(&vertices, roi, self.mesh_input_size)))
    }
}

impl LandmarkDetector for OnnxFaceMeshDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceKeypoints>, Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }

        let boxes = self.boxes.detect_boxes(frame)?;
        let mut faces = Vec::with_capacity(boxes.len());
        for face in &boxes {
            if let Some(keypoints) = self.run_mesh(frame, Roi::around(face))? {
                faces.push(keypoints);
            }
        }
        log::debug!(
            "Frame {}: {} face boxes, {} meshes",
            frame.index(),
            boxes.len(),
            faces.len()
        );
        Ok(faces)
    }
}

/// Builds [`OnnxFaceMeshDetector`]s from a [`DetectorConfig`], resolving
/// model files on demand.
pub struct OnnxFaceMeshDetectorFactory {
    config: DetectorConfig,
    progress: Option<fn(u64, u64)>,
}

impl OnnxFaceMeshDetectorFactory {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// Reports `(downloaded, total)` bytes while a model is fetched.
    pub fn with_download_progress(mut self, progress: fn(u64, u64)) -> Self {
        self.progress = Some(progress);
        self
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, model_resolver::ModelResolveError> {
        let progress = self
            .progress
            .map(|f| Box::new(f) as model_resolver::ProgressFn);
        model_resolver::resolve(
            name,
            self.config.asset_dir.as_deref(),
            self.config.model_base_url.as_deref(),
            progress,
        )
    }
}

impl DetectorFactory for OnnxFaceMeshDetectorFactory {
    fn create(&self) -> Result<Box<dyn LandmarkDetector>, Box<dyn std::error::Error>> {
        let face_model = self.resolve(FACE_DETECTION_MODEL_NAME)?;
        let mesh_model = self.resolve(FACE_MESH_MODEL_NAME)?;
        log::info!(
            "Loading face models {} and {} (backend: {})",
            face_model.display(),
            mesh_model.display(),
            self.config.backend
        );
        Ok(Box::new(OnnxFaceMeshDetector::new(
            &face_model,
            &mesh_model,
            &self.config,
        )?))
    }
}

fn build_session(
    model_path: &Path,
    backend: &str,
) -> Result<ort::session::Session, Box<dyn std::error::Error>> {
    let session = ort::session::Session::builder()?
        .with_execution_providers(execution_providers_for(backend))?
        .commit_from_file(model_path)?;
    Ok(session)
}

/// Reads square input size and channel layout from the model's first input.
fn mesh_input_shape(session: &ort::session::Session) -> (u32, TensorLayout) {
    session
        .inputs()
        .first()
        .and_then(|input| {
            if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                if shape.len() < 4 {
                    return None;
                }
                if shape[1] == 3 && shape[2] > 0 {
                    Some((shape[2] as u32, TensorLayout::Nchw))
                } else if shape[3] == 3 && shape[1] > 0 {
                    Some((shape[1] as u32, TensorLayout::Nhwc))
                } else {
                    None
                }
            } else {
                None
            }
        })
        .unwrap_or((DEFAULT_MESH_INPUT_SIZE, TensorLayout::Nhwc))
}

/// Nearest-neighbour crop of `roi` resized to `size × size`, normalized to
/// [0,1]. Samples outside the frame are black.
fn crop_to_tensor(
    frame: &Frame,
    roi: Roi,
    size: u32,
    layout: TensorLayout,
) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let (fw, fh) = (frame.width() as f64, frame.height() as f64);
    let last_channel = frame.channels().max(1) as usize - 1;
    let s = size as usize;
    let step = roi.size / size as f64;

    let mut tensor = match layout {
        TensorLayout::Nchw => ndarray::Array4::<f32>::zeros((1, 3, s, s)),
        TensorLayout::Nhwc => ndarray::Array4::<f32>::zeros((1, s, s, 3)),
    };
    for y in 0..s {
        let src_y = (roi.y + (y as f64 + 0.5) * step).floor();
        if src_y < 0.0 || src_y >= fh {
            continue;
        }
        for x in 0..s {
            let src_x = (roi.x + (x as f64 + 0.5) * step).floor();
            if src_x < 0.0 || src_x >= fw {
                continue;
            }
            for c in 0..3 {
                let v =
                    src[[src_y as usize, src_x as usize, c.min(last_channel)]] as f32 / 255.0;
                match layout {
                    TensorLayout::Nchw => tensor[[0, c, y, x]] = v,
                    TensorLayout::Nhwc => tensor[[0, y, x, c]] = v,
                }
            }
        }
    }
    tensor
}

/// Mesh vertices in crop-input pixels to frame-pixel keypoints.
///
/// Depth is scaled like x so it stays in the same units.
fn to_keypoints(vertices: &[f32], roi: Roi, input_size: u32) -> FaceKeypoints {
    let scale = roi.size / input_size as f64;
    vertices
        .chunks_exact(3)
        .map(|v| {
            Keypoint::new(
                roi.x + v[0] as f64 * scale,
                roi.y + v[1] as f64 * scale,
            )
            .with_z(v[2] as f64 * scale)
        })
        .collect()
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
