//! BlazeFace short-range face boxes, the first stage of face-mesh detection.
//!
//! Only boxes are produced here; the mesh stage crops around each box.
use crate::shared::frame::Frame;

/// BlazeFace model input resolution.
const INPUT_SIZE: u32 = 128;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.3;

/// Number of BlazeFace anchors (short-range model).
const NUM_ANCHORS: usize = 896;

/// Values per anchor in the regressor output (box + 6 keypoints).
const REGRESSOR_STRIDE: usize = 16;

/// Face box in frame pixels. Not clamped to the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub score: f64,
}

impl FaceBox {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    fn iou(&self, other: &FaceBox) -> f64 {
        let ix = (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0);
        let iy = (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0);
        let inter = ix * iy;
        if inter == 0.0 {
            return 0.0;
        }
        let union = self.width() * self.height() + other.width() * other.height() - inter;
        inter / union
    }
}

pub struct BlazefaceBoxDetector {
    session: ort::session::Session,
    confidence: f64,
    anchors: Vec<[f32; 2]>,
}

impl BlazefaceBoxDetector {
    pub fn new(session: ort::session::Session, confidence: f64) -> Self {
        Self {
            session,
            confidence,
            anchors: generate_anchors(),
        }
    }

    /// Face boxes sorted by descending score, overlaps suppressed.
    pub fn detect_boxes(
        &mut self,
        frame: &Frame,
    ) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
        let fw = frame.width() as f32;
        let fh = frame.height() as f32;

        let input_tensor = preprocess(frame, INPUT_SIZE);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        // regressors: [1, 896, 16], classificators: [1, 896, 1]
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }
        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;

        let candidates = decode(
            &self.anchors,
            reg_data,
            score_data,
            self.confidence as f32,
            (fw, fh),
        );
        Ok(suppress_overlaps(candidates, NMS_IOU_THRESH))
    }
}

/// Anchor-relative regressions to frame-pixel boxes above `confidence`.
fn decode(
    anchors: &[[f32; 2]],
    reg_data: &[f32],
    score_data: &[f32],
    confidence: f32,
    (fw, fh): (f32, f32),
) -> Vec<FaceBox> {
    let size = INPUT_SIZE as f32;
    score_data
        .iter()
        .zip(anchors)
        .enumerate()
        .filter_map(|(i, (&raw_score, anchor))| {
            let score = sigmoid(raw_score);
            let reg = reg_data.get(i * REGRESSOR_STRIDE..i * REGRESSOR_STRIDE + 4)?;
            if score < confidence {
                return None;
            }
            let cx = anchor[0] + reg[0] / size;
            let cy = anchor[1] + reg[1] / size;
            let w = reg[2] / size;
            let h = reg[3] / size;
            Some(FaceBox {
                x1: ((cx - w / 2.0) * fw) as f64,
                y1: ((cy - h / 2.0) * fh) as f64,
                x2: ((cx + w / 2.0) * fw) as f64,
                y2: ((cy + h / 2.0) * fh) as f64,
                score: score as f64,
            })
        })
        .collect()
}

fn suppress_overlaps(mut boxes: Vec<FaceBox>, iou_thresh: f64) -> Vec<FaceBox> {
    boxes.sort_by(|a, b| b.score.total_cmp(&a.score));
    let mut kept: Vec<FaceBox> = Vec::with_capacity(boxes.len());
    for candidate in boxes {
        if kept.iter().all(|k| k.iou(&candidate) <= iou_thresh) {
            kept.push(candidate);
        }
    }
    kept
}

/// Resize frame to `size × size` and normalize to [0,1] NCHW float32.
fn preprocess(frame: &Frame, size: u32) -> ndarray::Array4<f32> {
    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let last_channel = frame.channels().max(1) as usize - 1;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));
    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[src_y, src_x, c.min(last_channel)]] as f32 / 255.0;
            }
        }
    }
    tensor
}

/// Short-range anchors: a 16×16 grid with 2 anchors per cell, then an
/// 8×8 grid with 6.
fn generate_anchors() -> Vec<[f32; 2]> {
    let layers = [(8usize, 2usize), (16, 6)]; // (stride, anchors_per_cell)
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);
    for (stride, per_cell) in layers {
        let grid = INPUT_SIZE as usize / stride;
        for y in 0..grid {
            for x in 0..grid {
                let center = [
                    (x as f32 + 0.5) / grid as f32,
                    (y as f32 + 0.5) / grid as f32,
                ];
                anchors.extend(std::iter::repeat(center).take(per_cell));
            }
        }
    }
    anchors
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
