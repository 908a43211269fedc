use std::path::PathBuf;

/// Default face-box confidence threshold.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

pub const DEFAULT_BACKEND: &str = "cpu";

/// Settings the landmark detector is built from.
///
/// `backend` and the paths are passed through untouched to the inference
/// runtime and model resolver; nothing upstream interprets them.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Execution backend name, e.g. `cpu`, `coreml`, `directml`.
    pub backend: String,
    /// Directory searched first for model files.
    pub asset_dir: Option<PathBuf>,
    /// Base URL missing models are downloaded from; no download when unset.
    pub model_base_url: Option<String>,
    pub confidence: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND.to_string(),
            asset_dir: None,
            model_base_url: None,
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}
