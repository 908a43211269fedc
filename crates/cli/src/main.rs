use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;

use eyepatch_core::detection::infrastructure::detector_config::{
    DetectorConfig, DEFAULT_BACKEND, DEFAULT_CONFIDENCE,
};
use eyepatch_core::detection::infrastructure::onnx_face_mesh_detector::OnnxFaceMeshDetectorFactory;
use eyepatch_core::extraction::domain::eye_patch::{EyePatch, EyePatchOutcome};
use eyepatch_core::media::infrastructure::image_file_reader::ImageFileReader;
use eyepatch_core::media::infrastructure::image_file_writer::ImageFileWriter;
use eyepatch_core::pipeline::extract_eye_patches_use_case::ExtractEyePatchesUseCase;
use eyepatch_core::pipeline::eye_patch_tracker::EyePatchTracker;
use eyepatch_core::rendering::domain::overlay_renderer::OverlayRenderer;
use eyepatch_core::rendering::infrastructure::dot_overlay_renderer::DotOverlayRenderer;
use eyepatch_core::shared::constants::IMAGE_EXTENSIONS;

/// Extract left and right eye patches from a face image.
#[derive(Parser)]
#[command(name = "eyepatch")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Directory left_eye.png and right_eye.png are written to.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Also write the input with all face landmarks drawn on it.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Inference backend: cpu, coreml or directml.
    #[arg(long, env = "EYEPATCH_BACKEND", default_value = DEFAULT_BACKEND)]
    backend: String,

    /// Directory searched first for model files.
    #[arg(long, env = "EYEPATCH_ASSET_DIR")]
    asset_dir: Option<PathBuf>,

    /// Base URL missing model files are downloaded from.
    #[arg(long, env = "EYEPATCH_MODEL_URL")]
    model_url: Option<String>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = DetectorConfig {
        backend: cli.backend,
        asset_dir: cli.asset_dir,
        model_base_url: cli.model_url,
        confidence: cli.confidence,
    };
    let factory =
        OnnxFaceMeshDetectorFactory::new(config).with_download_progress(download_progress);
    let renderer: Option<Box<dyn OverlayRenderer>> = cli
        .overlay
        .as_ref()
        .map(|_| Box::new(DotOverlayRenderer::default()) as Box<dyn OverlayRenderer>);

    let mut use_case = ExtractEyePatchesUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        EyePatchTracker::new(Box::new(factory)),
        renderer,
    );
    let result = use_case.execute(&cli.input, &cli.output_dir, cli.overlay.as_deref());
    finish_download_progress();
    let outcome = result?;

    match outcome {
        EyePatchOutcome::Success(patches) => {
            print_patch("left", &patches.left);
            print_patch("right", &patches.right);
            log::info!("Eye patches written to {}", cli.output_dir.display());
            Ok(())
        }
        EyePatchOutcome::NotReady => Err("Input image is empty".into()),
        EyePatchOutcome::NoFaceDetected => {
            Err(format!("No face detected in {}", cli.input.display()).into())
        }
        EyePatchOutcome::DegenerateBox => {
            Err("Face found but an eye region has zero width or height".into())
        }
    }
}

fn print_patch(label: &str, patch: &EyePatch) {
    println!(
        "{label}: x={} y={} width={} height={}",
        patch.imagex, patch.imagey, patch.width, patch.height
    );
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.input) {
        return Err(format!(
            "Unsupported input '{}', expected one of: {}",
            cli.input.display(),
            IMAGE_EXTENSIONS.join(", ")
        )
        .into());
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.output_dir.is_file() {
        return Err(format!(
            "Output directory is a file: {}",
            cli.output_dir.display()
        )
        .into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Set while a `\r` progress line is left open on stderr.
static PROGRESS_LINE_OPEN: AtomicBool = AtomicBool::new(false);

fn download_progress(downloaded: u64, total: u64) {
    PROGRESS_LINE_OPEN.store(true, Ordering::Relaxed);
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face model... {pct}%");
        if downloaded >= total {
            finish_download_progress();
        }
    } else {
        eprint!("\rDownloading face model... {downloaded} bytes");
    }
}

/// Ends an open progress line so later output starts on a fresh line.
/// Returns whether there was one.
fn finish_download_progress() -> bool {
    let open = PROGRESS_LINE_OPEN.swap(false, Ordering::Relaxed);
    if open {
        eprintln!();
    }
    open
}
