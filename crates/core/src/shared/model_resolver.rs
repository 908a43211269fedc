use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("model {name} not found in asset directory or cache, and no download URL is configured")]
    NotFound { name: String },
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Resolve a model file by name.
///
/// Resolution order:
/// 1. Asset directory, when one is configured
/// 2. User cache directory (platform-specific)
/// 3. Download `{base_url}/{name}` into the cache, when a base URL is configured
pub fn resolve(
    name: &str,
    asset_dir: Option<&Path>,
    base_url: Option<&str>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cache_dir = model_cache_dir()?;
    resolve_in(name, asset_dir, &cache_dir, base_url, progress)
}

fn resolve_in(
    name: &str,
    asset_dir: Option<&Path>,
    cache_dir: &Path,
    base_url: Option<&str>,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(dir) = asset_dir {
        let asset_path = dir.join(name);
        if asset_path.exists() {
            log::debug!("Using model from asset directory: {}", asset_path.display());
            return Ok(asset_path);
        }
    }

    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        log::debug!("Using cached model: {}", cached_path.display());
        return Ok(cached_path);
    }

    let Some(base_url) = base_url else {
        return Err(ModelResolveError::NotFound {
            name: name.to_string(),
        });
    };
    let url = format!("{}/{}", base_url.trim_end_matches('/'), name);
    log::info!("Downloading {name} from {url}");
    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    download(&url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/EyePatch/models/`
/// - Linux: `$XDG_CACHE_HOME/EyePatch/models/` or `~/.cache/EyePatch/models/`
/// - Windows: `%LOCALAPPDATA%/EyePatch/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("EyePatch").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("EyePatch").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let temp_path = dest.with_extension("part");

    let result = download_inner(url, dest, &temp_path, progress);

    // Clean up .part file on any error
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn download_inner(
    url: &str,
    dest: &Path,
    temp_path: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), ModelResolveError> {
    let write_err = |path: &Path, source: std::io::Error| ModelResolveError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let mut file = fs::File::create(temp_path).map_err(|e| write_err(temp_path, e))?;

    // Face models are small, but stream anyway so progress is meaningful.
    let mut buf = vec![0u8; 256 * 1024];
    loop {
        let n = response
            .read(&mut buf)
            .map_err(|e| write_err(temp_path, e))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .map_err(|e| write_err(temp_path, e))?;
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(|e| write_err(temp_path, e))?;
    drop(file);

    fs::rename(temp_path, dest).map_err(|e| write_err(dest, e))?;

    Ok(())
}
