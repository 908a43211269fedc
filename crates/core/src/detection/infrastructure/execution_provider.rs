use ort::execution_providers::ExecutionProviderDispatch;

/// Map a backend name to ONNX execution providers.
///
/// An empty list means ONNX Runtime's built-in CPU provider. Names the
/// current platform cannot serve fall back to CPU.
pub fn execution_providers_for(backend: &str) -> Vec<ExecutionProviderDispatch> {
    match backend.to_ascii_lowercase().as_str() {
        "cpu" | "" => vec![],
        "coreml" => coreml(),
        "directml" => directml(),
        other => {
            log::warn!("Unknown detector backend '{other}', using CPU");
            vec![]
        }
    }
}

#[cfg(target_os = "macos")]
fn coreml() -> Vec<ExecutionProviderDispatch> {
    vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
}

#[cfg(not(target_os = "macos"))]
fn coreml() -> Vec<ExecutionProviderDispatch> {
    log::warn!("CoreML backend is only available on macOS, using CPU");
    vec![]
}

#[cfg(target_os = "windows")]
fn directml() -> Vec<ExecutionProviderDispatch> {
    vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
}

#[cfg(not(target_os = "windows"))]
fn directml() -> Vec<ExecutionProviderDispatch> {
    log::warn!("DirectML backend is only available on Windows, using CPU");
    vec![]
}
