use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use whisper_rs::{WhisperContext, WhisperContextParameters};

use crate::logging::init_whisper_logging;

/// Load a Whisper model and return an initialized `WhisperContext`.
///
/// Why this exists:
/// - We centralize model loading in one place so error handling and defaults stay consistent.
pub fn get_context(model_path: &Path) -> Result<WhisperContext> {
    // Whisper.cpp logs are very noisy; binaries fully control what gets printed.
    init_whisper_logging();

    let ctx_params = WhisperContextParameters::default();

    let ctx = WhisperContext::new_with_params(&model_path.to_string_lossy(), ctx_params)
        .with_context(|| format!("failed to load model from path: {}", model_path.display()))?;

    Ok(ctx)
}

/// Resolve a `--model` value to a ggml model file path.
///
/// Accepts either:
/// - a filesystem path to a ggml model, used as-is, or
/// - a model size name (`tiny`, `base`, `small`, `medium`, `large`, ...),
///   resolved to `models/ggml-<name>.bin` relative to the working directory.
pub fn resolve_model(spec: &str) -> PathBuf {
    let path = Path::new(spec);
    if path.is_file() {
        return path.to_path_buf();
    }

    Path::new("models").join(format!("ggml-{spec}.bin"))
}
