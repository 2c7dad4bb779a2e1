//! Audio extraction by shelling out to ffmpeg.
//!
//! This module isolates everything about the external decoder:
//! - locating the binary (explicit path, containing directory, or `PATH`)
//! - building the fixed command template from an [`FfmpegConfig`]
//! - running the command and translating failures into typed errors
//!
//! Argument construction is a pure function so tests can verify the exact
//! command without spawning anything.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;

/// The audio filter chain applied during extraction.
///
/// Band-passes to the speech range and applies EBU R128 loudness normalization,
/// which measurably improves recognition on quiet or uneven interview audio.
pub const NORMALIZE_FILTER: &str = "highpass=f=80,lowpass=f=8000,loudnorm=I=-16:LRA=11:TP=-1.5";

/// How ffmpeg should produce the extracted WAV.
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,

    /// Output channel count.
    pub channels: u16,

    /// Output audio codec.
    pub codec: String,

    /// Whether to overwrite an existing output file (`-y`).
    pub overwrite: bool,

    /// Optional `-af` filter chain; `None` disables filtering.
    pub normalize: Option<String>,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            // 16-bit PCM WAV, the format our WAV reader and whisper expect.
            codec: "pcm_s16le".to_owned(),
            overwrite: true,
            normalize: Some(NORMALIZE_FILTER.to_owned()),
        }
    }
}

/// Errors raised while locating or invoking ffmpeg.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The ffmpeg binary could not be found at the configured location or on `PATH`.
    #[error("ffmpeg not found; install it and ensure it is on PATH, or pass its location")]
    FfmpegNotFound,

    /// The input media file does not exist.
    #[error("input media not found: {0}")]
    InputMissing(PathBuf),

    /// ffmpeg ran and exited unsuccessfully.
    #[error("{}", failure_message(.status, .stdout, .stderr))]
    Failed {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },

    /// ffmpeg exited successfully but the expected output file is missing.
    #[error("ffmpeg reported success but output missing: {0}")]
    OutputMissing(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn failure_message(status: &ExitStatus, stdout: &str, stderr: &str) -> String {
    let mut msg = format!("ffmpeg failed to decode media ({status})");
    if !stderr.is_empty() {
        msg.push_str("\nffmpeg stderr:\n");
        msg.push_str(stderr);
    }
    if !stdout.is_empty() {
        msg.push_str("\nffmpeg stdout:\n");
        msg.push_str(stdout);
    }
    msg
}

fn binary_name() -> &'static str {
    if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" }
}

/// Resolve the ffmpeg binary to invoke.
///
/// `location` may be the binary itself or a directory containing it. When it is
/// `None` (or empty), we fall back to searching `PATH`. A missing binary is a
/// distinct error so callers can tell "ffmpeg isn't installed" apart from
/// "ffmpeg couldn't decode this file".
pub fn require_ffmpeg(location: Option<&Path>) -> Result<PathBuf, ExtractError> {
    let location = location.filter(|p| !p.as_os_str().is_empty());

    let Some(location) = location else {
        return search_path().ok_or(ExtractError::FfmpegNotFound);
    };

    let candidate = if location.is_dir() {
        location.join(binary_name())
    } else {
        location.to_path_buf()
    };

    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(ExtractError::FfmpegNotFound)
    }
}

fn search_path() -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(binary_name()))
        .find(|candidate| candidate.is_file())
}

/// Build the full ffmpeg argument vector for extracting `output` from `input`.
pub fn build_extract_args(input: &Path, output: &Path, config: &FfmpegConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-hide_banner".into(), "-loglevel".into(), "error".into()];

    if config.overwrite {
        args.push("-y".into());
    }

    args.push("-i".into());
    args.push(input.into());

    // Drop any video stream; we only want the audio track.
    args.push("-vn".into());

    args.push("-ac".into());
    args.push(config.channels.to_string().into());
    args.push("-ar".into());
    args.push(config.sample_rate.to_string().into());

    if let Some(filter) = &config.normalize {
        args.push("-af".into());
        args.push(filter.into());
    }

    args.push("-c:a".into());
    args.push(config.codec.as_str().into());

    args.push(output.into());
    args
}

/// Extract `input`'s audio track into `output` as a WAV, per `config`.
///
/// The parent directory of `output` is created when missing. The command runs
/// to completion with captured output; a non-zero exit is translated into
/// [`ExtractError::Failed`] carrying whatever ffmpeg wrote to stderr/stdout.
pub fn extract_wav(
    input: &Path,
    output: &Path,
    config: &FfmpegConfig,
    ffmpeg: &Path,
) -> Result<PathBuf, ExtractError> {
    if !input.is_file() {
        return Err(ExtractError::InputMissing(input.to_path_buf()));
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        "running ffmpeg extraction"
    );

    let result = Command::new(ffmpeg)
        .args(build_extract_args(input, output, config))
        .output()
        .map_err(|err| {
            // The binary can disappear between `require_ffmpeg` and the spawn.
            if err.kind() == std::io::ErrorKind::NotFound {
                ExtractError::FfmpegNotFound
            } else {
                ExtractError::Io(err)
            }
        })?;

    if !result.status.success() {
        return Err(ExtractError::Failed {
            status: result.status,
            stdout: String::from_utf8_lossy(&result.stdout).trim().to_owned(),
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_owned(),
        });
    }

    if !output.exists() {
        return Err(ExtractError::OutputMissing(output.to_path_buf()));
    }

    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_args_matches_command_template() {
        let config = FfmpegConfig::default();
        let args = build_extract_args(Path::new("in.mp4"), Path::new("out.wav"), &config);

        let expected: Vec<OsString> = [
            "-hide_banner",
            "-loglevel",
            "error",
            "-y",
            "-i",
            "in.mp4",
            "-vn",
            "-ac",
            "1",
            "-ar",
            "16000",
            "-af",
            NORMALIZE_FILTER,
            "-c:a",
            "pcm_s16le",
            "out.wav",
        ]
        .iter()
        .map(OsString::from)
        .collect();

        assert_eq!(args, expected);
    }

    #[test]
    fn build_args_without_overwrite_or_filter() {
        let config = FfmpegConfig {
            overwrite: false,
            normalize: None,
            ..FfmpegConfig::default()
        };
        let args = build_extract_args(Path::new("in.wav"), Path::new("out.wav"), &config);

        assert!(!args.contains(&OsString::from("-y")));
        assert!(!args.contains(&OsString::from("-af")));
    }

    #[test]
    fn require_ffmpeg_accepts_binary_or_directory() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let binary = dir.path().join(binary_name());
        fs::write(&binary, b"")?;

        assert_eq!(require_ffmpeg(Some(binary.as_path())).unwrap(), binary);
        assert_eq!(require_ffmpeg(Some(dir.path())).unwrap(), binary);
        Ok(())
    }

    #[test]
    fn require_ffmpeg_reports_missing_binary() {
        let err = require_ffmpeg(Some(Path::new("/definitely/not/here/ffmpeg"))).unwrap_err();
        assert!(matches!(err, ExtractError::FfmpegNotFound));
    }

    #[test]
    fn extract_rejects_missing_input() {
        let err = extract_wav(
            Path::new("/no/such/input.mp4"),
            Path::new("/tmp/out.wav"),
            &FfmpegConfig::default(),
            Path::new("ffmpeg"),
        )
        .unwrap_err();

        assert!(matches!(err, ExtractError::InputMissing(_)));
    }
}
