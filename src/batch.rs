//! The batch pipeline: discover media files under a root directory and
//! transcribe them one at a time.
//!
//! Directory layout (all auto-created under the root):
//! - `interviews/`  — input media
//! - `transcripts/` — output text/subtitle files
//! - `audio/`       — extracted WAVs (only used with extraction enabled)
//!
//! Execution is fully sequential: each file is extracted (optionally) and
//! transcribed before the next one is touched, and every external invocation
//! blocks until completion. A failure on any file aborts the run.

use std::path::{Path, PathBuf};

use crate::Result;
use crate::extract::{self, FfmpegConfig};
use crate::media;
use crate::opts::Opts;
use crate::transcriber::Transcriber;

/// The input subdirectory we read media from.
pub const INPUT_SUBDIR: &str = "interviews";

/// The output subdirectory transcripts are written to.
pub const OUTPUT_SUBDIR: &str = "transcripts";

/// The subdirectory extracted audio is written to.
pub const AUDIO_SUBDIR: &str = "audio";

/// A validated batch run over one root directory.
///
/// Construction resolves and auto-creates the fixed directory layout and
/// verifies ffmpeg is reachable, so a `Batch` that exists can actually run —
/// we fail on setup problems before the (slow) model load.
pub struct Batch {
    input_dir: PathBuf,
    output_dir: PathBuf,
    audio_dir: PathBuf,
    ffmpeg: PathBuf,
    extract_audio: bool,
    config: FfmpegConfig,
}

impl Batch {
    /// Validate the directory layout under `root` and locate ffmpeg.
    ///
    /// `ffmpeg_location` may point at the binary or its containing directory;
    /// `None` falls back to a `PATH` search.
    pub fn new(root: &Path, ffmpeg_location: Option<&Path>, extract_audio: bool) -> Result<Self> {
        let root = media::validate_directory(root)?;
        let input_dir = media::validate_directory(root.join(INPUT_SUBDIR))?;
        let output_dir = media::validate_directory(root.join(OUTPUT_SUBDIR))?;
        let audio_dir = media::validate_directory(root.join(AUDIO_SUBDIR))?;

        // ffmpeg is checked even when extraction is off so a broken install
        // surfaces immediately instead of halfway through a batch.
        let ffmpeg = extract::require_ffmpeg(ffmpeg_location)?;

        Ok(Self {
            input_dir,
            output_dir,
            audio_dir,
            ffmpeg,
            extract_audio,
            config: FfmpegConfig::default(),
        })
    }

    /// The directory media files are discovered in.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// The directory transcripts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The resolved ffmpeg binary.
    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }

    /// Override the extraction config (sample rate, filter chain, ...).
    pub fn with_ffmpeg_config(mut self, config: FfmpegConfig) -> Self {
        self.config = config;
        self
    }

    /// Discover and transcribe every supported media file, sequentially.
    ///
    /// Files are processed in name order. With extraction enabled, each input
    /// is first normalized into `audio/<stem>.wav` and the WAV is transcribed;
    /// otherwise the media file is decoded in-process.
    pub fn run(&self, transcriber: &Transcriber, opts: &Opts) -> Result<()> {
        let files = media::discover_media_files(&self.input_dir)?;
        if files.is_empty() {
            println!("No supported media files found.");
            return Ok(());
        }

        for media_file in files {
            let name = media_file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| media_file.display().to_string());
            println!("Transcribing: {name}");

            if self.extract_audio {
                let wav_path = self.extract_one(&media_file)?;
                transcriber.transcribe_wav(&wav_path, &self.output_dir, opts)?;
            } else {
                transcriber.transcribe_media(&media_file, &self.output_dir, opts)?;
            }
        }

        Ok(())
    }

    /// Extract one input into `audio/<stem>.wav` and re-locate the result.
    ///
    /// The re-lookup is case-insensitive: on case-insensitive filesystems the
    /// on-disk name can differ from the one we asked ffmpeg to write.
    fn extract_one(&self, media_file: &Path) -> Result<PathBuf> {
        let stem = media_file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| {
                crate::Error::msg(format!(
                    "media path has no usable file name: {}",
                    media_file.display()
                ))
            })?;

        let wav_name = format!("{stem}.wav");
        let wav_path = self.audio_dir.join(&wav_name);

        extract::extract_wav(media_file, &wav_path, &self.config, &self.ffmpeg)?;

        media::find_media_file(&self.audio_dir, &wav_name)?.ok_or_else(|| {
            crate::Error::msg(format!(
                "extracted audio not found in {}: {wav_name}",
                self.audio_dir.display()
            ))
        })
    }
}
