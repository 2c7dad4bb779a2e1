//! High-level per-file transcription.
//!
//! `Transcriber` owns the loaded Whisper model (expensive to load, cheap to
//! reuse) and turns one media file into one output file per requested format.
//!
//! The flow per file is: decode → whisper → encode. Decoding happens either
//! from an extracted 16 kHz WAV (the fast, strict path) or straight from the
//! original media via the in-process Symphonia pipeline.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use whisper_rs::WhisperContext;

use crate::Result;
use crate::ctx::get_context;
use crate::decode::decode_media_to_samples;
use crate::json_array_encoder::JsonArrayEncoder;
use crate::opts::Opts;
use crate::output_type::OutputType;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::{Segment, collect_segments};
use crate::srt_encoder::SrtEncoder;
use crate::txt_encoder::TxtEncoder;
use crate::vtt_encoder::VttEncoder;
use crate::wav::get_samples_from_wav;

/// The main per-file transcription entry point.
///
/// Typical usage:
/// - Construct once (model loading happens here).
/// - Call `transcribe_wav` / `transcribe_media` for each input.
pub struct Transcriber {
    ctx: WhisperContext,
}

impl Transcriber {
    /// Load the Whisper model at `model_path` and return a ready transcriber.
    pub fn new(model_path: &Path) -> Result<Self> {
        let ctx = get_context(model_path)?;
        Ok(Self { ctx })
    }

    /// Access the underlying Whisper context.
    ///
    /// This is primarily intended for advanced or experimental use-cases.
    pub fn context(&self) -> &WhisperContext {
        &self.ctx
    }

    /// Transcribe an extracted 16 kHz mono WAV.
    pub fn transcribe_wav(&self, wav_path: &Path, output_dir: &Path, opts: &Opts) -> Result<()> {
        let samples = get_samples_from_wav(wav_path)?;
        self.write_outputs(&samples, &file_stem(wav_path)?, output_dir, opts)
    }

    /// Transcribe a media file directly, decoding it in-process.
    pub fn transcribe_media(&self, media_path: &Path, output_dir: &Path, opts: &Opts) -> Result<()> {
        let samples = decode_media_to_samples(media_path)?;
        self.write_outputs(&samples, &file_stem(media_path)?, output_dir, opts)
    }

    /// Run whisper over `samples` and write `<stem>.<ext>` into `output_dir`
    /// for every requested output format.
    pub fn write_outputs(
        &self,
        samples: &[f32],
        stem: &str,
        output_dir: &Path,
        opts: &Opts,
    ) -> Result<()> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

        let segments = collect_segments(&self.ctx, opts, samples)?;
        tracing::debug!(stem, segments = segments.len(), "transcription finished");

        for output_type in &opts.output_types {
            let path = output_dir.join(format!("{stem}.{}", output_type.extension()));
            write_output_file(&segments, &path, *output_type)?;
        }

        Ok(())
    }
}

fn file_stem(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("media path has no usable file name: {}", path.display()))?;

    Ok(stem.to_owned())
}

/// Write every segment to `path` in the given format.
fn write_output_file(segments: &[Segment], path: &Path, output_type: OutputType) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;

    // Buffer output; encoders write small pieces per segment.
    let writer = BufWriter::new(file);
    let mut encoder = encoder_for(output_type, writer);

    let run_res = write_all(&mut *encoder, segments);
    merge_run_and_close(run_res, encoder.close())
}

/// Select an encoder for the requested output type.
fn encoder_for(output_type: OutputType, writer: BufWriter<File>) -> Box<dyn SegmentEncoder> {
    match output_type {
        OutputType::Txt => Box::new(TxtEncoder::new(writer)),
        OutputType::Srt => Box::new(SrtEncoder::new(writer)),
        OutputType::Vtt => Box::new(VttEncoder::new(writer)),
        OutputType::Json => Box::new(JsonArrayEncoder::new(writer)),
    }
}

fn write_all(encoder: &mut dyn SegmentEncoder, segments: &[Segment]) -> Result<()> {
    for segment in segments {
        encoder.write_segment(segment)?;
    }
    Ok(())
}

/// Prefer a write error over a close error when both fail.
fn merge_run_and_close(run_res: Result<()>, close_res: Result<()>) -> Result<()> {
    match (run_res, close_res) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), _) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f32, end: f32, text: &str) -> Segment {
        Segment {
            start_seconds: start,
            end_seconds: end,
            text: text.to_string(),
        }
    }

    #[test]
    fn file_stem_strips_directory_and_extension() -> Result<()> {
        assert_eq!(file_stem(Path::new("/a/b/interview.mp4"))?, "interview");
        assert_eq!(file_stem(Path::new("plain.wav"))?, "plain");
        Ok(())
    }

    #[test]
    fn write_output_file_produces_each_format() -> Result<()> {
        let dir = tempfile::tempdir().map_err(crate::Error::from)?;
        let segments = vec![seg(0.0, 1.0, "hello"), seg(1.0, 2.0, "world")];

        for (output_type, expected) in [
            (OutputType::Txt, "hello\nworld\n"),
            (OutputType::Vtt, "WEBVTT"),
            (OutputType::Srt, "1\n00:00:00,000"),
            (OutputType::Json, "\"text\":\"hello\""),
        ] {
            let path = dir
                .path()
                .join(format!("out.{}", output_type.extension()));
            write_output_file(&segments, &path, output_type)?;

            let written = std::fs::read_to_string(&path).map_err(crate::Error::from)?;
            assert!(
                written.contains(expected),
                "{output_type:?} output missing {expected:?}: {written:?}"
            );
        }

        Ok(())
    }
}
