use anyhow::{Context, Result};
use serde::Serialize;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperSegment, WhisperState};

use crate::opts::Opts;

/// A single transcribed segment.
#[derive(Debug, Serialize, Clone)]
pub struct Segment {
    pub start_seconds: f32,
    pub end_seconds: f32,
    pub text: String,
}

/// Run whisper over `samples` and collect every segment it produces.
///
/// The samples must be mono `f32` at 16 kHz (whisper.cpp's expected input).
pub fn collect_segments(ctx: &WhisperContext, opts: &Opts, samples: &[f32]) -> Result<Vec<Segment>> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let state = run_whisper_full(ctx, opts, samples)?;

    let mut segments = Vec::new();
    for whisper_segment in state.as_iter() {
        segments.push(to_segment(whisper_segment)?);
    }

    Ok(segments)
}

fn to_segment(segment: WhisperSegment) -> Result<Segment> {
    // Whisper segment text carries a leading space; subtitle and text output
    // want the bare text.
    let text = segment
        .to_str()
        .context("failed to get segment text")?
        .trim()
        .to_owned();

    Ok(Segment {
        start_seconds: centiseconds_to_seconds(segment.start_timestamp()),
        end_seconds: centiseconds_to_seconds(segment.end_timestamp()),
        text,
    })
}

fn build_full_params(opts: &Opts) -> FullParams<'_, '_> {
    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: 5,
        patience: 1.0,
    });

    params.set_n_threads(num_cpus::get() as i32);
    params.set_translate(opts.enable_translate_to_english);
    params.set_language(opts.language.as_deref());
    params.set_no_context(true);
    params.set_single_segment(false);

    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    params
}

fn run_whisper_full(ctx: &WhisperContext, opts: &Opts, samples: &[f32]) -> Result<WhisperState> {
    let params = build_full_params(opts);

    let mut state = ctx
        .create_state()
        .context("failed to create whisper state")?;

    state
        .full(params, samples)
        .context("failed to run whisper full()")?;

    Ok(state)
}

/// Whisper timestamps are centiseconds; unknown timestamps are -1, clamped to 0.0.
pub(crate) fn centiseconds_to_seconds(value: i64) -> f32 {
    if value < 0 { 0.0 } else { value as f32 / 100.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centiseconds_convert_and_clamp() {
        assert_eq!(centiseconds_to_seconds(0), 0.0);
        assert_eq!(centiseconds_to_seconds(150), 1.5);
        assert_eq!(centiseconds_to_seconds(-1), 0.0);
    }
}
