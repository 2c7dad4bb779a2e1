use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader};

use crate::audio_pipeline::TARGET_SAMPLE_RATE;

/// Load WAV audio from a reader and return normalized audio samples.
///
/// What we return:
/// - A `Vec<f32>` containing mono audio samples normalized to `[-1.0, 1.0]`
///
/// Format requirements:
/// - Mono (1 channel)
/// - 16-bit integer PCM
/// - the target sample rate
///
/// Why we enforce this:
/// - extraction always produces exactly this format, and enforcing it here
///   keeps downstream transcription simple and predictable
pub fn get_samples_from_wav_reader<R>(reader: R) -> Result<Vec<f32>>
where
    R: Read + Seek,
{
    let mut reader = WavReader::new(reader).context("failed to read WAV data from reader")?;
    let spec = reader.spec();

    // We require mono audio.
    if spec.channels != 1 {
        anyhow::bail!(
            "expected mono WAV (1 channel), got {} channels",
            spec.channels
        );
    }

    // We require the target sample rate.
    if spec.sample_rate != TARGET_SAMPLE_RATE {
        anyhow::bail!(
            "expected {} Hz sample rate, got {} Hz",
            TARGET_SAMPLE_RATE,
            spec.sample_rate
        );
    }

    // We require 16-bit integer PCM (what our extraction step writes).
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        anyhow::bail!(
            "expected 16-bit integer PCM, got {}-bit {:?}",
            spec.bits_per_sample,
            spec.sample_format
        );
    }

    // Read samples and normalize from i16 PCM to f32 in [-1.0, 1.0].
    //
    // Most ASR backends expect audio in this normalized floating-point format.
    let mut samples = Vec::new();
    for sample in reader.samples::<i16>() {
        let pcm = sample?;
        let normalized = pcm as f32 / i16::MAX as f32;
        samples.push(normalized);
    }

    Ok(samples)
}

/// Load WAV audio from a file path. See [`get_samples_from_wav_reader`].
pub fn get_samples_from_wav(path: &Path) -> Result<Vec<f32>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open WAV file: {}", path.display()))?;
    get_samples_from_wav_reader(BufReader::new(file))
}
