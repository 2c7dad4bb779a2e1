//! Audio normalization pipeline.
//!
//! Responsibilities:
//! - Convert Symphonia-decoded PCM into interleaved `f32`
//! - Downmix to mono
//! - Resample to the whisper input rate (when needed)
//!
//! Decoded audio is appended into a caller-provided buffer; the whole file is
//! collected before transcription, matching the sequential batch flow.
//! `finalize()` must be called at end-of-stream to flush any remaining
//! resampler input.

use anyhow::{Context, Result, anyhow, bail};
use rubato::{Resampler, SincFixedIn, WindowFunction};
use symphonia::core::audio::{AudioBufferRef, SampleBuffer};

/// The mono sample rate whisper.cpp expects (Hz).
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// A small stateful pipeline that converts decoded audio into mono 16 kHz `f32` samples.
pub struct AudioPipeline {
    // Scratch buffer used to copy decoded PCM into an interleaved `Vec<f32>`.
    sample_buf_f32: Option<SampleBuffer<f32>>,

    // Lazily initialized resampler (only needed when the source sample rate != 16 kHz).
    resampler: Option<SincFixedIn<f32>>,

    // Accumulator for mono source samples before feeding full blocks into rubato.
    pending: Vec<f32>,
}

impl Default for AudioPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPipeline {
    /// Create a new audio pipeline with empty internal buffers.
    pub fn new() -> Self {
        Self {
            sample_buf_f32: None,
            resampler: None,
            pending: Vec::new(),
        }
    }

    /// Push a decoded Symphonia buffer through the pipeline, appending mono
    /// 16 kHz samples to `out`.
    pub fn push_decoded(&mut self, decoded: &AudioBufferRef<'_>, out: &mut Vec<f32>) -> Result<()> {
        let (interleaved, src_rate, channels) =
            decoded_to_interleaved_f32(decoded, &mut self.sample_buf_f32)?;

        let mono_src = downmix_to_mono(&interleaved, channels);

        // Fast path: already at the target sample rate.
        if src_rate == TARGET_SAMPLE_RATE {
            out.extend_from_slice(&mono_src);
            return Ok(());
        }

        // Slow path: resample to the target sample rate.
        self.ensure_resampler(src_rate)?;
        self.pending.extend_from_slice(&mono_src);
        self.drain_full_blocks(out)
    }

    /// Flush remaining buffered samples at end-of-stream.
    ///
    /// If resampling was never needed, this is a no-op.
    pub fn finalize(&mut self, out: &mut Vec<f32>) -> Result<()> {
        let Some(rs) = self.resampler.as_ref() else {
            return Ok(());
        };

        if self.pending.is_empty() {
            return Ok(());
        }

        // rubato expects exact block sizes; pad the remainder with zeros.
        let in_max = rs.input_frames_max();
        let rem = self.pending.len() % in_max;
        if rem != 0 {
            self.pending.resize(self.pending.len() + (in_max - rem), 0.0);
        }

        self.drain_full_blocks(out)
    }

    fn ensure_resampler(&mut self, src_rate: u32) -> Result<()> {
        if self.resampler.is_some() {
            return Ok(());
        }

        // How many source frames we feed rubato per `process()` call.
        // Tradeoff: larger chunks = better throughput; smaller chunks = lower latency.
        let in_chunk_src_frames = 2048;

        let rs = SincFixedIn::<f32>::new(
            TARGET_SAMPLE_RATE as f64 / src_rate as f64,
            2.0,
            rubato::SincInterpolationParameters {
                sinc_len: 256,
                f_cutoff: 0.95,
                interpolation: rubato::SincInterpolationType::Linear,
                oversampling_factor: 256,
                window: WindowFunction::BlackmanHarris2,
            },
            in_chunk_src_frames,
            1, // mono
        )
        .map_err(|e| anyhow!(e))
        .context("failed to init resampler")?;

        self.resampler = Some(rs);
        Ok(())
    }

    /// Feed every complete input block through the resampler, appending the
    /// resampled output to `out`. Leftover samples stay in `pending`.
    fn drain_full_blocks(&mut self, out: &mut Vec<f32>) -> Result<()> {
        let rs = self
            .resampler
            .as_mut()
            .ok_or_else(|| anyhow!("resampler not initialized"))?;
        let in_max = rs.input_frames_max();

        while self.pending.len() >= in_max {
            let block: Vec<f32> = self.pending.drain(..in_max).collect();

            // rubato takes one Vec per channel; we're mono throughout.
            let resampled = rs
                .process(&[block], None)
                .map_err(|e| anyhow!(e))
                .context("resampler process failed")?;

            if resampled.len() != 1 {
                bail!("expected mono output from resampler");
            }

            out.extend_from_slice(&resampled[0]);
        }

        Ok(())
    }
}

fn decoded_to_interleaved_f32(
    decoded: &AudioBufferRef<'_>,
    sample_buf_f32: &mut Option<SampleBuffer<f32>>,
) -> Result<(Vec<f32>, u32, usize)> {
    ensure_sample_buffer(decoded, sample_buf_f32);

    let buf = sample_buf_f32
        .as_mut()
        .ok_or_else(|| anyhow!("sample buffer not initialized"))?;

    // Copy decoded PCM into our interleaved scratch buffer.
    buf.copy_interleaved_ref(decoded.clone());

    let src_rate = decoded.spec().rate;
    let channels = decoded.spec().channels.count();
    if channels == 0 {
        bail!("decoded audio had zero channels");
    }

    Ok((buf.samples().to_vec(), src_rate, channels))
}

fn ensure_sample_buffer(
    decoded: &AudioBufferRef<'_>,
    sample_buf_f32: &mut Option<SampleBuffer<f32>>,
) {
    if sample_buf_f32.is_some() {
        return;
    }

    let spec = *decoded.spec();
    let duration = decoded.capacity() as u64;
    *sample_buf_f32 = Some(SampleBuffer::<f32>::new(duration, spec));
}

/// Downmix interleaved samples into mono by averaging channels.
///
/// Policy: equal-weight average across channels (simple, predictable).
fn downmix_to_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }

    let frames = interleaved.len() / channels;
    let mut mono = Vec::with_capacity(frames);

    for f in 0..frames {
        let base = f * channels;
        let mut acc = 0.0;
        for c in 0..channels {
            acc += interleaved[base + c];
        }
        mono.push(acc / channels as f32);
    }

    mono
}
