//! Whole-file media decoding built on top of Symphonia.
//!
//! Used when audio extraction is disabled: the input media (video container or
//! audio file) is decoded in-process into the mono 16 kHz samples whisper
//! expects, with all codec work delegated to Symphonia.
//!
//! Error handling policy for individual packets:
//! - `DecodeError` → skip bad frame (common with some codecs)
//! - `IoError`     → treat as end-of-stream
//! - other errors  → bubble up with context

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use symphonia::core::audio::AudioBufferRef;
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{Packet, Track};

use crate::audio_pipeline::AudioPipeline;
use crate::demux::{next_packet, probe_file};

/// Decode a media file into mono `f32` samples at the whisper input rate.
pub fn decode_media_to_samples(path: &Path) -> Result<Vec<f32>> {
    let (mut format, track) = probe_file(path)?;
    let mut decoder = make_decoder_for_track(&track)?;
    let mut pipeline = AudioPipeline::new();

    let mut samples = Vec::new();

    loop {
        let Some(packet) = next_packet(&mut format)? else {
            break;
        };

        // Ignore packets from non-audio tracks (e.g. the video stream of an interview recording).
        if packet.track_id() != track.id {
            continue;
        }

        decode_packet_and_then(&mut decoder, &packet, |decoded| {
            pipeline
                .push_decoded(&decoded, &mut samples)
                .context("audio pipeline failed while processing decoded samples")
        })?;
    }

    // Flush any buffered resampler tail.
    pipeline
        .finalize(&mut samples)
        .context("audio pipeline failed during finalize")?;

    Ok(samples)
}

/// Create a decoder for the given audio track.
///
/// This uses Symphonia's default codec registry and options.
///
/// Fails if:
/// - the codec is unsupported
/// - the codec parameters are invalid
fn make_decoder_for_track(track: &Track) -> Result<Box<dyn Decoder>> {
    let decoder_opts: DecoderOptions = Default::default();

    symphonia::default::get_codecs()
        .make(&track.codec_params, &decoder_opts)
        .map_err(|e| anyhow!(e))
        .context("failed to create decoder for audio track")
}

/// Decode a packet and immediately hand the decoded buffer to a callback.
///
/// Return value semantics:
/// - `Ok(true)`  → a decoded audio buffer was produced and `on_decoded` ran
/// - `Ok(false)` → packet was skipped or stream ended (recoverable condition)
/// - `Err(_)`    → fatal decoder error
fn decode_packet_and_then(
    decoder: &mut Box<dyn Decoder>,
    packet: &Packet,
    mut on_decoded: impl FnMut(AudioBufferRef<'_>) -> Result<()>,
) -> Result<bool> {
    match decoder.decode(packet) {
        Ok(buf) => {
            on_decoded(buf)?;
            Ok(true)
        }

        // Recoverable: corrupted frame, but decoding can continue.
        Err(SymphoniaError::DecodeError(_)) => Ok(false),

        // Treat IO errors as graceful end-of-stream.
        Err(SymphoniaError::IoError(_)) => Ok(false),

        // Anything else is considered fatal.
        Err(e) => Err(anyhow!(e)).context("decoder failure"),
    }
}
