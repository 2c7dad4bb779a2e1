use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use stenote::opts::Opts;
use stenote::transcriber::Transcriber;

#[test]
#[ignore = "requires a ggml model at ./models/ggml-base.bin"]
fn transcribes_wav_end_to_end() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let wav_path = dir.path().join("fixture.wav");
    let output_dir = dir.path().join("transcripts");

    // Two seconds of silence; whisper may emit nothing, but every requested
    // output file must still be written.
    let spec = WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&wav_path, spec)?;
    for _ in 0..32_000 {
        writer.write_sample(0i16)?;
    }
    writer.finalize()?;

    let transcriber = Transcriber::new(Path::new("models/ggml-base.bin"))?;
    transcriber.transcribe_wav(&wav_path, &output_dir, &Opts::default())?;

    for ext in ["txt", "srt", "vtt"] {
        assert!(
            output_dir.join(format!("fixture.{ext}")).is_file(),
            "expected fixture.{ext} to be written"
        );
    }

    Ok(())
}
