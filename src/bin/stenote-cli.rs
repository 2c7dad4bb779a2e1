use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use stenote::batch::Batch;
use stenote::ctx::resolve_model;
use stenote::opts::Opts;
use stenote::output_type::OutputType;
use stenote::transcriber::Transcriber;

fn main() -> Result<()> {
    stenote::logging::init();

    let params = Params::parse();

    // Directory layout + ffmpeg are validated before the (slow) model load.
    let batch = Batch::new(
        &params.root_dir,
        Some(params.ffmpeg_dir.as_path()),
        params.extract_audio,
    )?;

    println!("Input directory: {}", batch.input_dir().display());
    println!("Output directory: {}", batch.output_dir().display());

    let model_path = resolve_model(&params.model);
    let transcriber = Transcriber::new(&model_path)?;

    let opts = Opts {
        enable_translate_to_english: params.translate,
        language: Some(params.language),
        output_types: if params.output_type.is_empty() {
            OutputType::default_set()
        } else {
            params.output_type
        },
    };

    batch.run(&transcriber, &opts)?;

    println!("Transcription complete.");
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "stenote")]
#[command(about = "Batch transcribe media files using Whisper")]
struct Params {
    /// Directory containing the `interviews`, `transcripts` and `audio` subdirectories.
    #[arg(long = "root-dir")]
    pub root_dir: PathBuf,

    /// The location of the ffmpeg binary (or the directory containing it).
    #[arg(long = "ffmpeg_dir")]
    pub ffmpeg_dir: PathBuf,

    /// Whisper model size (tiny, base, small, medium, large) or a path to a ggml model file.
    #[arg(short = 'm', long = "model", default_value = "medium")]
    pub model: String,

    /// Extract and normalize audio with ffmpeg before transcribing.
    #[arg(long = "extract-audio", default_value_t = false)]
    pub extract_audio: bool,

    /// Spoken language hint passed to whisper.
    #[arg(short = 'l', long = "language", default_value = "en")]
    pub language: String,

    /// Translate speech to English instead of transcribing verbatim.
    #[arg(short = 't', long = "translate", default_value_t = false)]
    pub translate: bool,

    /// Output formats to write (repeatable). Defaults to txt, srt and vtt.
    #[arg(short = 'o', long = "output-type", value_enum)]
    pub output_type: Vec<OutputType>,
}
