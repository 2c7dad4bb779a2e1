use crate::output_type::OutputType;

/// The language hint we fall back to when callers don't specify one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Options that control how a transcription is performed.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for mapping user input into this type so that:
/// - the library remains reusable outside of a CLI context
/// - other frontends (tests, batch jobs) can construct options programmatically
#[derive(Debug, Clone)]
pub struct Opts {
    /// Whether to translate speech to English instead of transcribing verbatim.
    pub enable_translate_to_english: bool,

    /// Optional language hint (e.g. `"en"`, `"es"`).
    ///
    /// When `None`, we allow Whisper to auto-detect the spoken language.
    pub language: Option<String>,

    /// The output formats to write for each transcribed file.
    ///
    /// Every transcription run writes one file per entry, named after the
    /// input's base name with the format's extension.
    pub output_types: Vec<OutputType>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            enable_translate_to_english: false,
            language: Some(DEFAULT_LANGUAGE.to_owned()),
            output_types: OutputType::default_set(),
        }
    }
}
