/// The supported output formats for encoded transcription segments.
///
/// Why this exists:
/// - We want a single, strongly-typed representation of output formats
///   across the CLI and library code.
/// - Using an enum avoids stringly-typed conditionals and keeps format
///   selection explicit and discoverable.
///
/// Integration notes:
/// - `ValueEnum` (behind the `cli` feature) allows this enum to be used
///   directly as a CLI flag with `clap`.
/// - Each variant maps to a concrete `SegmentEncoder` implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// Output segments as plain text, one line per segment.
    Txt,

    /// Output segments in SubRip subtitle format.
    Srt,

    /// Output segments in WebVTT subtitle format.
    Vtt,

    /// Output segments as a JSON array.
    Json,
}

impl OutputType {
    /// The file extension used for output files of this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Json => "json",
        }
    }

    /// The formats written when the caller doesn't ask for anything specific.
    ///
    /// JSON is deliberately opt-in; the default set matches what a transcript
    /// reader usually wants on disk.
    pub fn default_set() -> Vec<Self> {
        vec![Self::Txt, Self::Srt, Self::Vtt]
    }
}
