use std::io::Write;

use crate::Result;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;

/// A `SegmentEncoder` that writes segments in SubRip (SRT) format.
///
/// Design:
/// - We stream output directly to a `Write` implementation.
/// - Cue numbering is stateful: SubRip requires a 1-based sequence number per cue.
pub struct SrtEncoder<W: Write> {
    /// The underlying writer we stream SRT into.
    w: W,

    /// The sequence number of the next cue.
    next_index: u64,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> SrtEncoder<W> {
    /// Create a new SRT encoder that writes to the provided writer.
    pub fn new(w: W) -> Self {
        Self {
            w,
            next_index: 1,
            closed: false,
        }
    }
}

impl<W: Write> SegmentEncoder for SrtEncoder<W> {
    /// Write a single numbered cue in SubRip format.
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write segment: encoder is already closed",
            ));
        }

        // SubRip timestamps use `HH:MM:SS,mmm` (comma before the milliseconds).
        let start = format_timestamp_srt(seg.start_seconds);
        let end = format_timestamp_srt(seg.end_seconds);

        writeln!(&mut self.w, "{}", self.next_index)?;
        writeln!(&mut self.w, "{start} --> {end}")?;
        writeln!(&mut self.w, "{}", seg.text)?;

        // Blank line separates cues.
        writeln!(&mut self.w)?;

        self.next_index += 1;

        Ok(())
    }

    /// Flush the underlying writer. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;

        Ok(())
    }
}

/// Format seconds into a SubRip timestamp (`HH:MM:SS,mmm`).
///
/// Same rounding policy as the VTT encoder: nearest millisecond.
fn format_timestamp_srt(seconds: f32) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    let s = total_s % 60;
    let total_m = total_s / 60;

    let m = total_m % 60;
    let h = total_m / 60;

    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}
