use std::io::Write;

use crate::Result;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;

/// A `SegmentEncoder` that writes segment text as plain lines.
///
/// Timestamps are dropped entirely; this is the "just give me the words"
/// format, one segment per line.
pub struct TxtEncoder<W: Write> {
    /// The underlying writer we stream text into.
    w: W,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> TxtEncoder<W> {
    /// Create a new text encoder that writes to the provided writer.
    pub fn new(w: W) -> Self {
        Self { w, closed: false }
    }
}

impl<W: Write> SegmentEncoder for TxtEncoder<W> {
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write segment: encoder is already closed",
            ));
        }

        writeln!(&mut self.w, "{}", seg.text)?;

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
