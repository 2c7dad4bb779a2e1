use crate::Result;
use crate::segments::Segment;

/// A sink for transcribed segments.
///
/// Encoders stream segments into an underlying writer as they arrive, and
/// `close` finalizes the output. Closing is idempotent; writing after close
/// is an error.
pub trait SegmentEncoder {
    fn write_segment(&mut self, seg: &Segment) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
