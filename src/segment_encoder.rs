use crate::Result;
use crate::segments::Segment;

/// A streaming sink for reconciled segments.
///
/// Encoders assume their input already went through reconciliation and don't re-check
/// ordering. `close` is idempotent; writing after `close` is an error.
pub trait SegmentEncoder {
    fn write_segment(&mut self, seg: &Segment) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
