use std::io::Write;

use crate::Result;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;
use crate::timestamp::{MillisSeparator, format_timestamp};

/// A `SegmentEncoder` that writes SubRip (`.srt`) cues.
///
/// Each cue is a 1-based index line, a `HH:MM:SS,mmm --> HH:MM:SS,mmm` timing line, the text,
/// and a blank separator line. SRT has no preamble, so an empty run produces empty output.
pub struct SrtEncoder<W: Write> {
    w: W,
    next_index: usize,
    closed: bool,
}

impl<W: Write> SrtEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            next_index: 1,
            closed: false,
        }
    }
}

impl<W: Write> SegmentEncoder for SrtEncoder<W> {
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write segment: encoder is already closed",
            ));
        }

        let start = format_timestamp(seg.start, MillisSeparator::Comma);
        let end = format_timestamp(seg.end, MillisSeparator::Comma);

        writeln!(&mut self.w, "{}", self.next_index)?;
        writeln!(&mut self.w, "{start} --> {end}")?;
        writeln!(&mut self.w, "{}", seg.text)?;
        writeln!(&mut self.w)?;
        self.w.flush()?;

        self.next_index += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}
