use std::io::Write;

use serde::Serialize;

use crate::Result;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::{Segment, Word};

/// Writes segments as a JSON array of numbered cues, one cue per line.
///
/// Times are rounded to whole milliseconds so the JSON agrees with what the SRT and WebVTT
/// encoders print for the same segment. Missing times are omitted rather than zeroed, and
/// `words` only appears for segments that carry word timing.
///
/// ```json
/// [
/// {"index":1,"start":0.0,"end":1.2,"text":"hello"},
/// {"index":2,"start":1.2,"end":2.5,"text":"world"}
/// ]
/// ```
pub struct JsonArrayEncoder<W: Write> {
    w: W,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing written yet, not even the opening bracket.
    Fresh,
    /// Array is open; holds the number of cues written so far.
    Open(usize),
    Closed,
}

#[derive(Serialize)]
struct Cue<'a> {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<f64>,
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    words: Vec<CueWord<'a>>,
}

#[derive(Serialize)]
struct CueWord<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    probability: Option<f64>,
}

impl<'a> From<&'a Word> for CueWord<'a> {
    fn from(word: &'a Word) -> Self {
        Self {
            text: &word.text,
            start: word.start.and_then(millis),
            end: word.end.and_then(millis),
            probability: word.probability,
        }
    }
}

/// Round to milliseconds; non-finite values have no JSON representation and are dropped.
fn millis(seconds: f64) -> Option<f64> {
    seconds
        .is_finite()
        .then(|| (seconds * 1000.0).round() / 1000.0)
}

impl<W: Write> JsonArrayEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            state: State::Fresh,
        }
    }

    /// Open the array if needed and return how many cues precede the next one.
    fn open(&mut self) -> Result<usize> {
        match self.state {
            State::Fresh => {
                self.w.write_all(b"[\n")?;
                self.state = State::Open(0);
                Ok(0)
            }
            State::Open(n) => Ok(n),
            State::Closed => Err(crate::Error::msg(
                "cannot write segment: encoder is already closed",
            )),
        }
    }
}

impl<W: Write> SegmentEncoder for JsonArrayEncoder<W> {
    fn write_segment(&mut self, seg: &Segment) -> Result<()> {
        let written = self.open()?;
        if written > 0 {
            self.w.write_all(b",\n")?;
        }

        let cue = Cue {
            index: written + 1,
            start: seg.start.and_then(millis),
            end: seg.end.and_then(millis),
            text: &seg.text,
            words: seg.words.iter().map(CueWord::from).collect(),
        };
        serde_json::to_writer(&mut self.w, &cue)?;

        self.state = State::Open(written + 1);
        Ok(())
    }

    /// Terminate the array. An encoder closed before any write still yields `[]`.
    fn close(&mut self) -> Result<()> {
        match self.state {
            State::Closed => return Ok(()),
            State::Fresh => self.w.write_all(b"[]")?,
            State::Open(0) => self.w.write_all(b"]")?,
            State::Open(_) => self.w.write_all(b"\n]")?,
        }
        self.w.flush()?;
        self.state = State::Closed;
        Ok(())
    }
}
