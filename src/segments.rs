use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single word with its own timing, as produced by word-level refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    #[serde(alias = "word")]
    pub text: String,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
}

/// One timed span of transcribed text.
///
/// `start`/`end` are seconds from the beginning of the audio. Either may be absent on
/// segments that haven't been through reconciliation yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: Option<f64>,
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<Word>,
}

impl Segment {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start: Some(start),
            end: Some(end),
            words: Vec::new(),
        }
    }

    /// Both bounds, if both are present.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        Some((self.start?, self.end?))
    }

    /// Whether this segment can be placed on a timeline.
    pub fn is_timed(&self) -> bool {
        self.bounds().is_some()
    }

    /// Move the segment (and its words) by `offset` seconds.
    pub(crate) fn shift(&mut self, offset: f64) {
        if offset == 0.0 {
            return;
        }
        self.start = self.start.map(|t| t + offset);
        self.end = self.end.map(|t| t + offset);
        for word in &mut self.words {
            word.start = word.start.map(|t| t + offset);
            word.end = word.end.map(|t| t + offset);
        }
    }
}

/// A segment exactly as the inference engine (or a refinement backend) hands it over.
///
/// Timing may arrive as a two-element `timestamp` pair, as separate `start`/`end` fields, or
/// not at all. Values are kept as raw JSON so a malformed number only affects its own field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<Word>,
}

impl RawSegment {
    /// The `(start, end)` carried by the `timestamp` pair, if there is one.
    pub fn timestamp_pair(&self) -> (Option<f64>, Option<f64>) {
        match &self.timestamp {
            Some(Value::Array(pair)) if pair.len() == 2 => {
                (seconds_from_value(&pair[0]), seconds_from_value(&pair[1]))
            }
            _ => (None, None),
        }
    }
}

impl From<&Segment> for RawSegment {
    fn from(seg: &Segment) -> Self {
        Self {
            text: seg.text.clone(),
            timestamp: None,
            start: seg.start.map(Value::from),
            end: seg.end.map(Value::from),
            words: seg.words.clone(),
        }
    }
}

/// Interpret a JSON value as a finite number of seconds.
///
/// Numbers and numeric strings are accepted; anything else (null, text, NaN, infinities) is
/// treated as a missing timestamp.
pub fn seconds_from_value(value: &Value) -> Option<f64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    seconds.is_finite().then_some(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seconds_from_value_accepts_numbers_and_numeric_strings() {
        assert_eq!(seconds_from_value(&json!(1.5)), Some(1.5));
        assert_eq!(seconds_from_value(&json!(2)), Some(2.0));
        assert_eq!(seconds_from_value(&json!(" 3.25 ")), Some(3.25));
    }

    #[test]
    fn seconds_from_value_rejects_everything_else() {
        assert_eq!(seconds_from_value(&json!(null)), None);
        assert_eq!(seconds_from_value(&json!("soon")), None);
        assert_eq!(seconds_from_value(&json!("NaN")), None);
        assert_eq!(seconds_from_value(&json!("inf")), None);
        assert_eq!(seconds_from_value(&json!([1.0])), None);
    }

    #[test]
    fn timestamp_pair_tolerates_null_end() -> anyhow::Result<()> {
        let raw: RawSegment = serde_json::from_value(json!({
            "text": "tail",
            "timestamp": [12.0, null]
        }))?;
        assert_eq!(raw.timestamp_pair(), (Some(12.0), None));
        Ok(())
    }

    #[test]
    fn timestamp_pair_ignores_wrong_arity() -> anyhow::Result<()> {
        let raw: RawSegment = serde_json::from_value(json!({
            "text": "odd",
            "timestamp": [1.0, 2.0, 3.0]
        }))?;
        assert_eq!(raw.timestamp_pair(), (None, None));
        Ok(())
    }

    #[test]
    fn shift_moves_words_with_the_segment() {
        let mut seg = Segment::new("hello there", 1.0, 2.0);
        seg.words.push(Word {
            text: "hello".to_owned(),
            start: Some(1.0),
            end: Some(1.4),
            probability: None,
        });

        seg.shift(0.5);

        assert_eq!(seg.bounds(), Some((1.5, 2.5)));
        assert_eq!(seg.words[0].start, Some(1.5));
        assert_eq!(seg.words[0].end, Some(1.9));
    }
}
