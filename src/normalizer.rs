//! Per-segment repair of raw engine output.
//!
//! Normalization looks at one segment at a time: it resolves where the timing came from and
//! puts `start <= end`. It does not sort, filter, or look at neighbours; that's the
//! reconciler's job.

use tracing::debug;

use crate::segments::{RawSegment, Segment, seconds_from_value};
use crate::transcription::{RawTranscription, TranscriptionResult};

/// Normalize a full raw transcription into a [`TranscriptionResult`].
///
/// `segments` is taken from the engine's `segments` list when present, otherwise from its
/// `chunks`. A `chunks` list is also kept, normalized, as the legacy view.
pub fn normalize(raw: &RawTranscription) -> TranscriptionResult {
    let source = raw
        .segments
        .as_deref()
        .or(raw.chunks.as_deref())
        .unwrap_or_default();

    let segments = normalize_segments(source);
    let chunks = raw.chunks.as_deref().map(normalize_segments);

    debug!(
        segments = segments.len(),
        untimed = segments.iter().filter(|s| !s.is_timed()).count(),
        "normalized transcription"
    );

    TranscriptionResult {
        text: raw.text.clone(),
        segments,
        chunks,
        language: raw.language.clone(),
        audio_file_path: raw.audio_file_path.clone(),
        stabilized: false,
        stabilization_path: None,
        segments_count: None,
    }
}

pub fn normalize_segments(raw: &[RawSegment]) -> Vec<Segment> {
    raw.iter().map(normalize_segment).collect()
}

/// Resolve one raw segment's timing.
///
/// Explicit `start`/`end` fields win; the `timestamp` pair fills whichever of them is missing.
/// Reversed bounds are swapped. A segment missing either bound is passed through as-is.
pub fn normalize_segment(raw: &RawSegment) -> Segment {
    let (pair_start, pair_end) = raw.timestamp_pair();

    let mut start = raw.start.as_ref().and_then(seconds_from_value).or(pair_start);
    let mut end = raw.end.as_ref().and_then(seconds_from_value).or(pair_end);

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            start = Some(e);
            end = Some(s);
        }
    }

    Segment {
        text: raw.text.clone(),
        start,
        end,
        words: raw.words.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawSegment {
        serde_json::from_value(value).expect("valid raw segment")
    }

    #[test]
    fn splits_timestamp_pair_into_start_and_end() {
        let seg = normalize_segment(&raw(json!({"text": "a", "timestamp": [0.5, 1.25]})));
        assert_eq!(seg.bounds(), Some((0.5, 1.25)));
    }

    #[test]
    fn swaps_reversed_bounds() {
        let seg = normalize_segment(&raw(json!({"text": "a", "start": 3.0, "end": 1.0})));
        assert_eq!(seg.bounds(), Some((1.0, 3.0)));

        let seg = normalize_segment(&raw(json!({"text": "b", "timestamp": [9, 4]})));
        assert_eq!(seg.bounds(), Some((4.0, 9.0)));
    }

    #[test]
    fn explicit_fields_take_precedence_over_pair() {
        let seg = normalize_segment(&raw(json!({
            "text": "a",
            "timestamp": [0.0, 1.0],
            "start": 0.25
        })));
        assert_eq!(seg.bounds(), Some((0.25, 1.0)));
    }

    #[test]
    fn passes_through_partial_timing() {
        let seg = normalize_segment(&raw(json!({"text": "a", "timestamp": [7.0, null]})));
        assert_eq!(seg.start, Some(7.0));
        assert_eq!(seg.end, None);

        let seg = normalize_segment(&raw(json!({"text": "b", "start": "later", "end": 2.0})));
        assert_eq!(seg.start, None);
        assert_eq!(seg.end, Some(2.0));
    }

    #[test]
    fn prefers_segments_over_chunks_and_keeps_chunks_as_legacy() -> anyhow::Result<()> {
        let raw = RawTranscription::from_json(
            r#"{
                "text": "a b",
                "segments": [{"text": "seg", "start": 0, "end": 1}],
                "chunks": [{"text": "chunk", "timestamp": [2, 1]}],
                "audio_path": "/tmp/a.wav"
            }"#,
        )?;

        let result = normalize(&raw);

        assert_eq!(result.segments, vec![Segment::new("seg", 0.0, 1.0)]);
        assert_eq!(result.chunks, Some(vec![Segment::new("chunk", 1.0, 2.0)]));
        assert_eq!(
            result.audio_file_path.as_deref(),
            Some(std::path::Path::new("/tmp/a.wav"))
        );
        assert!(!result.stabilized);
        Ok(())
    }

    #[test]
    fn does_not_touch_the_input() -> anyhow::Result<()> {
        let raw = RawTranscription::from_json(
            r#"{"text": "x", "chunks": [{"text": "x", "timestamp": [5, 1]}]}"#,
        )?;
        let before = raw.clone();
        let _ = normalize(&raw);
        assert_eq!(raw, before);
        Ok(())
    }
}
