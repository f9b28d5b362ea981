//! Sort and de-overlap a segment list into a single monotonic timeline.
//!
//! The output of [`reconcile`] is what every renderer assumes without re-checking:
//! - every segment has both `start` and `end`, with `start <= end`
//! - segments are ordered by `start`
//! - each segment starts at or after the previous segment's end

use std::cmp::Ordering;

use tracing::debug;

use crate::segments::Segment;
use crate::transcription::TranscriptionResult;

/// Reconcile a result's segments, leaving every other field as it was.
pub fn reconcile_result(result: &TranscriptionResult) -> TranscriptionResult {
    TranscriptionResult {
        segments: reconcile(&result.segments),
        ..result.clone()
    }
}

/// Produce a clean, non-overlapping timeline from `segments`.
///
/// Single pass after a stable sort:
/// - untimed segments are dropped
/// - a segment that starts before the previous end is pushed forward to that end, keeping its
///   duration (negative durations clamp to zero)
/// - a zero-length segment that would start at the same instant as the previously kept one
///   is dropped, so a collapsed run keeps only its first member
/// - a segment whose shifted end is no longer finite is dropped
pub fn reconcile(segments: &[Segment]) -> Vec<Segment> {
    let mut timed: Vec<&Segment> = segments
        .iter()
        .filter(|seg| matches!(seg.bounds(), Some((s, e)) if s.is_finite() && e.is_finite()))
        .collect();

    // `sort_by` is stable, so equal starts keep their input order.
    timed.sort_by(|a, b| compare_start(a.start, b.start));

    let mut out: Vec<Segment> = Vec::with_capacity(timed.len());
    let mut last_end = 0.0_f64;
    let mut last_start: Option<f64> = None;

    for seg in timed {
        let Some((start, end)) = seg.bounds() else {
            continue;
        };

        let (new_start, new_end) = if start < last_end {
            (last_end, last_end + (end - start).max(0.0))
        } else {
            (start, end.max(start))
        };

        if !new_end.is_finite() {
            continue;
        }
        if new_end == new_start && last_start == Some(new_start) {
            continue;
        }

        let mut kept = seg.clone();
        kept.shift(new_start - start);
        kept.start = Some(new_start);
        kept.end = Some(new_end);

        last_start = Some(new_start);
        last_end = new_end;
        out.push(kept);
    }

    if out.len() != segments.len() {
        debug!(
            input = segments.len(),
            output = out.len(),
            "reconciliation dropped segments"
        );
    }

    out
}

/// Ascending by start; missing starts sort last.
fn compare_start(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
