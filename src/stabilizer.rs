//! Best-effort word-level refinement of a reconciled transcription.
//!
//! The stabilizer walks an ordered list of [`RefinementStrategy`]s (typically a primary and a
//! fallback call shape of the same backend) and keeps the first success. Every failure is
//! absorbed: when nothing works, the caller gets the reconciled result back unchanged.

use std::fmt;

use tracing::{debug, info, warn};

use crate::opts::RefineOptions;
use crate::reconciler::reconcile;
use crate::refiner::{RefineRequest, RefinedTranscript, RefinementStrategy};
use crate::segments::Segment;
use crate::transcription::{StabilizationPath, TranscriptionResult};
use crate::{Error, Result};

type BoxedStrategy = Box<dyn RefinementStrategy + Send + Sync>;

/// Ordered refinement strategies behind a single entry point.
#[derive(Default)]
pub struct Stabilizer {
    strategies: Vec<BoxedStrategy>,
}

impl fmt::Debug for Stabilizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths: Vec<StabilizationPath> = self.strategies.iter().map(|s| s.path()).collect();
        f.debug_struct("Stabilizer")
            .field("strategies", &paths)
            .finish()
    }
}

impl Stabilizer {
    /// A stabilizer with no strategies; it always gives up.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy. Strategies are tried in the order they were added.
    pub fn with_strategy<S>(mut self, strategy: S) -> Self
    where
        S: RefinementStrategy + Send + Sync + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Whether any configured strategy reports its backend as available.
    pub fn is_available(&self) -> bool {
        self.strategies.iter().any(|s| s.is_available())
    }

    /// Refine `result`, or return it unchanged if refinement can't run.
    ///
    /// Never fails; the reason for giving up is logged.
    pub fn stabilize(
        &self,
        result: &TranscriptionResult,
        options: &RefineOptions,
    ) -> TranscriptionResult {
        match self.try_refine(result, options) {
            Ok((path, refined)) => {
                let merged = merge_refinement(result, path, refined);
                info!(
                    path = %path,
                    segments = merged.segments.len(),
                    "transcription stabilized"
                );
                merged
            }
            Err(err) => {
                warn!(error = %err, "refinement skipped; keeping reconciled result");
                result.clone()
            }
        }
    }

    /// Run the strategy chain and report which one succeeded.
    ///
    /// Errors when no backend is available, when the audio is missing, or with the last
    /// strategy's error when every available strategy failed.
    pub fn try_refine(
        &self,
        result: &TranscriptionResult,
        options: &RefineOptions,
    ) -> Result<(StabilizationPath, RefinedTranscript)> {
        if !self.is_available() {
            return Err(Error::msg("no refinement backend available"));
        }

        let audio_path = match result.audio_file_path.as_deref() {
            Some(path) if path.is_file() => path,
            other => return Err(Error::MissingAudio(other.map(ToOwned::to_owned))),
        };

        let request = RefineRequest::new(audio_path, result, options);

        let mut last_err = None;
        for strategy in self.strategies.iter().filter(|s| s.is_available()) {
            let path = strategy.path();
            debug!(path = %path, audio = %audio_path.display(), "attempting refinement");

            match strategy.attempt(&request) {
                Ok(refined) => return Ok((path, refined)),
                Err(err) => {
                    warn!(path = %path, error = %err, "refinement attempt failed");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::msg("no refinement backend available")))
    }
}

/// Overlay a backend's output onto the original result.
///
/// Only `text` (when non-empty), `language` (when present) and `segments` (when they carry
/// timestamps) are taken from the backend. Taken segments are reconciled again so the result
/// keeps the renderer invariants. Legacy `chunks` are dropped once the merged segments are
/// timed.
pub fn merge_refinement(
    original: &TranscriptionResult,
    path: StabilizationPath,
    refined: RefinedTranscript,
) -> TranscriptionResult {
    let mut merged = original.clone();

    if let Some(text) = refined.text.filter(|t| !t.trim().is_empty()) {
        merged.text = text;
    }
    if refined.language.is_some() {
        merged.language = refined.language;
    }
    if refined.segments.iter().any(Segment::is_timed) {
        merged.segments = reconcile(&refined.segments);
    } else if !refined.segments.is_empty() {
        debug!("refined segments carry no timestamps; keeping reconciled segments");
    }

    if merged.has_timed_segments() {
        merged.chunks = None;
    }

    merged.stabilized = true;
    merged.stabilization_path = Some(path);
    merged.segments_count = Some(merged.segments.len());
    merged
}
