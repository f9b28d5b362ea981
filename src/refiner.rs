use std::path::Path;

use crate::Result;
use crate::normalizer::normalize_segments;
use crate::opts::RefineOptions;
use crate::segments::Segment;
use crate::transcription::{RawTranscription, StabilizationPath, TranscriptionResult};

/// Everything a refinement backend gets to look at.
///
/// The backend re-aligns the existing segments against the audio waveform; it never re-runs
/// inference. [`RefineRequest::transcribe`] is the callback that hands it the segments we
/// already have.
#[derive(Debug, Clone, Copy)]
pub struct RefineRequest<'a> {
    pub audio_path: &'a Path,
    pub result: &'a TranscriptionResult,
    pub options: &'a RefineOptions,
}

impl<'a> RefineRequest<'a> {
    pub fn new(
        audio_path: &'a Path,
        result: &'a TranscriptionResult,
        options: &'a RefineOptions,
    ) -> Self {
        Self {
            audio_path,
            result,
            options,
        }
    }

    /// Inference callback: returns the already normalized and reconciled transcription.
    pub fn transcribe(&self) -> TranscriptionResult {
        self.result.clone()
    }

    pub fn segments(&self) -> &'a [Segment] {
        &self.result.segments
    }

    /// The result converted to the engine-style document a fallback backend consumes.
    pub fn document(&self) -> RawTranscription {
        RawTranscription::from(self.result)
    }
}

/// The fields a refinement backend is allowed to override.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefinedTranscript {
    pub text: Option<String>,
    pub segments: Vec<Segment>,
    pub language: Option<String>,
}

/// Conversion from a backend's native output into a [`RefinedTranscript`].
///
/// Every backend output type implements this once, at the integration boundary.
pub trait IntoRefined {
    fn into_refined(self) -> Result<RefinedTranscript>;
}

impl IntoRefined for RefinedTranscript {
    fn into_refined(self) -> Result<RefinedTranscript> {
        Ok(self)
    }
}

impl IntoRefined for RawTranscription {
    fn into_refined(self) -> Result<RefinedTranscript> {
        let source = self.segments.or(self.chunks).unwrap_or_default();
        Ok(RefinedTranscript {
            text: Some(self.text).filter(|t| !t.trim().is_empty()),
            segments: normalize_segments(&source),
            language: self.language,
        })
    }
}

impl IntoRefined for TranscriptionResult {
    fn into_refined(self) -> Result<RefinedTranscript> {
        Ok(RefinedTranscript {
            text: Some(self.text).filter(|t| !t.trim().is_empty()),
            segments: self.segments,
            language: self.language,
        })
    }
}

/// One way of calling a word-level refinement backend.
pub trait Refiner {
    /// What the backend hands back.
    type Output: IntoRefined;

    /// Which attempt this is, recorded on success as `stabilization_path`.
    fn path(&self) -> StabilizationPath;

    /// Whether the backend is installed/configured. Unavailable refiners are skipped.
    fn is_available(&self) -> bool {
        true
    }

    /// Run the backend. This may block for a long time; callers own any timeout.
    fn refine(&self, request: &RefineRequest<'_>) -> Result<Self::Output>;
}

/// Object-safe view of a [`Refiner`], with its output already converted.
///
/// Implemented for every `Refiner`; the stabilizer holds an ordered list of these.
pub trait RefinementStrategy {
    fn path(&self) -> StabilizationPath;
    fn is_available(&self) -> bool;
    fn attempt(&self, request: &RefineRequest<'_>) -> Result<RefinedTranscript>;
}

impl<R: Refiner> RefinementStrategy for R {
    fn path(&self) -> StabilizationPath {
        Refiner::path(self)
    }

    fn is_available(&self) -> bool {
        Refiner::is_available(self)
    }

    fn attempt(&self, request: &RefineRequest<'_>) -> Result<RefinedTranscript> {
        self.refine(request)?.into_refined()
    }
}
