use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::segments::{RawSegment, Segment};

/// Which refinement strategy produced a stabilized result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilizationPath {
    Primary,
    Fallback,
}

impl StabilizationPath {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for StabilizationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of one inference call, before any repair.
///
/// Engines disagree on naming: some emit `chunks`, some `segments`, and the audio location
/// shows up as either `audio_file_path` or `audio_path`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTranscription {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<RawSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<RawSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(
        default,
        alias = "audio_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub audio_file_path: Option<PathBuf>,
}

impl RawTranscription {
    /// Parse the JSON document produced by the inference engine.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A full transcription run after normalization.
///
/// Each pipeline stage returns a new value; none of them mutate their input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub segments: Vec<Segment>,
    /// Legacy per-chunk view carried over from engines that emit `chunks`.
    ///
    /// Dropped once refinement yields timed segments, so renderers only ever see one timeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<Segment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file_path: Option<PathBuf>,
    #[serde(default)]
    pub stabilized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stabilization_path: Option<StabilizationPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_count: Option<usize>,
}

impl From<&TranscriptionResult> for RawTranscription {
    fn from(result: &TranscriptionResult) -> Self {
        let to_raw = |segments: &[Segment]| -> Vec<RawSegment> {
            segments.iter().map(RawSegment::from).collect()
        };
        Self {
            text: result.text.clone(),
            chunks: result.chunks.as_deref().map(to_raw),
            segments: Some(to_raw(&result.segments)),
            language: result.language.clone(),
            audio_file_path: result.audio_file_path.clone(),
        }
    }
}

impl TranscriptionResult {
    /// Whether at least one segment carries both timestamps.
    pub fn has_timed_segments(&self) -> bool {
        self.segments.iter().any(Segment::is_timed)
    }
}
