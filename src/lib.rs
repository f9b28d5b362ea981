//! `stable_subs` — timestamp stabilization and subtitle rendering for speech-to-text output.
//!
//! This crate provides:
//! - Parsing of raw engine output (chunks/segments with messy timing)
//! - Per-segment normalization and whole-timeline reconciliation
//! - Best-effort word-level refinement through pluggable backends
//! - Streaming output encoders (plain text, SRT, WebVTT, JSON)
//!
//! Speech recognition itself is out of scope: an external engine produces the raw
//! transcription, and this crate makes its timeline safe to render.

mod error;

pub use error::{Error, Result};

// High-level API (most consumers should start here).
pub mod opts;
pub mod pipeline;

// Data model.
pub mod segments;
pub mod transcription;

// Timeline repair.
pub mod normalizer;
pub mod reconciler;

// Refinement interfaces, the built-in backends, and the fallback chain.
pub mod refiner;
pub mod refiners;
pub mod stabilizer;

// Output selection and encoder interfaces.
pub mod output_type;
pub mod render;
pub mod segment_encoder;
mod timestamp;

// Output encoders that serialize segments into various formats.
pub mod json_array_encoder;
pub mod srt_encoder;
pub mod text_encoder;
pub mod vtt_encoder;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub use opts::{Opts, RefineOptions};
pub use output_type::OutputType;
pub use pipeline::Pipeline;
pub use refiner::{IntoRefined, RefineRequest, RefinedTranscript, RefinementStrategy, Refiner};
pub use refiners::command::{CallShape, CommandRefiner};
pub use segments::{RawSegment, Segment, Word};
pub use stabilizer::Stabilizer;
pub use transcription::{RawTranscription, StabilizationPath, TranscriptionResult};

/// Initialize structured logging for binaries.
#[cfg(feature = "logging")]
pub fn init_logging() {
    logging::init();
}
