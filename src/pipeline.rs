//! High-level API for turning raw engine output into subtitle files.
//!
//! We expose a single entry point (`Pipeline`) that wires the lower-level stages together:
//! normalize → reconcile → (optional) refine, then render each requested format.
//!
//! The intent is:
//! - We configure the refinement backends once.
//! - We reuse the pipeline for many transcriptions; it holds no per-run state, so it can be
//!   shared across worker threads.
//! - Callers choose refinement flags and output formats via `Opts`.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::normalizer::normalize;
use crate::opts::Opts;
use crate::reconciler::reconcile_result;
use crate::render::write_outputs;
use crate::stabilizer::Stabilizer;
use crate::transcription::{RawTranscription, TranscriptionResult};
use crate::{Error, Result};

#[derive(Debug, Default)]
pub struct Pipeline {
    stabilizer: Stabilizer,
    opts: Opts,
}

impl Pipeline {
    /// A pipeline without refinement backends; results are normalized and reconciled only.
    pub fn new(opts: Opts) -> Self {
        Self::with_stabilizer(Stabilizer::new(), opts)
    }

    pub fn with_stabilizer(stabilizer: Stabilizer, opts: Opts) -> Self {
        Self { stabilizer, opts }
    }

    /// Run every stage over one raw transcription.
    ///
    /// The input isn't modified. Refinement failures never surface here; they degrade to the
    /// reconciled result.
    pub fn process(&self, raw: &RawTranscription) -> TranscriptionResult {
        let normalized = normalize(raw);
        let reconciled = reconcile_result(&normalized);

        let result = if self.opts.enable_refinement {
            self.stabilizer.stabilize(&reconciled, &self.opts.refine)
        } else {
            reconciled
        };

        info!(
            segments = result.segments.len(),
            stabilized = result.stabilized,
            "transcription processed"
        );
        result
    }

    /// Parse engine JSON and run [`Pipeline::process`] on it.
    pub fn process_json(&self, json: &str) -> Result<TranscriptionResult> {
        let raw = RawTranscription::from_json(json)?;
        Ok(self.process(&raw))
    }

    /// Write every configured output format as `<dir>/<basename>.<ext>`.
    pub fn export(
        &self,
        result: &TranscriptionResult,
        dir: &Path,
        basename: &str,
    ) -> Result<Vec<PathBuf>> {
        if self.opts.output_types.is_empty() {
            return Err(Error::msg("no output formats requested"));
        }
        if basename.trim().is_empty() {
            return Err(Error::msg("output basename must not be empty"));
        }

        write_outputs(result, dir, basename, &self.opts.output_types)
    }

    pub fn stabilizer(&self) -> &Stabilizer {
        &self.stabilizer
    }

    pub fn opts(&self) -> &Opts {
        &self.opts
    }
}
