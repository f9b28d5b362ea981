use crate::output_type::OutputType;

/// Default voice-activity threshold handed to refinement backends.
pub const DEFAULT_VAD_THRESHOLD: f32 = 0.35;

/// Flags forwarded to a refinement backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineOptions {
    /// Run noise/music separation before re-aligning.
    pub demucs: bool,

    /// Use voice activity detection while re-aligning.
    pub vad: bool,

    /// Speech probability threshold used when `vad` is enabled.
    pub vad_threshold: f32,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            demucs: false,
            vad: false,
            vad_threshold: DEFAULT_VAD_THRESHOLD,
        }
    }
}

/// Options that control how a transcription is post-processed and exported.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for mapping user input into this type so that:
/// - the library remains reusable outside of a CLI context
/// - other frontends (batch jobs, services, tests) can construct options programmatically
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Whether to attempt word-level refinement after reconciliation.
    ///
    /// Refinement is best-effort: when it can't run, the reconciled result is used as-is.
    pub enable_refinement: bool,

    /// Flags passed through to the refinement backend.
    pub refine: RefineOptions,

    /// The formats written by [`crate::Pipeline::export`].
    pub output_types: Vec<OutputType>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            enable_refinement: true,
            refine: RefineOptions::default(),
            output_types: vec![OutputType::Txt, OutputType::Srt, OutputType::Vtt],
        }
    }
}
