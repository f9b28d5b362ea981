//! Refinement through an external program.
//!
//! The program is invoked as:
//!
//! ```text
//! <program> [args...] --audio <audio> --segments <input.json> --output <out.json> [flags]   (align)
//! <program> [args...] --document <input.json> --output <out.json> [flags]                (document)
//! ```
//!
//! where `flags` are `--demucs`, `--vad` and `--vad-threshold <f>`. For `--segments` the input
//! file is a bare JSON array of the freshly transcribed segments; for `--document` it is the
//! whole transcription as an engine-style JSON object. Either way the program writes its own
//! JSON document (`text`, `segments`/`chunks`, `language`) to the `--output` path and exits
//! zero.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::refiner::{RefineRequest, Refiner};
use crate::transcription::{RawTranscription, StabilizationPath};
use crate::{Error, Result};

/// How much of the program's stderr we keep in error messages.
const MAX_STDERR_CHARS: usize = 2000;

/// Which of the backend's two entry points to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    /// Re-align the existing segments against the audio.
    Align,

    /// Post-process a full transcription document.
    Document,
}

/// A [`Refiner`] that shells out to an external program.
#[derive(Debug, Clone)]
pub struct CommandRefiner {
    program: PathBuf,
    args: Vec<OsString>,
    shape: CallShape,
}

impl CommandRefiner {
    pub fn new(program: impl Into<PathBuf>, shape: CallShape) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            shape,
        }
    }

    /// The primary entry point: [`CallShape::Align`].
    pub fn primary(program: impl Into<PathBuf>) -> Self {
        Self::new(program, CallShape::Align)
    }

    /// The fallback entry point: [`CallShape::Document`].
    pub fn fallback(program: impl Into<PathBuf>) -> Self {
        Self::new(program, CallShape::Document)
    }

    /// Extra arguments placed before the generated ones (e.g. a script path or subcommand).
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn shape(&self) -> CallShape {
        self.shape
    }

    fn stabilization_path(&self) -> StabilizationPath {
        match self.shape {
            CallShape::Align => StabilizationPath::Primary,
            CallShape::Document => StabilizationPath::Fallback,
        }
    }

    fn fail(&self, message: impl Into<String>) -> Error {
        Error::refinement(self.stabilization_path(), message)
    }
}

impl Refiner for CommandRefiner {
    type Output = RawTranscription;

    fn path(&self) -> StabilizationPath {
        self.stabilization_path()
    }

    fn is_available(&self) -> bool {
        resolve_program(&self.program).is_some()
    }

    fn refine(&self, request: &RefineRequest<'_>) -> Result<RawTranscription> {
        let program = resolve_program(&self.program)
            .ok_or_else(|| self.fail(format!("program not found: {}", self.program.display())))?;

        // Scratch files live for the duration of the call only.
        let scratch = tempfile::tempdir()?;
        let input_path = scratch.path().join("input.json");
        let output_path = scratch.path().join("output.json");

        let mut cmd = Command::new(&program);
        cmd.args(&self.args);

        match self.shape {
            CallShape::Align => {
                let transcribed = request.transcribe();
                fs::write(&input_path, serde_json::to_vec(&transcribed.segments)?)?;
                cmd.arg("--audio")
                    .arg(request.audio_path)
                    .arg("--segments")
                    .arg(&input_path);
            }
            CallShape::Document => {
                fs::write(&input_path, serde_json::to_vec(&request.document())?)?;
                cmd.arg("--document").arg(&input_path);
            }
        }

        cmd.arg("--output").arg(&output_path);

        let options = request.options;
        if options.demucs {
            cmd.arg("--demucs");
        }
        if options.vad {
            cmd.arg("--vad");
        }
        cmd.arg("--vad-threshold")
            .arg(options.vad_threshold.to_string());

        debug!(program = %program.display(), shape = ?self.shape, "running refinement program");

        let output = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| self.fail(format!("failed to run {}: {err}", program.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.fail(format!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                tail(stderr.trim(), MAX_STDERR_CHARS)
            )));
        }

        let json = fs::read_to_string(&output_path)
            .map_err(|err| self.fail(format!("no output document: {err}")))?;
        RawTranscription::from_json(&json)
            .map_err(|err| self.fail(format!("malformed output document: {err}")))
    }
}

/// Locate `program` the way a shell would: a path with a directory component is used as-is,
/// a bare name is looked up on `PATH`.
fn resolve_program(program: &Path) -> Option<PathBuf> {
    if program.as_os_str().is_empty() {
        return None;
    }

    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_owned());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths).find_map(|dir| {
        let candidate = dir.join(program);
        if candidate.is_file() {
            return Some(candidate);
        }
        let with_suffix = candidate.with_extension(env::consts::EXE_EXTENSION);
        (!env::consts::EXE_EXTENSION.is_empty() && with_suffix.is_file()).then_some(with_suffix)
    })
}

/// The last `max` characters of `s`.
fn tail(s: &str, max: usize) -> &str {
    let count = s.chars().count();
    if count <= max {
        return s;
    }
    let skip = count - max;
    match s.char_indices().nth(skip) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}
