use std::error::Error as StdError;
use std::path::PathBuf;

use thiserror::Error;

use crate::transcription::StabilizationPath;

/// The crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    /// The caller asked for an output format we don't render.
    #[error("unsupported output format '{0}' (expected one of: txt, srt, vtt, json)")]
    UnsupportedFormat(String),

    /// Refinement needs the source audio on disk.
    #[error("source audio not found: {}", display_audio(.0))]
    MissingAudio(Option<PathBuf>),

    /// A single refinement strategy failed.
    #[error("{path} refinement failed: {message}")]
    Refinement {
        path: StabilizationPath,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn refinement(path: StabilizationPath, message: impl Into<String>) -> Self {
        Self::Refinement {
            path,
            message: message.into(),
        }
    }
}

fn display_audio(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<unset>".to_owned(),
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_audio_message_names_the_path() {
        let err = Error::MissingAudio(Some(PathBuf::from("/tmp/nope.wav")));
        assert!(err.to_string().contains("/tmp/nope.wav"));

        let err = Error::MissingAudio(None);
        assert!(err.to_string().contains("<unset>"));
    }

    #[test]
    fn refinement_message_names_the_strategy() {
        let err = Error::refinement(StabilizationPath::Fallback, "exit status 2");
        assert_eq!(err.to_string(), "fallback refinement failed: exit status 2");
    }
}
