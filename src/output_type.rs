use std::fmt;
use std::str::FromStr;

#[cfg(feature = "cli")]
use clap::ValueEnum;

use crate::{Error, Result};

/// The supported output formats for rendered segments.
///
/// Integration notes:
/// - With the `cli` feature, `ValueEnum` lets this enum be used directly as a `clap` flag.
/// - Each variant maps to a concrete `SegmentEncoder` implementation.
/// - Each variant is conventionally persisted as `<basename>.<extension>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
pub enum OutputType {
    /// Plain text, one segment per line.
    Txt,

    /// SubRip subtitles.
    Srt,

    /// WebVTT subtitles.
    Vtt,

    /// Segments as a JSON array.
    Json,
}

impl OutputType {
    pub const ALL: [OutputType; 4] = [Self::Txt, Self::Srt, Self::Vtt, Self::Json];

    /// File extension (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Json => "json",
        }
    }

    /// Pick the format from a file extension, with or without a leading dot.
    pub fn from_extension(ext: &str) -> Result<Self> {
        ext.trim().trim_start_matches('.').parse()
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputType {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Txt),
            "srt" => Ok(Self::Srt),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "json" => Ok(Self::Json),
            other => Err(Error::UnsupportedFormat(other.to_owned())),
        }
    }
}
