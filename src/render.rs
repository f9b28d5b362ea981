//! Render reconciled segments into subtitle/transcript documents.
//!
//! Renderers only read the segment list, so several formats can be produced from the same
//! result independently (or in parallel).

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::Result;
use crate::json_array_encoder::JsonArrayEncoder;
use crate::output_type::OutputType;
use crate::segment_encoder::SegmentEncoder;
use crate::segments::Segment;
use crate::srt_encoder::SrtEncoder;
use crate::text_encoder::TextEncoder;
use crate::transcription::TranscriptionResult;
use crate::vtt_encoder::VttEncoder;

/// Stream `segments` into `w` in the requested format.
pub fn encode<W: Write>(output_type: OutputType, segments: &[Segment], w: W) -> Result<()> {
    // Explicit per-format encoders (no trait objects) keep lifetimes simple.
    match output_type {
        OutputType::Txt => run_encoder(&mut TextEncoder::new(w), segments),
        OutputType::Srt => run_encoder(&mut SrtEncoder::new(w), segments),
        OutputType::Vtt => run_encoder(&mut VttEncoder::new(w), segments),
        OutputType::Json => run_encoder(&mut JsonArrayEncoder::new(w), segments),
    }
}

/// Render `segments` into an in-memory document.
pub fn render(output_type: OutputType, segments: &[Segment]) -> Result<String> {
    let mut out = Vec::new();
    encode(output_type, segments, &mut out)?;
    Ok(String::from_utf8(out)?)
}

pub fn render_txt(segments: &[Segment]) -> Result<String> {
    render(OutputType::Txt, segments)
}

pub fn render_srt(segments: &[Segment]) -> Result<String> {
    render(OutputType::Srt, segments)
}

pub fn render_vtt(segments: &[Segment]) -> Result<String> {
    render(OutputType::Vtt, segments)
}

/// Write each requested format to `<dir>/<basename>.<ext>` and return the written paths.
///
/// `dir` is created if it doesn't exist. Formats are written in the order given; a repeated
/// format is only written once.
pub fn write_outputs(
    result: &TranscriptionResult,
    dir: &Path,
    basename: &str,
    formats: &[OutputType],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(formats.len());
    for &output_type in formats {
        let path = dir.join(format!("{basename}.{}", output_type.extension()));
        if written.contains(&path) {
            continue;
        }

        let file = File::create(&path)?;
        encode(output_type, &result.segments, BufWriter::new(file))?;

        info!(
            path = %path.display(),
            format = %output_type,
            segments = result.segments.len(),
            "wrote transcript"
        );
        written.push(path);
    }

    Ok(written)
}

fn run_encoder<E: SegmentEncoder>(encoder: &mut E, segments: &[Segment]) -> Result<()> {
    let run_res = segments
        .iter()
        .try_for_each(|seg| encoder.write_segment(seg));
    merge_run_and_close(run_res, encoder.close())
}

fn merge_run_and_close(run_res: Result<()>, close_res: Result<()>) -> Result<()> {
    match (run_res, close_res) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), _) => Err(err),
    }
}
