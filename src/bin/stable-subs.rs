use std::fs;
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use stable_subs::logging;
use stable_subs::opts::DEFAULT_VAD_THRESHOLD;
use stable_subs::render::encode;
use stable_subs::{
    CommandRefiner, Opts, OutputType, Pipeline, RawTranscription, RefineOptions, Stabilizer,
};

fn main() -> Result<()> {
    let params = Params::parse();
    logging::init_with_default(logging::level_for_verbosity(params.verbose));

    let mut raw = read_raw(&params.input)?;
    if let Some(audio) = &params.audio_path {
        raw.audio_file_path = Some(audio.clone());
    }

    let pipeline = build_pipeline(&params);
    let result = pipeline.process(&raw);

    let Some(dir) = &params.output_dir else {
        let [output_type] = params.output_types.as_slice() else {
            bail!("printing to stdout supports exactly one output type; pass --output-dir for more");
        };
        let stdout = io::stdout();
        encode(*output_type, &result.segments, BufWriter::new(stdout.lock()))?;
        return Ok(());
    };

    let basename = params
        .basename
        .clone()
        .unwrap_or_else(|| default_basename(&params.input, raw.audio_file_path.as_deref()));

    let written = pipeline
        .export(&result, dir, &basename)
        .with_context(|| format!("failed to write outputs to {}", dir.display()))?;
    for path in written {
        println!("{}", path.display());
    }

    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "stable-subs")]
#[command(about = "Repair transcription timestamps and export subtitles")]
struct Params {
    /// Raw transcription JSON from the speech-to-text engine (`-` reads stdin).
    #[arg(short = 'i', long = "input")]
    pub input: String,

    /// Source audio path; overrides the one recorded in the transcription.
    #[arg(short = 'a', long = "audio")]
    pub audio_path: Option<PathBuf>,

    /// Output format(s) to render.
    #[arg(
        short = 'o',
        long = "output-type",
        value_enum,
        num_args = 1..,
        default_values_t = [OutputType::Srt]
    )]
    pub output_types: Vec<OutputType>,

    /// Directory to write `<basename>.<ext>` files into. Without it, output goes to stdout.
    #[arg(short = 'd', long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Basename for written files (defaults to the input file's stem).
    #[arg(short = 'b', long = "basename")]
    pub basename: Option<String>,

    /// Refinement program called with the primary (align) call shape.
    #[arg(long = "refiner")]
    pub refiner: Option<PathBuf>,

    /// Refinement program called with the fallback (document) call shape.
    #[arg(long = "fallback-refiner")]
    pub fallback_refiner: Option<PathBuf>,

    /// Skip refinement even when a refiner is configured.
    #[arg(long = "no-refine", default_value_t = false)]
    pub no_refine: bool,

    /// Ask the refiner to separate vocals before re-aligning.
    #[arg(long = "demucs", default_value_t = false)]
    pub demucs: bool,

    /// Ask the refiner to use voice activity detection.
    #[arg(long = "vad", default_value_t = false)]
    pub vad: bool,

    /// Voice activity threshold passed to the refiner.
    #[arg(long = "vad-threshold", default_value_t = DEFAULT_VAD_THRESHOLD)]
    pub vad_threshold: f32,

    /// Log more (repeatable); `STABLE_SUBS_LOG` takes precedence.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn build_pipeline(params: &Params) -> Pipeline {
    let mut stabilizer = Stabilizer::new();
    if let Some(program) = &params.refiner {
        stabilizer = stabilizer.with_strategy(CommandRefiner::primary(program));
    }
    if let Some(program) = &params.fallback_refiner {
        stabilizer = stabilizer.with_strategy(CommandRefiner::fallback(program));
    }

    let opts = Opts {
        enable_refinement: !params.no_refine,
        refine: RefineOptions {
            demucs: params.demucs,
            vad: params.vad,
            vad_threshold: params.vad_threshold,
        },
        output_types: params.output_types.clone(),
    };

    Pipeline::with_stabilizer(stabilizer, opts)
}

fn read_raw(input: &str) -> Result<RawTranscription> {
    let json = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read transcription from stdin")?;
        buf
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read {input}"))?
    };

    RawTranscription::from_json(&json).context("failed to parse transcription JSON")
}

fn default_basename(input: &str, audio: Option<&Path>) -> String {
    let from_input = (input != "-").then(|| Path::new(input));
    from_input
        .or(audio)
        .and_then(Path::file_stem)
        .and_then(|stem| stem.to_str())
        .map(str::to_owned)
        .unwrap_or_else(|| "transcript".to_owned())
}
