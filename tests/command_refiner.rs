#![cfg(unix)]

use std::fs;
use std::path::Path;

use stable_subs::{
    CommandRefiner, Opts, Pipeline, RawTranscription, RefineOptions, StabilizationPath, Stabilizer,
};

/// Writes a fixed refined document to the `--output` path, and keeps a copy of its
/// arguments and input file next to the script.
const ECHO_REFINER: &str = r#"
out=""
for arg in "$@"; do
  if [ "$prev" = "--output" ]; then out="$arg"; fi
  if [ "$prev" = "--segments" ] || [ "$prev" = "--document" ]; then
    cp "$arg" "$(dirname "$0")/input.json"
  fi
  prev="$arg"
done
printf '%s\n' "$@" > "$(dirname "$0")/args.txt"
printf '%s' '{"text":"refined","segments":[{"text":"a","start":0.25,"end":0.75},{"text":"b","start":1.0,"end":1.5}]}' > "$out"
"#;

const FAILING_REFINER: &str = "echo 'model exploded' >&2\nexit 3\n";

fn script(dir: &Path, name: &str, body: &str) -> anyhow::Result<std::path::PathBuf> {
    let path = dir.join(name);
    fs::write(&path, body)?;
    Ok(path)
}

fn raw(audio: &Path) -> RawTranscription {
    let mut raw = RawTranscription::from_json(
        r#"{"text": "a b", "chunks": [
            {"text": "b", "timestamp": [1.0, 2.0]},
            {"text": "a", "timestamp": [0.0, 1.0]}
        ]}"#,
    )
    .expect("valid fixture");
    raw.audio_file_path = Some(audio.to_owned());
    raw
}

#[test]
fn primary_command_refines_and_receives_flags() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let audio = script(dir.path(), "audio.wav", "")?;
    let echo = script(dir.path(), "echo.sh", ECHO_REFINER)?;

    let stabilizer =
        Stabilizer::new().with_strategy(CommandRefiner::primary("sh").with_args([&echo]));
    let pipeline = Pipeline::with_stabilizer(
        stabilizer,
        Opts {
            refine: RefineOptions {
                demucs: true,
                vad: true,
                vad_threshold: 0.5,
            },
            ..Opts::default()
        },
    );

    let result = pipeline.process(&raw(&audio));

    assert!(result.stabilized);
    assert_eq!(result.stabilization_path, Some(StabilizationPath::Primary));
    assert_eq!(result.text, "refined");
    assert_eq!(result.segments_count, Some(2));
    assert_eq!(result.chunks, None);

    let args = fs::read_to_string(dir.path().join("args.txt"))?;
    let args: Vec<&str> = args.lines().collect();
    assert!(args.contains(&"--audio"));
    assert!(args.contains(&"--segments"));
    assert!(args.contains(&"--demucs"));
    assert!(args.contains(&"--vad"));
    assert!(args.windows(2).any(|w| w == ["--vad-threshold", "0.5"]));

    let input: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("input.json"))?)?;
    let segments = input.as_array().expect("segments input is a bare array");
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0]["text"], "a");
    Ok(())
}

#[test]
fn failing_primary_falls_back_to_document_shape() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let audio = script(dir.path(), "audio.wav", "")?;
    let failing = script(dir.path(), "fail.sh", FAILING_REFINER)?;
    let echo = script(dir.path(), "echo.sh", ECHO_REFINER)?;

    let stabilizer = Stabilizer::new()
        .with_strategy(CommandRefiner::primary("sh").with_args([&failing]))
        .with_strategy(CommandRefiner::fallback("sh").with_args([&echo]));
    let pipeline = Pipeline::with_stabilizer(stabilizer, Opts::default());

    let result = pipeline.process(&raw(&audio));

    assert!(result.stabilized);
    assert_eq!(result.stabilization_path, Some(StabilizationPath::Fallback));

    let args = fs::read_to_string(dir.path().join("args.txt"))?;
    assert!(args.lines().any(|a| a == "--document"));
    assert!(!args.lines().any(|a| a == "--demucs"));

    let input: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("input.json"))?)?;
    assert_eq!(input["text"], "a b");
    assert_eq!(input["segments"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn failing_backends_keep_reconciled_result() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let audio = script(dir.path(), "audio.wav", "")?;
    let failing = script(dir.path(), "fail.sh", FAILING_REFINER)?;

    let stabilizer = Stabilizer::new()
        .with_strategy(CommandRefiner::primary("sh").with_args([&failing]))
        .with_strategy(CommandRefiner::fallback("sh").with_args([&failing]));
    let pipeline = Pipeline::with_stabilizer(stabilizer, Opts::default());

    let input = raw(&audio);
    let result = pipeline.process(&input);
    let unrefined = Pipeline::new(Opts::default()).process(&input);

    assert_eq!(result, unrefined);

    let err = pipeline
        .stabilizer()
        .try_refine(&unrefined, &RefineOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("model exploded"));
    Ok(())
}
