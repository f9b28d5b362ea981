use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding an `EnvFilter` directive, e.g. `stable_subs::reconciler=debug`.
pub const LOG_ENV: &str = "STABLE_SUBS_LOG";

/// Initialize JSON logging on stderr at `error` level unless `STABLE_SUBS_LOG` says otherwise.
pub fn init() {
    init_with_default(LevelFilter::ERROR);
}

/// Initialize JSON logging on stderr with `level` as the fallback when the environment is
/// silent. Stdout stays free for rendered subtitles.
///
/// Later calls are no-ops once a global subscriber is installed.
pub fn init_with_default(level: LevelFilter) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(false),
        )
        .try_init();
}

/// Map a repeated `-v` count onto a level: 0 → error, 1 → warn, 2 → info, 3+ → debug.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_env_var(LOG_ENV)
        .with_default_directive(level.into())
        .from_env_lossy()
}
