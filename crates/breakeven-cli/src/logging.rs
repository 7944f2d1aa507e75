use std::io;
use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log-level` nor `RUST_LOG` is set.
const DEFAULT_FILTER: &str = "warn";

fn make_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|_| {
            eprintln!("invalid log level '{directive}', using '{DEFAULT_FILTER}'");
            EnvFilter::new(DEFAULT_FILTER)
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Initialise the tracing subscriber. Call once at startup.
///
/// Logs go to stderr so stdout stays machine-readable for json/csv output.
pub fn init(level: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(make_filter(level))
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
