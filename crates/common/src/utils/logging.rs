use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Lifecycle events from the binary and the service layer; everything else quiet.
const COMPACT_FILTER: &str = "warn,chirpy=info,service=info";
/// Same, plus store read/write cycles.
const JSON_FILTER: &str = "warn,chirpy=info,service=info,service::storage=debug";

/// Initialize tracing subscriber with compact output on stderr.
/// - Respects `RUST_LOG` if set
/// - Falls back to `warn,chirpy=info,service=info`
///
/// stdout stays free for command output.
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(COMPACT_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output on stderr.
/// - Respects `RUST_LOG` if set, e.g. `RUST_LOG=warn,service::storage=trace`
pub fn init_logging_json() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(JSON_FILTER));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .json()
        .with_writer(io::stderr)
        .try_init();
}

/// Pick the formatter by name; anything other than `json` gets the compact one.
pub fn init_logging(format: &str) {
    if format.eq_ignore_ascii_case("json") {
        init_logging_json();
    } else {
        init_logging_default();
    }
}
