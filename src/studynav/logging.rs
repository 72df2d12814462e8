//! Diagnostic logging.
//!
//! The library only emits `tracing` events; the binary installs the
//! subscriber. Diagnostics go to stderr so command output on stdout stays
//! clean for pipes. Filter directives come from `STUDYNAV_LOG`, falling back
//! to `studynav=debug` with `--verbose` and `warn` otherwise.

use crate::config::LOG_ENV;
use tracing_subscriber::{fmt, EnvFilter};

pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "studynav=debug"
    } else {
        "warn"
    }
}

pub fn build_filter(env_value: Option<&str>, verbose: bool) -> EnvFilter {
    env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directives(verbose)))
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let env_value = std::env::var(LOG_ENV).ok();
    let _ = fmt()
        .with_env_filter(build_filter(env_value.as_deref(), verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
