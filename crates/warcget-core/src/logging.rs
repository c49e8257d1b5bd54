//! Logging init: tracing to stderr with env-filter control.
//!
//! warcget runs as a trigger-driven batch job, so process output is the log
//! sink (the invoking host captures it); there is no log file.

use tracing_subscriber::EnvFilter;

/// Initialize structured logging to stderr. Safe to call once per process;
/// a second call is a no-op (e.g. in tests sharing a process).
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,warcget=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
