//! Telemetry initialization (tracing/tracing-subscriber) for hosts embedding the engine.
//!
//! Behavior:
//! - PRACTICE_LOG controls the filter (e.g. "debug" or detailed directives like
//!   "info,problem=debug,practice=debug,difficulty=debug").
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Targets used by the engine: `problem`, `practice`, `difficulty`, `practice_engine`.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVES: &str = "info,problem=debug,practice=debug";

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("PRACTICE_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // A host or an earlier test may already own the global subscriber.
    let _ = match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().try_init(),
        _ => builder.try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_tracing();
        init_tracing();
        tracing::info!(target: "practice_engine", "telemetry ready");
    }
}
