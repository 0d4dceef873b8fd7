//! Logging initialization for the CLI.
//!
//! Every diagnostic goes to stderr, leaving stdout for command results:
//! the summary line, or the single `--json` object. Library crates never
//! log; they hand warnings and errors back to the commands.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Level for the `distfix` targets at a given `-v` count.
fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// `RUST_LOG` (default `warn`) for everything else, raised to the
/// verbosity level for distfix's own targets.
fn build_filter(verbosity: u8) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match format!("distfix={}", level_for(verbosity)).parse() {
        Ok(directive) => base.add_directive(directive),
        Err(_) => base,
    }
}

/// Install the global subscriber.
///
/// With `json`, records are JSON lines carrying the current command span,
/// so a `--json` run stays machine-readable on both streams. Otherwise they
/// are plain lines without targets, which is how warnings such as
/// `warning[UNRESOLVED_SPECIFIER]: ...` reach the terminal.
pub fn init(verbosity: u8, json: bool) {
    let registry = tracing_subscriber::registry().with(build_filter(verbosity));

    if json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(std::io::stderr);
        registry.with(layer).init();
    } else {
        let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
        registry.with(layer).init();
    }
}
