//! Diagnostic logging on stderr.
//!
//! Progress lines are ordinary stdout output; this subscriber only carries
//! `tracing` diagnostics so they never interleave with a JSON summary.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a default level.
fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize the stderr subscriber. `RUST_LOG` overrides the `-v` level.
pub fn init_cli_logging(verbosity: u8) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy();

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
