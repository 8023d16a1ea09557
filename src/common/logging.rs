//! Logging setup using tracing
//!
//! Logs go to stderr so stdout only carries tool output and the final result.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for the given verbosity
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "warn"
    }
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` takes precedence; otherwise `info` with `--verbose` and `warn` without.
/// Calling this twice is harmless, the second call leaves the first subscriber in place.
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();

    if let Err(e) = result {
        tracing::debug!("tracing subscriber already initialized: {}", e);
    }
}
