//! Tracing subscriber initialization.
//!
//! Log verbosity is controlled via the standard `RUST_LOG` environment variable,
//! defaulting to `info` when unset. Examples:
//!
//! ```bash
//! RUST_LOG=debug
//! RUST_LOG=hostlink=debug,sqlx=warn
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init_telemetry() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
