use std::io;
use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

pub const DEFAULT_FILTER: &str = "perftools=info";

/// Initialise tracing subscriber once per process.
///
/// Diagnostics go to stderr; stdout is reserved for the timer reports.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = fmt()
            .with_env_filter(env_filter())
            .with_writer(io::stderr)
            .with_target(false)
            .compact()
            .try_init();
    });
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
