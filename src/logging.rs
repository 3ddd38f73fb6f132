//! Diagnostic logging.
//!
//! Progress lines go to stdout through [`crate::output`]; everything here is
//! `tracing` output on stderr, quiet by default. Set `SQUARE_CROP_LOG` to an
//! `EnvFilter` directive (`debug`, `square_crop=trace`, ...) to see more.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV_VAR: &str = "SQUARE_CROP_LOG";
const DEFAULT_FILTER: &str = "warn";

fn filter_from(directive: Option<String>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    let filter = filter_from(std::env::var(LOG_ENV_VAR).ok());

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init();
}
