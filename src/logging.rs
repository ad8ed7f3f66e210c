// src/logging.rs
//! Tracing subscriber setup for binaries and tests.
//!
//! The library only emits events; nothing is printed until a binary calls
//! [`init`].

use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "A11YMERGE_LOG";

static INIT: Once = Once::new();

/// Installs a stderr fmt subscriber.
///
/// Reads `A11YMERGE_LOG` (e.g. `a11ymerge_core=debug`), falling back to
/// `a11ymerge_core=info`, or `=debug` when `verbose`. Only the first call has
/// any effect.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "a11ymerge_core=debug"
        } else {
            "a11ymerge_core=info"
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
