//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the tracing/logging system.
///
/// Reads the `DISAGG_LOG` environment variable for per-module log levels.
/// Format: `DISAGG_LOG=disagg_engine=debug,disagg_storage=warn`
///
/// Falls back to `disagg=info` if `DISAGG_LOG` is not set or is invalid.
/// Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("DISAGG_LOG")
            .unwrap_or_else(|_| EnvFilter::new("disagg=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
