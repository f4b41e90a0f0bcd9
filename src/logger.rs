//! # Logging Infrastructure Module
//!
//! Centralized diagnostic logging for the application, built on the `tracing`
//! ecosystem. This is the developer-facing log (console); the sensor samples
//! themselves go to the CSV file handled by [`crate::recorder`].
//!
//! ## Log Levels
//!
//! - **ERROR**: Port open failures, log file write errors
//! - **WARN**: Missing configuration, reader thread ending on an I/O error
//! - **INFO**: Session start/pause/stop, configuration saved
//! - **DEBUG**: Discarded serial lines, individual emitted readings
//!
//! ## Environment Configuration
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=bme280_logger=debug` - Show all logs from this application
//! - `RUST_LOG=warn` - Show only warnings and errors globally
//! - `RUST_LOG=bme280_logger::sensor=debug,warn` - Debug the serial side only

use tracing_subscriber::{fmt, EnvFilter, prelude::*};
use once_cell::sync::Lazy;

/// Initialize the global logger.
///
/// Uses `Lazy<()>` so the subscriber is installed exactly once; repeated calls
/// (tests, benches) are no-ops. Falls back to `bme280_logger=debug,warn` when
/// `RUST_LOG` is not set.
///
/// Should be called once from `main.rs`.
pub fn init_logger() -> Result<(), Box<dyn std::error::Error>> {
    static INIT: Lazy<()> = Lazy::new(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("bme280_logger=debug,warn"));

        // try_init: another subscriber may already be installed by a test harness
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer()
                .with_target(false)
                .with_thread_ids(true)  // reader thread vs UI thread
                .with_level(true)
                .with_line_number(true)
            )
            .try_init();
    });

    Lazy::force(&INIT);
    Ok(())
}

/// Convenience re-export of log macros
///
/// ```rust
/// use bme280_logger::logger::log;
///
/// log::info!("Opening serial port {}", "/dev/ttyUSB0");
/// log::debug!(temperature = 21.5, "Reading emitted");
/// ```
pub mod log {
    pub use tracing::{debug, error, info, warn};
}
