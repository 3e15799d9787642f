//! # Trustify Telemetry
//!
//! Structured logging for the Trustify client. Every crate logs through
//! `tracing`; the binary calls [`init_telemetry`] once at startup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trustify_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TC_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `TC_JSON_LOGS` | `false` (`true` in containers) | JSON lines instead of pretty output |
//! | `TC_CONSOLE_OUTPUT` | `true` | Write logs to stderr |
//! | `OTEL_SERVICE_NAME` | `trustify-client` | Service name in the startup line |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Initialize logging.
///
/// Returns a guard to hold for the lifetime of the application; dropping it
/// logs the shutdown line.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;

    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        level = %config.log_level,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}
