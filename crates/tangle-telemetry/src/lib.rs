//! # Tangle Telemetry
//!
//! Structured logging for the finality workspace.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tangle_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config).expect("Failed to init logging");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FG_SERVICE_NAME` | `finality-gadget` | Service name |
//! | `FG_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `FG_CONSOLE_OUTPUT` | `true` | Write log lines to stdout |
//! | `FG_JSON_LOGS` | `false` | JSON formatted log lines |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install logging subscriber: {0}")]
    LoggingInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
