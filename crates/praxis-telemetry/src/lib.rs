//! # Praxis Telemetry
//!
//! Logging setup and shared observability names for praxis.
//!
//! - [`logging`]: `tracing-subscriber` initialisation and standard field names
//! - [`metrics`]: metric names recorded through the `metrics` facade

#![doc(html_root_url = "https://docs.rs/praxis-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
