//! # Praxis Config
//!
//! Typed configuration for praxis applications: where actions live, where
//! they are mounted, and how logging is set up.
//!
//! ```toml
//! [actions]
//! dir = "server/actions"
//! extension = "rs"
//!
//! [server]
//! route_prefix = "/api/_actions"
//! base_url = "http://localhost:3000"
//!
//! [telemetry]
//! service_name = "blog"
//!
//! [telemetry.logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! Every value can be overridden with `PREFIX__SECTION__KEY` environment
//! variables, e.g. `PRAXIS__TELEMETRY__LOGGING__LEVEL=debug`. Unknown fields
//! in files are rejected.

#![doc(html_root_url = "https://docs.rs/praxis-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::PraxisConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{ActionsConfig, LogFormat, LoggingConfig, ServerConfig, TelemetryConfig};
