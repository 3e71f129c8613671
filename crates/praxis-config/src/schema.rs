//! Configuration section types.

use praxis_core::DEFAULT_ROUTE_PREFIX;
use serde::{Deserialize, Serialize};

/// Action discovery section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ActionsConfig {
    /// Directory scanned for action files, relative to the crate root.
    #[serde(default = "default_actions_dir")]
    pub dir: String,

    /// Action file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            dir: default_actions_dir(),
            extension: default_extension(),
        }
    }
}

fn default_actions_dir() -> String {
    "server/actions".to_string()
}

fn default_extension() -> String {
    "rs".to_string()
}

/// Action endpoint section.
///
/// # Example
///
/// ```
/// use praxis_config::ServerConfig;
///
/// let config = ServerConfig {
///     route_prefix: "/rpc".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(config.base_url, "http://localhost:3000");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Path prefix actions are mounted under.
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    /// Public URL clients use to reach the action server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_route_prefix(),
            base_url: default_base_url(),
        }
    }
}

fn default_route_prefix() -> String {
    DEFAULT_ROUTE_PREFIX.to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Emit span open/close events.
    #[serde(default)]
    pub span_events: bool,

    /// Include file and line in events.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            span_events: false,
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telemetry section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Service name reported in logs.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TelemetryConfig {
    /// Converts this section into a logging setup for `praxis_telemetry`.
    pub fn log_config(&self) -> praxis_telemetry::LogConfig {
        praxis_telemetry::LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            json_format: self.logging.format == LogFormat::Json,
            span_events: self.logging.span_events,
            file_line_info: self.logging.include_location,
            service_name: self.service_name.clone(),
            ..praxis_telemetry::LogConfig::default()
        }
    }
}

fn default_service_name() -> String {
    praxis_telemetry::logging::DEFAULT_SERVICE_NAME.to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_config_default() {
        let config = ActionsConfig::default();
        assert_eq!(config.dir, "server/actions");
        assert_eq!(config.extension, "rs");
    }

    #[test]
    fn test_server_config_deserialize() {
        let config: ServerConfig = toml::from_str(r#"route_prefix = "/rpc""#).unwrap();
        assert_eq!(config.route_prefix, "/rpc");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_server_config_unknown_field_rejected() {
        let result: Result<ServerConfig, _> = toml::from_str(
            r#"
            route_prefix = "/rpc"
            http_addr = "0.0.0.0:8080"
        "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_deserialize() {
        let format: LogFormat = serde_json::from_str(r#""pretty""#).unwrap();
        assert_eq!(format, LogFormat::Pretty);
        let format: LogFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, LogFormat::Json);
        assert!(serde_json::from_str::<LogFormat>(r#""xml""#).is_err());
    }

    #[test]
    fn test_log_config_conversion() {
        let telemetry = TelemetryConfig {
            service_name: "blog".to_string(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                include_location: true,
                ..LoggingConfig::default()
            },
        };

        let log = telemetry.log_config();
        assert_eq!(log.service_name, "blog");
        assert_eq!(log.level, "debug");
        assert!(!log.json_format);
        assert!(log.file_line_info);
        assert!(log.include_target);
    }
}
