//! Root configuration type.

use serde::{Deserialize, Serialize};

use crate::{ActionsConfig, ConfigError, LogFormat, ServerConfig, TelemetryConfig};

/// Complete praxis configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use praxis_config::PraxisConfig;
///
/// let config = PraxisConfig::default();
/// assert_eq!(config.server.route_prefix, "/api/_actions");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct PraxisConfig {
    /// Action discovery.
    #[serde(default)]
    pub actions: ActionsConfig,

    /// Action endpoint.
    #[serde(default)]
    pub server: ServerConfig,

    /// Telemetry.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl PraxisConfig {
    /// Pretty logs at `debug` with span events.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.span_events = true;
        config.telemetry.logging.include_location = true;
        config
    }

    /// JSON logs at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Checks values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actions.dir.trim().is_empty() {
            return Err(ConfigError::invalid_value("actions.dir", "must not be empty"));
        }

        let extension = &self.actions.extension;
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::invalid_value(
                "actions.extension",
                format!("expected an extension without the dot, got '{extension}'"),
            ));
        }

        if !self.server.route_prefix.starts_with('/') {
            return Err(ConfigError::invalid_value(
                "server.route_prefix",
                "must start with '/'",
            ));
        }

        let base_url = &self.server.base_url;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::invalid_value(
                "server.base_url",
                format!("expected an http(s) URL, got '{base_url}'"),
            ));
        }

        if self.telemetry.service_name.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.service_name",
                "must not be empty",
            ));
        }

        if self.telemetry.logging.enabled {
            praxis_telemetry::create_env_filter(&self.telemetry.logging.level)
                .map_err(|e| ConfigError::invalid_value("telemetry.logging.level", e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PraxisConfig::default().validate().is_ok());
        assert!(PraxisConfig::development().validate().is_ok());
    }

    #[test]
    fn test_development_preset() {
        let config = PraxisConfig::development();
        assert_eq!(config.telemetry.logging.level, "debug");
        assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
        assert!(!config.telemetry.log_config().json_format);
    }

    #[test]
    fn test_validate_route_prefix() {
        let mut config = PraxisConfig::default();
        config.server.route_prefix = "api".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "server.route_prefix"
        ));
    }

    #[test]
    fn test_validate_extension() {
        let mut config = PraxisConfig::default();
        config.actions.extension = ".rs".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_base_url() {
        let mut config = PraxisConfig::default();
        config.server.base_url = "localhost:3000".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "server.base_url"
        ));
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = PraxisConfig::default();
        config.telemetry.logging.level = "praxis=loud".to_string();
        assert!(config.validate().is_err());

        config.telemetry.logging.enabled = false;
        assert!(config.validate().is_ok());
    }
}
