//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_bridge(config, &mut result);
        Self::validate_cdp(config, &mut result);

        result
    }

    fn validate_bridge(config: &Config, result: &mut ValidationResult) {
        let bridge = &config.bridge;

        if bridge.host.is_empty() {
            result.add_error(ValidationError::new("bridge.host", "Host cannot be empty"));
        }

        // The extension polls a fixed port; an ephemeral one is only useful in tests.
        if bridge.port == 0 {
            result.add_warning(ValidationWarning::new(
                "bridge.port",
                "Port 0 binds an ephemeral port the extension cannot find",
            ));
        }

        if bridge.command_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "bridge.command_timeout_secs",
                "command_timeout_secs must be greater than 0",
            ));
        }

        if bridge.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "bridge.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        }

        // Expiry runs on every claim, so a zero TTL can drop a result before its waiter reads it.
        if bridge.result_ttl_secs == 0 {
            result.add_error(ValidationError::new(
                "bridge.result_ttl_secs",
                "result_ttl_secs must be greater than 0",
            ));
        } else if bridge.result_ttl_secs < bridge.command_timeout_secs {
            result.add_warning(ValidationWarning::new(
                "bridge.result_ttl_secs",
                "results may expire before a waiting client reads them",
            ));
        }
    }

    fn validate_cdp(config: &Config, result: &mut ValidationResult) {
        let cdp = &config.cdp;

        if !cdp.http_endpoint.starts_with("http://") && !cdp.http_endpoint.starts_with("https://") {
            result.add_error(ValidationError::new(
                "cdp.http_endpoint",
                "http_endpoint must be an http(s) URL",
            ));
        }

        if let Some(url) = &cdp.page_url {
            if !url.starts_with("ws://") && !url.starts_with("wss://") {
                result.add_error(ValidationError::new(
                    "cdp.page_url",
                    "page_url must be a ws(s) URL",
                ));
            }
        }

        if cdp.connect_timeout_secs == 0 || cdp.call_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "cdp",
                "connect and call timeouts must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let result = ConfigValidator::validate(&Config::default());
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_zero_command_timeout_rejected() {
        let mut config = Config::default();
        config.bridge.command_timeout_secs = 0;
        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].path, "bridge.command_timeout_secs");
    }

    #[test]
    fn test_port_zero_is_warning() {
        let mut config = Config::default();
        config.bridge.port = 0;
        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "bridge.port"));
    }

    #[test]
    fn test_bad_page_url_rejected() {
        let mut config = Config::default();
        config.cdp.page_url = Some("http://localhost:9222/json".to_string());
        let err = ConfigValidator::validate(&config).into_result().unwrap_err();
        assert!(err.to_string().contains("cdp.page_url"));
    }

    #[test]
    fn test_short_ttl_warns() {
        let mut config = Config::default();
        config.bridge.result_ttl_secs = 1;
        let warnings = ConfigValidator::validate(&config).into_result().unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_zero_result_ttl_rejected() {
        let mut config = Config::default();
        config.bridge.result_ttl_secs = 0;
        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].path, "bridge.result_ttl_secs");
        assert!(result.warnings.is_empty());
    }
}
