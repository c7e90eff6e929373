//! Configuration validation.
//!
//! Range checks applied after [`Config::from_env`](super::Config::from_env)
//! has parsed every variable.

use super::Config;
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `ANTHROPIC_API_KEY` must not be empty
/// - `REQUEST_TIMEOUT_MS` must be between 1000 and 300000
/// - `REMINDER_TIMEOUT_MS` must be between 1000 and `REQUEST_TIMEOUT_MS`
/// - `BIND_ADDRESS` must be a socket address
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.api_key.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "ANTHROPIC_API_KEY".into(),
            reason: "must not be empty".into(),
        });
    }

    if config.request_timeout_ms < MIN_TIMEOUT_MS || config.request_timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::InvalidValue {
            var: "REQUEST_TIMEOUT_MS".into(),
            reason: format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        });
    }

    if config.reminder_timeout_ms < MIN_TIMEOUT_MS
        || config.reminder_timeout_ms > config.request_timeout_ms
    {
        return Err(ConfigError::InvalidValue {
            var: "REMINDER_TIMEOUT_MS".into(),
            reason: format!(
                "must be between {MIN_TIMEOUT_MS} and REQUEST_TIMEOUT_MS ({} ms)",
                config.request_timeout_ms
            ),
        });
    }

    if config.bind_address.parse::<std::net::SocketAddr>().is_err() {
        return Err(ConfigError::InvalidValue {
            var: "BIND_ADDRESS".into(),
            reason: format!("'{}' is not a socket address", config.bind_address),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecretString;
    use test_case::test_case;

    fn valid_config() -> Config {
        Config::for_tests(SecretString::new("sk-ant-test-key"))
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_api_key() {
        let config = Config::for_tests(SecretString::new(""));
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var, .. } if var == "ANTHROPIC_API_KEY"));
    }

    #[test_case(999 ; "below minimum")]
    #[test_case(300_001 ; "above maximum")]
    fn test_request_timeout_out_of_range(timeout: u64) {
        let mut config = valid_config();
        config.request_timeout_ms = timeout;
        config.reminder_timeout_ms = MIN_TIMEOUT_MS;
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { var, .. } if var == "REQUEST_TIMEOUT_MS")
        );
    }

    #[test]
    fn test_reminder_timeout_cannot_exceed_request_timeout() {
        let mut config = valid_config();
        config.request_timeout_ms = 5_000;
        config.reminder_timeout_ms = 6_000;
        let err = validate_config(&config).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { var, .. } if var == "REMINDER_TIMEOUT_MS")
        );
    }

    #[test]
    fn test_invalid_bind_address() {
        let mut config = valid_config();
        config.bind_address = "localhost".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var, .. } if var == "BIND_ADDRESS"));
    }

    #[test_case(MIN_TIMEOUT_MS ; "timeout at minimum")]
    #[test_case(MAX_TIMEOUT_MS ; "timeout at maximum")]
    fn test_boundary_timeouts(timeout: u64) {
        let mut config = valid_config();
        config.request_timeout_ms = timeout;
        config.reminder_timeout_ms = MIN_TIMEOUT_MS;
        assert!(validate_config(&config).is_ok());
    }
}
