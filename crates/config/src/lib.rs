// Analysis service configuration and secrets.
//
// The credential is resolved from the environment exactly once, at
// startup, and carried in an explicit config object from then on. No
// other code reads environment variables. Keys are NEVER written to
// disk or logged.

use std::env;
use std::fmt;
use std::time::Duration;

/// Environment variable holding the bearer token for the reasoning
/// service.
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Optional override for the chat-completions endpoint base URL.
pub const API_BASE_VAR: &str = "INVERSA_API_BASE";

/// Optional override for the model identifier.
pub const MODEL_VAR: &str = "INVERSA_MODEL";

const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved configuration for the analysis client.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

impl AnalysisConfig {
    /// Resolve from the process environment. Missing or empty
    /// credential is a configuration error reported up front, before
    /// any network use.
    pub fn from_env() -> Result<AnalysisConfig, ConfigError> {
        let api_key = match env::var(API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => return Err(ConfigError::MissingKey),
        };
        Ok(AnalysisConfig {
            api_key,
            api_base: env::var(API_BASE_VAR).unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            model: env::var(MODEL_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Fixed configuration for tests, pointing at an injected endpoint.
    pub fn for_tests(api_base: impl Into<String>) -> AnalysisConfig {
        AnalysisConfig {
            api_key: "test-key".to_string(),
            api_base: api_base.into(),
            model: "test-model".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The credential environment variable is unset or empty.
    MissingKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingKey => {
                write!(f, "missing analysis credential: set {}", API_KEY_VAR)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message_names_variable() {
        let msg = ConfigError::MissingKey.to_string();
        assert!(msg.contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn test_test_config_shape() {
        let cfg = AnalysisConfig::for_tests("http://127.0.0.1:9999");
        assert_eq!(cfg.api_base, "http://127.0.0.1:9999");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
    }
}
