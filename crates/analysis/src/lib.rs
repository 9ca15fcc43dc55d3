// Client for the external reasoning service.
//
// One synchronous chat-completion call per request, no retries. The
// service's answer is expected to be a JSON object with the report
// fields, optionally wrapped in a Markdown code fence; anything else is
// a format error. Report content is passed through untouched.

use std::fmt;

use inversa_config::{AnalysisConfig, ConfigError};
use inversa_protocol::AnalysisReport;

const SYSTEM_PROMPT: &str = "You are a rigorous mathematical analysis assistant. \
You study real functions of one variable and answer only with a JSON object, \
no prose outside it.";

/// Capability boundary for the qualitative study. The HTTP pipeline is
/// written against this trait so tests never touch the network.
pub trait Analyze: Send + Sync {
    fn analyze(&self, original: &str, inverse: &str) -> Result<AnalysisReport, AnalysisError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Credential was never configured; detected before any network use
    Config(ConfigError),
    /// Network or HTTP-level failure talking to the service
    Transport(String),
    /// The service answered, but not with a well-formed report
    Format(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Config(e) => write!(f, "{}", e),
            AnalysisError::Transport(msg) => write!(f, "Analysis request failed: {}", msg),
            AnalysisError::Format(msg) => {
                write!(f, "Analysis response was not structured data: {}", msg)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<ConfigError> for AnalysisError {
    fn from(e: ConfigError) -> Self {
        AnalysisError::Config(e)
    }
}

/// Blocking HTTP client for an OpenAI-style chat-completions endpoint.
pub struct AnalysisClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnalysisClient {
    pub fn new(config: &AnalysisConfig) -> Result<AnalysisClient, AnalysisError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;
        Ok(AnalysisClient {
            http,
            api_key: config.api_key.clone(),
            base_url: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn build_prompt(original: &str, inverse: &str) -> String {
        format!(
            "Study the inverse function below and reply with exactly one JSON object \
             with these string fields: domain, range, injectivity, surjectivity, \
             bijectivity, monotonicity, limits, vertical_asymptotes, \
             horizontal_asymptotes, oblique_asymptotes, intercepts, description, \
             explanation.\n\
             Original function: {}\n\
             Inverse function: {}",
            original, inverse
        )
    }
}

impl Analyze for AnalysisClient {
    fn analyze(&self, original: &str, inverse: &str) -> Result<AnalysisReport, AnalysisError> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::build_prompt(original, inverse) },
            ],
        });

        log::debug!("requesting analysis from {}", url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Transport(format!(
                "analysis service returned HTTP {}",
                status.as_u16()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| AnalysisError::Format(e.to_string()))?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AnalysisError::Format("missing choices[0].message.content".to_string())
            })?;

        parse_report(content)
    }
}

/// Parse the model's reply into a report, tolerating code fences.
fn parse_report(content: &str) -> Result<AnalysisReport, AnalysisError> {
    let stripped = strip_code_fence(content);
    serde_json::from_str(stripped).map_err(|e| AnalysisError::Format(e.to_string()))
}

/// Remove a surrounding Markdown code fence, labeled (```json) or not.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening line, then the closing fence
    let after_tag = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    after_tag.trim_end().trim_end_matches("```").trim()
}

/// Deterministic stand-in for tests and offline runs.
pub struct StaticAnalyzer;

impl Analyze for StaticAnalyzer {
    fn analyze(&self, original: &str, inverse: &str) -> Result<AnalysisReport, AnalysisError> {
        Ok(AnalysisReport {
            domain: "R".to_string(),
            description: format!("inverse of {} is {}", original, inverse),
            ..AnalysisReport::default()
        })
    }
}

/// Analyzer used when no credential was configured at startup: every
/// request fails up front with the configuration error, before any
/// network call could happen.
pub struct UnconfiguredAnalyzer {
    error: ConfigError,
}

impl UnconfiguredAnalyzer {
    pub fn new(error: ConfigError) -> Self {
        UnconfiguredAnalyzer { error }
    }
}

impl Analyze for UnconfiguredAnalyzer {
    fn analyze(&self, _original: &str, _inverse: &str) -> Result<AnalysisReport, AnalysisError> {
        Err(AnalysisError::Config(self.error.clone()))
    }
}
