// Engine error taxonomy. Every variant maps to a single human-readable
// message surfaced by the transport layer.

/// Error type for the expression pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Input string did not parse as a mathematical expression
    Parse(String),
    /// Solver returned no closed-form inverse
    NoInverse,
    /// Point generation could not be set up (compile failure, not a
    /// per-point singularity)
    Sample(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Parse(msg) => write!(f, "Parse error: {}", msg),
            EngineError::NoInverse => write!(f, "No closed-form inverse found"),
            EngineError::Sample(msg) => write!(f, "Sampling failed: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
