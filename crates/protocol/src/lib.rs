//! Inversa HTTP Wire Format
//!
//! This crate defines the JSON types exchanged over the HTTP boundary.
//! Field names are part of the public contract consumed by the existing
//! frontend and must not be renamed: the response speaks Italian
//! (`funzione_di_partenza`, `punti_x`, ...) even though the code does not.
//!
//! # Usage
//!
//! ```ignore
//! use inversa_protocol::{FunctionInput, FunctionResult};
//!
//! let input: FunctionInput = serde_json::from_str(body)?;
//! let json = serde_json::to_string(&result)?;
//! ```

use serde::{Deserialize, Serialize};

/// Request body of `POST /calcolo-analisi`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionInput {
    /// Infix expression in `x`, e.g. `"2*x+3"` or `"a^x"`.
    pub function: String,
}

/// Success body of `POST /calcolo-analisi`.
///
/// `punti_x` and `punti_y` are paired by index and always hold 41
/// entries; a `null` ordinate marks a point where the inverse is
/// undefined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResult {
    /// LaTeX of the original function.
    pub funzione_di_partenza: String,
    /// LaTeX of the chosen inverse branch.
    pub funzione_inversa: String,
    pub punti_x: Vec<f64>,
    pub punti_y: Vec<Option<f64>>,
    /// Qualitative study of the inverse, produced by the analysis
    /// service.
    pub studio_della_funzione: AnalysisReport,
}

/// Error body for every failure: HTTP 400 with a single message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        ErrorBody {
            detail: detail.into(),
        }
    }
}

/// Structured study of a function as returned by the reasoning service.
///
/// Structurally validated on parse; the text inside each field is taken
/// as-is and never re-checked for mathematical correctness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisReport {
    pub domain: String,
    pub range: String,
    pub injectivity: String,
    pub surjectivity: String,
    pub bijectivity: String,
    pub monotonicity: String,
    pub limits: String,
    pub vertical_asymptotes: String,
    pub horizontal_asymptotes: String,
    pub oblique_asymptotes: String,
    pub intercepts: String,
    pub description: String,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_parses() {
        let input: FunctionInput = serde_json::from_str(r#"{"function":"2*x+3"}"#).unwrap();
        assert_eq!(input.function, "2*x+3");
    }

    #[test]
    fn test_undefined_points_serialize_as_null() {
        let result = FunctionResult {
            funzione_di_partenza: "\\frac{1}{x}".to_string(),
            funzione_inversa: "\\frac{1}{y}".to_string(),
            punti_x: vec![-1.0, 0.0, 1.0],
            punti_y: vec![Some(-1.0), None, Some(1.0)],
            studio_della_funzione: AnalysisReport::default(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"punti_y\":[-1.0,null,1.0]"));
    }

    #[test]
    fn test_report_tolerates_missing_fields() {
        // The service may omit fields; missing ones default to empty
        let report: AnalysisReport =
            serde_json::from_str(r#"{"domain":"R","monotonicity":"increasing"}"#).unwrap();
        assert_eq!(report.domain, "R");
        assert_eq!(report.monotonicity, "increasing");
        assert_eq!(report.range, "");
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody::new("Parse error: empty expression");
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"detail":"Parse error: empty expression"}"#);
    }
}
