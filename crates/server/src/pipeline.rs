// Request pipeline: parse, invert, render, sample, analyze.
//
// All stages succeed or the whole request fails with one message; there
// is no partial response.

use inversa_analysis::{Analyze, AnalysisError};
use inversa_engine::{invert, parse, sample, to_latex, EngineError};
use inversa_protocol::FunctionResult;

use std::fmt;

#[derive(Debug)]
pub enum PipelineError {
    Engine(EngineError),
    Analysis(AnalysisError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Engine(e) => write!(f, "{}", e),
            PipelineError::Analysis(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<EngineError> for PipelineError {
    fn from(e: EngineError) -> Self {
        PipelineError::Engine(e)
    }
}

impl From<AnalysisError> for PipelineError {
    fn from(e: AnalysisError) -> Self {
        PipelineError::Analysis(e)
    }
}

/// Run the whole pipeline for one input expression.
///
/// The inverse is a function of `y`, so the plot samples it over the
/// `y` grid; its values are the corresponding `x` coordinates.
pub fn run(function: &str, analyzer: &dyn Analyze) -> Result<FunctionResult, PipelineError> {
    let expr = parse(function)?;
    let inverse = invert(&expr, "x", "y")?;

    let funzione_di_partenza = to_latex(&expr);
    let funzione_inversa = to_latex(&inverse);

    let points = sample(&inverse, "y")?;
    let report = analyzer.analyze(&funzione_di_partenza, &funzione_inversa)?;

    Ok(FunctionResult {
        funzione_di_partenza,
        funzione_inversa,
        punti_x: points.xs.iter().map(|x| *x as f64).collect(),
        punti_y: points.ys,
        studio_della_funzione: report,
    })
}
