// Point generation for plotting.
//
// Both the original function and its inverse are sampled on the same
// fixed integer grid. Free parameters other than the plot variable are
// pinned to 2 before compiling, so `a*x + b` plots as `2*x + 2`.

use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::eval::eval;
use crate::expr::Expr;

/// Inclusive plotting domain, 41 integer points.
pub const DOMAIN_START: i64 = -20;
pub const DOMAIN_END: i64 = 20;

/// Value substituted for every free parameter that is not the plot
/// variable.
pub const PARAMETER_VALUE: f64 = 2.0;

/// Sampled curve. `xs` and `ys` always have the same length; a `None`
/// ordinate marks a point where the function is undefined (pole, log of
/// a non-positive value) and serializes as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    pub xs: Vec<i64>,
    pub ys: Vec<Option<f64>>,
}

/// Sample `expr` as a function of `variable` over the fixed grid.
///
/// Setup problems (a symbol that survives parameter substitution) are a
/// hard error; per-point singularities are not, they become `None`.
pub fn sample(expr: &Expr, variable: &str) -> Result<Samples, EngineError> {
    let mut params = BTreeMap::new();
    for name in expr.free_symbols() {
        if name != variable {
            params.insert(name, PARAMETER_VALUE);
        }
    }
    let fixed = expr.subst(&params);

    // After substitution only the plot variable may remain
    for name in fixed.free_symbols() {
        if name != variable {
            return Err(EngineError::Sample(format!(
                "symbol '{}' survived parameter substitution",
                name
            )));
        }
    }

    let mut xs = Vec::with_capacity((DOMAIN_END - DOMAIN_START + 1) as usize);
    let mut ys = Vec::with_capacity(xs.capacity());
    let mut bindings = BTreeMap::new();
    for x in DOMAIN_START..=DOMAIN_END {
        bindings.insert(variable.to_string(), x as f64);
        let y = eval(&fixed, &bindings)?;
        xs.push(x);
        ys.push(if y.is_finite() { Some(y) } else { None });
    }

    Ok(Samples { xs, ys })
}
